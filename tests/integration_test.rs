use std::fs;
use std::path::Path;

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use note_to_think_submit::models::AttachmentDescriptor;
use note_to_think_submit::utils::logging;
use note_to_think_submit::{Config, PartitionMode, SubmitFlow, SubmitJob};

/// 构造指向 mock 服务和临时笔记库的配置
fn test_config(base_url: &str, vault_root: &Path) -> Config {
    Config {
        base_url: base_url.to_string(),
        vault_root: vault_root.to_string_lossy().into_owned(),
        request_timeout_secs: 5,
        max_concurrent_uploads: 2,
        ..Config::default()
    }
}

fn test_job(note_path: &str) -> SubmitJob {
    SubmitJob {
        note_path: note_path.to_string(),
        doc_title: None,
        channel_id: "1".to_string(),
        prompt_id: "2".to_string(),
        partitioned_mode: PartitionMode::ByParagraph,
        partitioned_chunk_size: 1000,
        if_create_vector_db: true,
        if_run_doc_intro_workflow: false,
        file_path: None,
    }
}

/// 挂载频道和提示词列表接口
async fn mount_metadata_endpoints(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/bff/v1/apps/block-cutter/channels/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"id": 1, "name": "默认频道"}, {"id": 3, "name": "技术频道"}])),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(
            "/bff/v1/apps/block-cutter/get-studio-obsidian-to-think-generate-prompt-list/",
        ))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"id": "2", "name": "标准提示词"}])),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_submit_flow_end_to_end() {
    logging::init();

    let server = MockServer::start().await;
    mount_metadata_endpoints(&server).await;

    Mock::given(method("POST"))
        .and(path("/bff/v1/apps/obsidian/attachments/upload"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"url": "http://files.local/年度报告.pdf"}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    // 工作流请求必须携带整数编码的开关和已上传附件的URL
    Mock::given(method("POST"))
        .and(path("/bff/v1/apps/dify/tasks/do-obsidian-to-think-workflow"))
        .and(body_partial_json(json!({
            "doc_title": "测试笔记",
            "channel_id": 1,
            "prompt_id": 2,
            "if_create_vector_db": 1,
            "knowledge_is_required": 1,
            "documents": ["http://files.local/年度报告.pdf"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "outputs": {"text": "{\"doc_url\": \"http://think.local/doc/42\"}"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    // 临时笔记库：一篇笔记 + 一个本地附件
    let vault = tempfile::tempdir().unwrap();
    fs::create_dir_all(vault.path().join("files")).unwrap();
    fs::write(vault.path().join("files/年度报告.pdf"), b"%PDF-fake").unwrap();
    fs::write(
        vault.path().join("测试笔记.md"),
        "# 年度总结\n\n正文内容。\n\n[年度报告](files/年度报告.pdf)\n",
    )
    .unwrap();

    let config = test_config(&server.uri(), vault.path());
    let flow = SubmitFlow::new(&config).unwrap();

    let outcome = flow.run(&test_job("测试笔记.md"), 1).await.unwrap();

    assert_eq!(outcome.doc_url, "http://think.local/doc/42");
    assert_eq!(outcome.uploaded, 1);
    assert_eq!(outcome.failed, 0);
}

#[tokio::test]
async fn test_submit_flow_attachment_read_failure_is_soft() {
    logging::init();

    let server = MockServer::start().await;
    mount_metadata_endpoints(&server).await;

    // 附件不存在，不应有任何上传请求
    Mock::given(method("POST"))
        .and(path("/bff/v1/apps/obsidian/attachments/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"url": "http://files.local/x"}])))
        .expect(0)
        .mount(&server)
        .await;

    // 软失败后工作流仍被触发，documents 为空
    Mock::given(method("POST"))
        .and(path("/bff/v1/apps/dify/tasks/do-obsidian-to-think-workflow"))
        .and(body_partial_json(json!({"documents": []})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "outputs": {"text": "{\"doc_url\": \"http://think.local/doc/7\"}"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let vault = tempfile::tempdir().unwrap();
    fs::write(
        vault.path().join("测试笔记.md"),
        "# 总结\n\n[丢失的附件](files/不存在.pdf)\n",
    )
    .unwrap();

    let config = test_config(&server.uri(), vault.path());
    let flow = SubmitFlow::new(&config).unwrap();

    let outcome = flow.run(&test_job("测试笔记.md"), 1).await.unwrap();

    assert_eq!(outcome.doc_url, "http://think.local/doc/7");
    assert_eq!(outcome.uploaded, 0);
    assert_eq!(outcome.failed, 1);
}

#[tokio::test]
async fn test_submit_flow_rejects_unknown_channel() {
    logging::init();

    let server = MockServer::start().await;

    // 频道列表里没有任务指定的 id
    Mock::given(method("GET"))
        .and(path("/bff/v1/apps/block-cutter/channels/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"id": 9, "name": "其他频道"}])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(
            "/bff/v1/apps/block-cutter/get-studio-obsidian-to-think-generate-prompt-list/",
        ))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"id": "2", "name": "标准提示词"}])),
        )
        .mount(&server)
        .await;

    // 校验失败时不应触发工作流
    Mock::given(method("POST"))
        .and(path("/bff/v1/apps/dify/tasks/do-obsidian-to-think-workflow"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let vault = tempfile::tempdir().unwrap();
    fs::write(vault.path().join("测试笔记.md"), "# 总结\n\n正文。\n").unwrap();

    let config = test_config(&server.uri(), vault.path());
    let flow = SubmitFlow::new(&config).unwrap();

    let result = flow.run(&test_job("测试笔记.md"), 1).await;

    assert!(result.is_err());
    assert!(format!("{:#}", result.unwrap_err()).contains("频道"));
}

#[tokio::test]
async fn test_upload_skipped_when_all_attachments_already_uploaded() {
    logging::init();

    let server = MockServer::start().await;

    // 全部附件已携带URL时不应有任何上传请求
    Mock::given(method("POST"))
        .and(path("/bff/v1/apps/obsidian/attachments/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"url": "http://files.local/x"}])))
        .expect(0)
        .mount(&server)
        .await;

    let vault = tempfile::tempdir().unwrap();
    let config = test_config(&server.uri(), vault.path());
    let flow = SubmitFlow::new(&config).unwrap();

    let attachments = vec![
        AttachmentDescriptor::new("a.pdf", "a.pdf").with_url("http://files.local/a.pdf"),
        AttachmentDescriptor::new("b.pdf", "b.pdf").with_url("http://files.local/b.pdf"),
    ];

    let (result, uploaded, failed) = flow.ensure_attachments_uploaded(attachments, 1).await;

    assert_eq!(result.len(), 2);
    assert!(result.iter().all(|a| a.is_uploaded()));
    assert_eq!(uploaded, 0);
    assert_eq!(failed, 0);
}
