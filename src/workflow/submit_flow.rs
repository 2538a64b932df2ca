//! 笔记提交流程 - 流程层
//!
//! 核心职责：定义"一篇笔记"的完整提交流程
//!
//! 流程顺序：
//! 1. 读取笔记 → 构建表单 → 校验
//! 2. 拉取频道/提示词列表 → 核对选择
//! 3. 提取附件 → 需要时批量上传（已全部上传则跳过）
//! 4. 触发 think 工作流 → 解析 doc_url

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::clients::BackendClient;
use crate::config::Config;
use crate::error::{AppResult, BusinessError};
use crate::models::{
    all_url_has_value, AttachmentDescriptor, RemoteOption, StatusSink, SubmitForm, SubmitJob,
};
use crate::services::extractor;
use crate::services::vault_reader::{doc_root_of, note_title};
use crate::services::{AttachmentUploader, VaultReader};
use crate::workflow::submit_ctx::SubmitCtx;

/// 单个任务的提交结果
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    /// 工作流产出的文档URL
    pub doc_url: String,
    /// 成功上传的附件数
    pub uploaded: usize,
    /// 软失败的附件数
    pub failed: usize,
}

/// 笔记提交流程
///
/// - 编排完整的提交流程
/// - 决定何时上传、何时跳过、何时触发工作流
/// - 只依赖业务能力（services）和客户端（clients）
pub struct SubmitFlow {
    client: BackendClient,
    reader: VaultReader,
    max_concurrent_uploads: usize,
    verbose_logging: bool,
}

impl SubmitFlow {
    /// 创建新的提交流程
    pub fn new(config: &Config) -> AppResult<Self> {
        Ok(Self {
            client: BackendClient::new(config)?,
            reader: VaultReader::new(&config.vault_root, config.normalize_for_windows),
            max_concurrent_uploads: config.max_concurrent_uploads,
            verbose_logging: config.verbose_logging,
        })
    }

    pub async fn run(&self, job: &SubmitJob, job_index: usize) -> Result<SubmitOutcome> {
        // 1. 读取笔记
        let content = self
            .reader
            .read_note(&job.note_path)
            .await
            .with_context(|| format!("无法读取笔记: {}", job.note_path))?;

        let doc_title = job
            .doc_title
            .clone()
            .unwrap_or_else(|| note_title(&job.note_path));

        let ctx = SubmitCtx::new(
            job.note_path.clone(),
            job_index,
            doc_title,
            doc_root_of(&job.note_path),
        );

        log_job_start(&ctx, content.chars().count());

        // 2. 构建并校验表单
        let mut form = SubmitForm {
            doc_title: ctx.doc_title.clone(),
            doc_content: content.clone(),
            channel_id: job.channel_id.clone(),
            prompt_id: job.prompt_id.clone(),
            partitioned_mode: job.partitioned_mode,
            partitioned_chunk_size: job.partitioned_chunk_size,
            vector_uuid: content_digest(&content),
            if_create_vector_db: job.if_create_vector_db,
            if_run_doc_intro_workflow: job.if_run_doc_intro_workflow,
            documents: Vec::new(),
        };

        form.validate().context("表单校验失败")?;
        info!("[任务 {}] ✓ 表单校验通过", ctx.job_index);

        // 3. 核对频道和提示词
        self.verify_selections(&form, &ctx).await?;

        // 4. 提取附件
        let attachments = extractor::extract_attachments(&content, &ctx.doc_root);
        log_attachments(&ctx, &attachments, self.verbose_logging);

        // 5. 需要时上传附件
        let (attachments, uploaded, failed) = if form.if_create_vector_db {
            self.ensure_attachments_uploaded(attachments, ctx.job_index)
                .await
        } else {
            info!(
                "[任务 {}] 不构建知识库，跳过 {} 个附件的上传",
                ctx.job_index,
                attachments.len()
            );
            (attachments, 0, 0)
        };

        form.documents = attachments
            .iter()
            .filter(|a| a.is_uploaded())
            .filter_map(|a| a.url.clone())
            .collect();

        // 6. 触发工作流
        let request = form.to_wire_request()?;
        info!(
            "[任务 {}] 🚀 开始运行流程 参数: {}",
            ctx.job_index,
            request.preview()
        );

        let doc_url = self.client.run_think_workflow(&request).await?;

        info!("[任务 {}] ✅ 流程完成 doc_url: {}", ctx.job_index, doc_url);

        Ok(SubmitOutcome {
            doc_url,
            uploaded,
            failed,
        })
    }

    /// 需要时批量上传附件
    ///
    /// 附件列表为空或全部已携带有效URL时直接跳过（幂等），
    /// 否则整批上传并返回新列表及成功/软失败计数
    pub async fn ensure_attachments_uploaded(
        &self,
        attachments: Vec<AttachmentDescriptor>,
        job_index: usize,
    ) -> (Vec<AttachmentDescriptor>, usize, usize) {
        if attachments.is_empty() || all_url_has_value(&attachments) {
            info!("[任务 {}] 无需上传 {} 个附件", job_index, attachments.len());
            return (attachments, 0, 0);
        }

        info!("[任务 {}] 📤 开始上传附件 中...", job_index);

        // 状态通道由流程持有，上传任务并发写入，这里统一排空到日志
        let (sink, mut rx) = StatusSink::channel();
        let drain = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                info!("[任务 {}] 📎 {}", job_index, event.message);
            }
        });

        let uploader =
            AttachmentUploader::new(&self.client, &self.reader, self.max_concurrent_uploads);
        let new_attachments = uploader.upload_all(attachments, &sink).await;

        drop(sink);
        let _ = drain.await;

        let uploaded = new_attachments.iter().filter(|a| a.is_uploaded()).count();
        let failed = new_attachments.len() - uploaded;

        if failed > 0 {
            warn!(
                "[任务 {}] ⚠️ 上传附件完成: 成功 {}, 失败 {}",
                job_index, uploaded, failed
            );
        } else {
            info!(
                "[任务 {}] ✓ 上传附件完成 {} 个附件",
                job_index, uploaded
            );
        }

        (new_attachments, uploaded, failed)
    }

    /// 核对表单选择的频道和提示词是否存在于远端列表
    async fn verify_selections(&self, form: &SubmitForm, ctx: &SubmitCtx) -> Result<()> {
        let channels = self.client.get_channels().await.context("获取频道列表失败")?;
        let prompts = self.client.get_prompts().await.context("获取提示词列表失败")?;

        let channel_name = find_option_name(&channels, &form.channel_id).ok_or_else(|| {
            crate::error::AppError::Business(BusinessError::UnknownChannel {
                id: form.channel_id.clone(),
            })
        })?;
        let prompt_name = find_option_name(&prompts, &form.prompt_id).ok_or_else(|| {
            crate::error::AppError::Business(BusinessError::UnknownPrompt {
                id: form.prompt_id.clone(),
            })
        })?;

        info!(
            "[任务 {}] ✓ 频道: {} - {} | 提示词: {} - {}",
            ctx.job_index, form.channel_id, channel_name, form.prompt_id, prompt_name
        );

        Ok(())
    }
}

/// 按 id 查找选项名称
fn find_option_name(options: &[RemoteOption], id: &str) -> Option<String> {
    options
        .iter()
        .find(|option| option.id == id.trim())
        .map(|option| option.name.clone())
}

/// 计算笔记内容的摘要，作为向量标记ID
fn content_digest(content: &str) -> String {
    format!("{:x}", Sha256::digest(content.as_bytes()))
}

// ========== 日志辅助函数 ==========

fn log_job_start(ctx: &SubmitCtx, content_chars: usize) {
    info!("[任务 {}] 开始处理", ctx.job_index);
    info!("[任务 {}] 笔记: {}", ctx.job_index, ctx.note_path);
    info!("[任务 {}] 标题: {}", ctx.job_index, ctx.doc_title);
    info!("[任务 {}] 内容长度: {} 字符", ctx.job_index, content_chars);
}

fn log_attachments(ctx: &SubmitCtx, attachments: &[AttachmentDescriptor], verbose: bool) {
    info!(
        "[任务 {}] 🔍 提取到 {} 个附件引用",
        ctx.job_index,
        attachments.len()
    );

    if verbose {
        for (i, attachment) in attachments.iter().enumerate() {
            info!(
                "[任务 {}]   附件{}: {} ({})",
                ctx.job_index,
                i + 1,
                attachment.file_name,
                attachment.path
            );
        }
    }
}
