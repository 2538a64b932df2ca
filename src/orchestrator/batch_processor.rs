//! 批量任务处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量提交任务的处理和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：启动日志文件、创建 SubmitFlow
//! 2. **批量加载**：扫描并加载所有待提交的任务（`Vec<SubmitJob>`）
//! 3. **顺序处理**：任务按加载顺序依次提交，单个任务内部并发上传附件
//! 4. **全局统计**：汇总所有任务的提交结果和附件上传情况
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单篇笔记的细节
//! - **软失败隔离**：单个任务失败只计入统计，不中断后续任务
//! - **向下委托**：委托 SubmitFlow 处理单篇笔记

use anyhow::Result;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::models::{load_all_toml_files, SubmitJob};
use crate::utils::logging;
use crate::workflow::SubmitFlow;

/// 应用主结构
pub struct App {
    config: Config,
    flow: SubmitFlow,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        // 初始化日志文件
        logging::init_log_file(&config.output_log_file)?;

        logging::log_startup(&config);

        let flow = SubmitFlow::new(&config)?;

        Ok(Self { config, flow })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        // 加载所有待提交的任务
        let all_jobs = self.load_jobs().await?;

        if all_jobs.is_empty() {
            warn!("⚠️ 没有找到待提交的TOML任务文件，程序结束");
            return Ok(());
        }

        logging::log_jobs_loaded(all_jobs.len());

        // 处理所有任务
        let stats = self.process_all_jobs(&all_jobs).await;

        // 输出最终统计
        logging::print_final_stats(
            stats.success,
            stats.failed,
            stats.total,
            &self.config.output_log_file,
        );
        log_upload_totals(&stats);

        Ok(())
    }

    /// 加载任务
    async fn load_jobs(&self) -> Result<Vec<SubmitJob>> {
        info!("\n📁 正在扫描待提交的任务...");
        load_all_toml_files(&self.config.jobs_folder).await
    }

    /// 处理所有任务
    async fn process_all_jobs(&self, all_jobs: &[SubmitJob]) -> ProcessingStats {
        let mut stats = ProcessingStats {
            total: all_jobs.len(),
            ..Default::default()
        };

        for (idx, job) in all_jobs.iter().enumerate() {
            let job_index = idx + 1;
            info!("\n{}", "=".repeat(60));
            info!(
                "📦 开始处理第 {}/{} 个任务: {}",
                job_index,
                all_jobs.len(),
                job.display_name()
            );
            info!("{}", "=".repeat(60));

            match self.flow.run(job, job_index).await {
                Ok(outcome) => {
                    stats.success += 1;
                    stats.attachments_uploaded += outcome.uploaded;
                    stats.attachments_failed += outcome.failed;
                    stats.doc_urls.push((job.display_name().to_string(), outcome.doc_url));
                }
                Err(e) => {
                    error!("[任务 {}] ❌ 提交过程中发生错误: {:#}", job_index, e);
                    stats.failed += 1;
                }
            }
        }

        stats
    }
}

/// 处理统计
#[derive(Debug, Default)]
struct ProcessingStats {
    success: usize,
    failed: usize,
    total: usize,
    attachments_uploaded: usize,
    attachments_failed: usize,
    doc_urls: Vec<(String, String)>,
}

// ========== 日志辅助函数 ==========

fn log_upload_totals(stats: &ProcessingStats) {
    info!(
        "📎 附件上传合计: 成功 {}, 失败 {}",
        stats.attachments_uploaded, stats.attachments_failed
    );

    if !stats.doc_urls.is_empty() {
        info!("\n📄 生成的文档:");
        for (name, url) in &stats.doc_urls {
            info!("  {} -> {}", name, url);
        }
    }
}
