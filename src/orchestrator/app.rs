//! 应用入口 - 编排层
//!
//! 组装客户端、提取策略和会话，完成"接收 → 处理 → 导出"一整轮

use crate::config::Config;
use crate::error::{AppError, ExportError};
use crate::infrastructure::ExtractionClient;
use crate::models::loaders::{expand_paths, load_candidates};
use crate::orchestrator::batch_processor::{ProcessingOrchestrator, RunSummary};
use crate::orchestrator::progress::LogProgress;
use crate::orchestrator::session::BatchSession;
use crate::services::{Extractor, RemoteExtractor, SimulatedExtractor};
use crate::utils::logging;
use crate::workflow::ItemFlow;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    session: BatchSession,
    orchestrator: ProcessingOrchestrator,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        config.validate().context("配置校验失败")?;
        logging::log_startup(&config);

        let client = ExtractionClient::new(&config);
        let primary: Arc<dyn Extractor> = Arc::new(RemoteExtractor::new(client));
        let fallback: Arc<dyn Extractor> = Arc::new(SimulatedExtractor::new(&config));
        let flow = ItemFlow::new(primary, fallback)
            .with_question(config.default_question.clone())
            .with_verbose_logging(config.verbose_logging);

        Ok(Self {
            session: BatchSession::new(&config),
            orchestrator: ProcessingOrchestrator::new(flow, Arc::new(LogProgress)),
            config,
        })
    }

    pub fn session(&self) -> &BatchSession {
        &self.session
    }

    /// 运行应用主逻辑
    ///
    /// # 参数
    /// - `inputs`: 文件或目录路径
    ///
    /// # 返回
    /// 返回本次运行统计；没有可处理的文件时返回 None
    pub async fn run(&self, inputs: &[PathBuf]) -> Result<Option<RunSummary>> {
        info!("\n📁 正在扫描待处理的文件...");
        let paths = expand_paths(inputs).await?;
        let candidates = load_candidates(&paths).await;

        let report = self.session.intake(candidates)?;
        logging::log_intake(report.accepted.len(), report.rejected.len(), report.dropped);

        if self.session.is_empty() {
            warn!("⚠️ 没有可处理的文件，程序结束");
            return Ok(None);
        }

        let summary = self.orchestrator.run(&self.session).await?;
        logging::print_final_stats(
            summary.succeeded,
            summary.failed,
            summary.simulated,
            summary.total,
        );

        self.export(Path::new(&self.config.export_dir)).await?;

        Ok(Some(summary))
    }

    /// 导出成功条目；没有数据时只记录警告
    async fn export(&self, dir: &Path) -> Result<Option<PathBuf>> {
        match self.session.export() {
            Ok(payload) => {
                let path = payload
                    .save_to_dir(dir)
                    .await
                    .with_context(|| format!("无法写入导出文件: {}", dir.display()))?;
                Ok(Some(path))
            }
            Err(ExportError::NoData) => {
                warn!("⚠️ {}", AppError::Export(ExportError::NoData));
                Ok(None)
            }
        }
    }
}
