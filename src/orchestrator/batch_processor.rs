//! 批次处理器 - 编排层
//!
//! ## 职责
//!
//! 按提交顺序逐个驱动文件完成状态流转：
//! pending → processing → success | error
//!
//! ## 核心功能
//!
//! 1. **重入保护**：批次为空或已有运行时直接拒绝
//! 2. **顺序处理**：一次只有一个文件处于 processing，一次只有一个请求在途
//! 3. **进度上报**：每个文件开始前、完成后各上报一次，结束时上报 100%
//! 4. **保证收尾**：运行标志由守卫清除，任何退出路径都不会遗留"忙碌"状态
//!
//! ## 设计特点
//!
//! - **不做业务判断**：单个文件怎么处理交给 `ItemFlow`
//! - **单个文件失败不影响批次**：错误写回条目，继续下一个

use crate::error::AppResult;
use crate::models::item::{ItemId, ItemStatus};
use crate::orchestrator::progress::{ProgressSink, ProgressUpdate};
use crate::orchestrator::session::BatchSession;
use crate::services::extractor::ExtractionJob;
use crate::utils::logging;
use crate::workflow::{ItemCtx, ItemFlow};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// 一次运行的汇总
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// 成功条目中由本地模拟产生的数量
    pub simulated: usize,
    pub elapsed: Duration,
}

/// 批次处理器
pub struct ProcessingOrchestrator {
    flow: ItemFlow,
    sink: Arc<dyn ProgressSink>,
}

impl ProcessingOrchestrator {
    pub fn new(flow: ItemFlow, sink: Arc<dyn ProgressSink>) -> Self {
        Self { flow, sink }
    }

    /// 处理整个批次
    ///
    /// # 返回
    /// 返回本次运行的统计；批次为空或正在运行时返回错误且不改变状态
    pub async fn run(&self, session: &BatchSession) -> AppResult<RunSummary> {
        let _active = session.begin_run()?;
        let started = Instant::now();

        let order: Vec<(ItemId, String)> = session
            .registry()
            .list()
            .iter()
            .map(|item| (item.id, item.name.clone()))
            .collect();
        let total = order.len();

        logging::log_run_start(total);
        self.emit(session, ProgressUpdate::new(0.0, "开始处理..."));

        for (index, (id, name)) in order.into_iter().enumerate() {
            let ctx = ItemCtx::new(id, index, total, name);

            let job = {
                let mut registry = session.registry();
                registry.update_status(id, ItemStatus::Processing)?;
                registry
                    .get(id)
                    .map(|item| ExtractionJob::from_item(item, self.flow.question().map(str::to_string)))
            };
            let Some(job) = job else {
                continue;
            };

            self.emit(
                session,
                ProgressUpdate::new(ctx.percent_before(), format!("正在处理: {}", ctx.name)),
            );

            let status = self.flow.run(&ctx, &job).await;

            session.registry().update_status(id, status)?;

            self.emit(
                session,
                ProgressUpdate::new(ctx.percent_after(), format!("已处理: {}", ctx.name)),
            );
        }

        self.emit(session, ProgressUpdate::new(100.0, "处理完成"));

        let summary = {
            let registry = session.registry();
            let counters = registry.counters();
            RunSummary {
                total: counters.total,
                succeeded: counters.succeeded,
                failed: counters.failed,
                simulated: registry
                    .successes()
                    .filter(|item| item.result().is_some_and(|r| r.source.is_simulated()))
                    .count(),
                elapsed: started.elapsed(),
            }
        };

        info!(
            "✓ 批次完成: 成功 {}/{}，失败 {}，耗时 {:.1} 秒",
            summary.succeeded,
            summary.total,
            summary.failed,
            summary.elapsed.as_secs_f64()
        );

        Ok(summary)
    }

    fn emit(&self, session: &BatchSession, update: ProgressUpdate) {
        self.sink.emit(&update);
        session.set_progress(update);
    }
}
