//! 进度上报
//!
//! 编排器通过 `ProgressSink` 发出进度，调用方决定如何展示

use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;
use tracing::info;

/// 一次进度更新
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressUpdate {
    /// 0 ~ 100
    pub percent: f64,
    pub label: String,
}

impl ProgressUpdate {
    pub fn new(percent: f64, label: impl Into<String>) -> Self {
        Self {
            percent: percent.clamp(0.0, 100.0),
            label: label.into(),
        }
    }

    /// 初始的"准备就绪"状态
    pub fn ready() -> Self {
        Self::new(0.0, "准备就绪")
    }
}

impl Default for ProgressUpdate {
    fn default() -> Self {
        Self::ready()
    }
}

/// 进度接收方
pub trait ProgressSink: Send + Sync {
    fn emit(&self, update: &ProgressUpdate);
}

/// 忽略所有进度
impl ProgressSink for () {
    fn emit(&self, _update: &ProgressUpdate) {}
}

/// 通过通道转发给其他任务（例如界面）
impl ProgressSink for UnboundedSender<ProgressUpdate> {
    fn emit(&self, update: &ProgressUpdate) {
        // 接收端关闭后不再需要进度
        let _ = self.send(update.clone());
    }
}

/// 写入日志
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn emit(&self, update: &ProgressUpdate) {
        info!("📊 [{:>5.1}%] {}", update.percent, update.label);
    }
}
