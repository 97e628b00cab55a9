//! 提取策略 - 业务能力层
//!
//! `Extractor` 是提取能力的统一接口，有两种实现：
//! - `RemoteExtractor`：调用后端服务
//! - `SimulatedExtractor`：后端不可达时的本地模拟

use crate::error::ExtractionError;
use crate::models::candidate::Payload;
use crate::models::item::{ExtractionResult, Item, ItemId};
use async_trait::async_trait;

/// 单个文件的提取任务
#[derive(Debug, Clone)]
pub struct ExtractionJob {
    pub item_id: ItemId,
    pub name: String,
    pub size: Option<u64>,
    pub payload: Option<Payload>,
    pub question: Option<String>,
}

impl ExtractionJob {
    /// 从登记表条目构建任务（只复制句柄，不复制文件内容）
    pub fn from_item(item: &Item, question: Option<String>) -> Self {
        Self {
            item_id: item.id,
            name: item.name.clone(),
            size: item.size,
            payload: item.payload.clone(),
            question,
        }
    }
}

/// 提取能力
#[async_trait]
pub trait Extractor: Send + Sync {
    /// 用于日志的名称
    fn label(&self) -> &'static str;

    /// 检查是否可用，不可用时返回原因
    async fn ensure_available(&self) -> Result<(), ExtractionError>;

    /// 执行提取
    async fn extract(&self, job: &ExtractionJob) -> Result<ExtractionResult, ExtractionError>;
}
