//! 批次条目模型
//!
//! 条目状态使用带标签的枚举表示，结果与错误不会同时存在

use crate::error::ErrorKind;
use crate::models::candidate::Payload;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// 条目 ID，在登记表内单调递增、永不复用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub u64);

impl Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 结果来源
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultSource {
    /// 后端真实返回
    Backend { model: Option<String> },
    /// 后端不可达时本地生成的模拟结果
    Simulated,
}

impl ResultSource {
    pub fn is_simulated(&self) -> bool {
        matches!(self, ResultSource::Simulated)
    }
}

/// 提取结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub document_type: String,
    pub extracted_text: String,
    /// 置信度，取值 [0, 1]；后端未给出时为空
    pub confidence: Option<f64>,
    pub page_count: u32,
    pub size_bytes: Option<u64>,
    /// 大写扩展名，例如 `PDF`
    pub source_format: String,
    pub source: ResultSource,
}

/// 条目错误
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemError {
    pub message: String,
    pub kind: ErrorKind,
}

impl ItemError {
    pub fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }
}

/// 条目状态：pending → processing → success | error
#[derive(Debug, Clone, PartialEq)]
pub enum ItemStatus {
    Pending,
    Processing,
    Success(ExtractionResult),
    Error(ItemError),
}

impl ItemStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ItemStatus::Success(_) | ItemStatus::Error(_))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ItemStatus::Success(_))
    }
}

/// 已提交的单个文档
#[derive(Debug, Clone)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    /// 已知时为字节数
    pub size: Option<u64>,
    /// 为空表示仅有名称引用，没有可上传的内容
    pub payload: Option<Payload>,
    pub status: ItemStatus,
}

impl Item {
    pub fn result(&self) -> Option<&ExtractionResult> {
        match &self.status {
            ItemStatus::Success(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ItemError> {
        match &self.status {
            ItemStatus::Error(error) => Some(error),
            _ => None,
        }
    }
}

/// 批次计数器，始终由条目实时计算
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchCounters {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchCounters {
    /// 根据条目列表重新计算
    pub fn from_items(items: &[Item]) -> Self {
        items.iter().fold(
            Self {
                total: items.len(),
                ..Default::default()
            },
            |mut counters, item| {
                match item.status {
                    ItemStatus::Success(_) => counters.succeeded += 1,
                    ItemStatus::Error(_) => counters.failed += 1,
                    _ => {}
                }
                counters
            },
        )
    }

    pub fn finished(&self) -> usize {
        self.succeeded + self.failed
    }
}
