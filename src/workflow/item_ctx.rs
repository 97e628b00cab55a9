//! 条目处理上下文
//!
//! 封装"我正在处理批次中的第几个文件"这一信息

use crate::models::item::ItemId;
use std::fmt::Display;

/// 条目处理上下文
#[derive(Debug, Clone)]
pub struct ItemCtx {
    pub item_id: ItemId,
    /// 在批次中的位置（从 0 开始）
    pub index: usize,
    /// 批次总数
    pub total: usize,
    pub name: String,
}

impl ItemCtx {
    pub fn new(item_id: ItemId, index: usize, total: usize, name: impl Into<String>) -> Self {
        Self {
            item_id,
            index,
            total,
            name: name.into(),
        }
    }

    /// 开始处理时的进度百分比
    pub fn percent_before(&self) -> f64 {
        percent(self.index, self.total)
    }

    /// 处理完成后的进度百分比
    pub fn percent_after(&self) -> f64 {
        percent(self.index + 1, self.total)
    }
}

fn percent(done: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    done as f64 / total as f64 * 100.0
}

impl Display for ItemCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[文件 {}/{} {}]", self.index + 1, self.total, self.name)
    }
}
