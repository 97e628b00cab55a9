//! 批次登记表 - 业务能力层
//!
//! 按提交顺序保存条目，提供追加、查询、状态更新和计数

use crate::error::{RegistryError, ValidationError};
use crate::models::candidate::Payload;
use crate::models::item::{BatchCounters, Item, ItemId, ItemStatus};

/// 批次登记表
///
/// - 插入顺序即处理顺序和展示顺序，永不重排
/// - 条目不能单独删除，只能整体清空
/// - ID 单调递增，清空后也不复用
#[derive(Debug, Default)]
pub struct BatchRegistry {
    items: Vec<Item>,
    next_id: u64,
}

impl BatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 判断是否与已有条目重复
    ///
    /// 双方大小都已知时按 (名称, 大小) 比较，否则只比较名称
    pub fn would_duplicate(&self, name: &str, size: Option<u64>) -> bool {
        self.items.iter().any(|item| {
            item.name == name
                && match (item.size, size) {
                    (Some(existing), Some(incoming)) => existing == incoming,
                    _ => true,
                }
        })
    }

    /// 追加一个等待中的条目
    ///
    /// 重复的文件会被拒绝，不会合并
    pub fn add(
        &mut self,
        name: impl Into<String>,
        size: Option<u64>,
        payload: Option<Payload>,
    ) -> Result<&Item, ValidationError> {
        let name = name.into();
        if self.would_duplicate(&name, size) {
            return Err(ValidationError::Duplicate { name });
        }

        self.next_id += 1;
        self.items.push(Item {
            id: ItemId(self.next_id),
            name,
            size,
            payload,
            status: ItemStatus::Pending,
        });

        Ok(&self.items[self.items.len() - 1])
    }

    /// 按插入顺序列出所有条目
    pub fn list(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// 按条件筛选，保持插入顺序
    pub fn filter<'a, F>(&'a self, predicate: F) -> impl Iterator<Item = &'a Item> + 'a
    where
        F: Fn(&Item) -> bool + 'a,
    {
        self.items.iter().filter(move |item| predicate(item))
    }

    /// 成功的条目
    pub fn successes(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|item| item.status.is_success())
    }

    /// 更新单个条目的状态
    pub fn update_status(&mut self, id: ItemId, status: ItemStatus) -> Result<(), RegistryError> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(RegistryError::NotFound { id: id.0 })?;
        item.status = status;
        Ok(())
    }

    /// 运行开始前把所有条目恢复为等待中，本轮计数从零开始
    pub fn reset_for_run(&mut self) {
        for item in &mut self.items {
            item.status = ItemStatus::Pending;
        }
    }

    /// 实时计算的计数器
    pub fn counters(&self) -> BatchCounters {
        BatchCounters::from_items(&self.items)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 清空整个批次
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::item::ItemError;

    #[test]
    fn test_add_assigns_increasing_ids_in_order() {
        let mut registry = BatchRegistry::new();
        let first = registry.add("a.pdf", Some(10), None).unwrap().id;
        let second = registry.add("b.pdf", Some(10), None).unwrap().id;

        assert!(second > first);
        let names: Vec<_> = registry.list().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["a.pdf", "b.pdf"]);
        assert!(registry.list().iter().all(|i| i.status == ItemStatus::Pending));
    }

    #[test]
    fn test_duplicate_name_and_size() {
        let mut registry = BatchRegistry::new();
        registry.add("a.pdf", Some(10 * 1024), None).unwrap();

        assert!(registry.would_duplicate("a.pdf", Some(10 * 1024)));
        assert!(!registry.would_duplicate("a.pdf", Some(20 * 1024)));
        assert_eq!(
            registry.add("a.pdf", Some(10 * 1024), None).unwrap_err(),
            ValidationError::Duplicate {
                name: "a.pdf".to_string()
            }
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unknown_size_falls_back_to_name() {
        let mut registry = BatchRegistry::new();
        registry.add("scan.png", None, None).unwrap();
        assert!(registry.would_duplicate("scan.png", Some(42)));

        let mut registry = BatchRegistry::new();
        registry.add("scan.png", Some(42), None).unwrap();
        assert!(registry.would_duplicate("scan.png", None));
    }

    #[test]
    fn test_duplicate_regardless_of_status() {
        let mut registry = BatchRegistry::new();
        let id = registry.add("a.pdf", Some(1), None).unwrap().id;
        registry
            .update_status(
                id,
                ItemStatus::Error(ItemError::new("失败", ErrorKind::Timeout)),
            )
            .unwrap();
        assert!(registry.would_duplicate("a.pdf", Some(1)));
    }

    #[test]
    fn test_update_unknown_id_is_not_found() {
        let mut registry = BatchRegistry::new();
        assert_eq!(
            registry.update_status(ItemId(99), ItemStatus::Processing),
            Err(RegistryError::NotFound { id: 99 })
        );
    }

    #[test]
    fn test_counters_follow_statuses() {
        let mut registry = BatchRegistry::new();
        let a = registry.add("a.pdf", None, None).unwrap().id;
        let b = registry.add("b.pdf", None, None).unwrap().id;
        registry.add("c.pdf", None, None).unwrap();

        registry
            .update_status(a, ItemStatus::Error(ItemError::new("x", ErrorKind::Transport)))
            .unwrap();
        registry.update_status(b, ItemStatus::Processing).unwrap();

        let counters = registry.counters();
        assert_eq!(counters.total, 3);
        assert_eq!(counters.succeeded, 0);
        assert_eq!(counters.failed, 1);

        registry.reset_for_run();
        assert_eq!(registry.counters().finished(), 0);
    }

    #[test]
    fn test_clear_keeps_ids_monotonic() {
        let mut registry = BatchRegistry::new();
        let first = registry.add("a.pdf", None, None).unwrap().id;
        registry.clear();
        assert!(registry.is_empty());
        let second = registry.add("a.pdf", None, None).unwrap().id;
        assert!(second > first);
    }

    #[test]
    fn test_filter_preserves_order() {
        let mut registry = BatchRegistry::new();
        registry.add("a.pdf", None, None).unwrap();
        registry.add("b.png", None, None).unwrap();
        registry.add("c.pdf", None, None).unwrap();

        let pdfs: Vec<_> = registry
            .filter(|item| item.name.ends_with(".pdf"))
            .map(|item| item.name.clone())
            .collect();
        assert_eq!(pdfs, vec!["a.pdf", "c.pdf"]);
    }
}
