//! 批量接收 - 业务能力层
//!
//! 校验 → 重复检测 → 容量检查 → 登记，按提交顺序逐个处理

use crate::error::{ErrorKind, ValidationError};
use crate::models::candidate::Candidate;
use crate::models::item::ItemId;
use crate::services::batch_registry::BatchRegistry;
use crate::services::file_validator::FileValidator;
use tracing::{debug, warn};

/// 被拒绝的候选文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// 候选文件在本次提交中的位置（从 0 开始）
    pub position: usize,
    pub name: Option<String>,
    pub reason: ValidationError,
}

/// 接收结果
#[derive(Debug, Default, Clone)]
pub struct IntakeReport {
    pub accepted: Vec<ItemId>,
    pub rejected: Vec<Rejection>,
    /// 因批次容量不足被丢弃的数量（同时出现在 rejected 中）
    pub dropped: usize,
}

impl Rejection {
    pub fn kind(&self) -> ErrorKind {
        self.reason.kind()
    }
}

/// 把一组候选文件接收进登记表
///
/// 校验失败或重复的文件单独报告；登记表达到 `max_files` 后，
/// 之后所有合法文件都会被丢弃并计入 `dropped`
pub fn intake(
    registry: &mut BatchRegistry,
    validator: &FileValidator,
    max_files: usize,
    candidates: Vec<Candidate>,
) -> IntakeReport {
    let mut report = IntakeReport::default();

    for (position, candidate) in candidates.into_iter().enumerate() {
        let display_name = candidate.resolved_name().map(str::to_string);
        let size = candidate.effective_size();

        let admitted = validator.validate(&candidate).and_then(|()| {
            // validate 已保证名称存在
            let name = display_name.clone().unwrap_or_default();
            if registry.would_duplicate(&name, size) {
                return Err(ValidationError::Duplicate { name });
            }
            if registry.len() >= max_files {
                return Err(ValidationError::BatchCapExceeded { name, max_files });
            }
            registry
                .add(name, size, candidate.payload)
                .map(|item| item.id)
        });

        match admitted {
            Ok(id) => {
                debug!("✓ 已加入批次: {} {:?}", id, display_name);
                report.accepted.push(id);
            }
            Err(reason) => {
                if matches!(reason, ValidationError::BatchCapExceeded { .. }) {
                    report.dropped += 1;
                }
                warn!("⚠️ 文件被拒绝 [{:?}]: {}", reason.kind(), reason);
                report.rejected.push(Rejection {
                    position,
                    name: display_name,
                    reason,
                });
            }
        }
    }

    if report.dropped > 0 {
        warn!(
            "⚠️ 批次容量为 {} 个，已丢弃 {} 个文件",
            max_files, report.dropped
        );
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::candidate::Payload;
    use std::path::Path;

    fn validator() -> FileValidator {
        FileValidator::new(&Config::default())
    }

    #[test]
    fn test_same_name_and_size_rejected_as_duplicate() {
        let mut registry = BatchRegistry::new();
        let report = intake(
            &mut registry,
            &validator(),
            100,
            vec![
                Candidate::from_bytes("a.pdf", vec![0u8; 10 * 1024]),
                Candidate::from_bytes("a.pdf", vec![0u8; 10 * 1024]),
            ],
        );

        assert_eq!(registry.len(), 1);
        assert_eq!(report.accepted.len(), 1);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].position, 1);
        assert_eq!(
            report.rejected[0].reason,
            ValidationError::Duplicate {
                name: "a.pdf".to_string()
            }
        );
        assert_eq!(report.dropped, 0);
        assert_eq!(report.rejected[0].kind(), ErrorKind::ValidationRejected);
    }

    #[test]
    fn test_inline_size_used_for_duplicate_key() {
        let mut registry = BatchRegistry::new();
        let inline = |len: usize| Candidate {
            name: Some("scan.png".to_string()),
            payload: Some(Payload::inline(vec![0u8; len])),
            ..Candidate::default()
        };
        let report = intake(&mut registry, &validator(), 100, vec![inline(10), inline(20), inline(10)]);

        assert_eq!(report.accepted.len(), 2);
        assert_eq!(registry.list()[0].size, Some(10));
        assert_eq!(report.rejected[0].position, 2);
    }

    #[test]
    fn test_unreadable_file_reported_not_registered() {
        let mut registry = BatchRegistry::new();
        let report = intake(
            &mut registry,
            &validator(),
            100,
            vec![Candidate::unreadable(Path::new("/gone/ghost.pdf"), "No such file or directory")],
        );

        assert!(registry.is_empty());
        assert_eq!(report.rejected[0].name.as_deref(), Some("ghost.pdf"));
        assert!(matches!(report.rejected[0].reason, ValidationError::Unreadable { .. }));
    }

    #[test]
    fn test_disallowed_extension_never_registered() {
        let mut registry = BatchRegistry::new();
        let report = intake(
            &mut registry,
            &validator(),
            100,
            vec![Candidate::name_only("b.exe")],
        );

        assert!(registry.is_empty());
        assert!(matches!(
            report.rejected[0].reason,
            ValidationError::DisallowedExtension { .. }
        ));
    }

    #[test]
    fn test_resubmission_in_later_call_is_duplicate() {
        let mut registry = BatchRegistry::new();
        intake(&mut registry, &validator(), 100, vec![Candidate::from_bytes("c.pdf", b"abc".to_vec())]);
        let report = intake(&mut registry, &validator(), 100, vec![Candidate::from_bytes("c.pdf", b"abc".to_vec())]);

        assert!(report.accepted.is_empty());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_cap_accepts_remaining_capacity_in_order() {
        let mut registry = BatchRegistry::new();
        registry.add("existing.pdf", None, None).unwrap();

        let candidates = (0..5)
            .map(|i| Candidate::name_only(format!("doc{}.pdf", i)))
            .collect();
        let report = intake(&mut registry, &validator(), 3, candidates);

        assert_eq!(report.accepted.len(), 2);
        assert_eq!(report.dropped, 3);
        let names: Vec<_> = registry.list().iter().map(|i| i.name.clone()).collect();
        assert_eq!(names, vec!["existing.pdf", "doc0.pdf", "doc1.pdf"]);
        let dropped_positions: Vec<_> = report
            .rejected
            .iter()
            .filter(|r| matches!(r.reason, ValidationError::BatchCapExceeded { .. }))
            .map(|r| r.position)
            .collect();
        assert_eq!(dropped_positions, vec![2, 3, 4]);
    }

    #[test]
    fn test_invalid_files_do_not_consume_capacity() {
        let mut registry = BatchRegistry::new();
        let report = intake(
            &mut registry,
            &validator(),
            1,
            vec![Candidate::name_only("x.exe"), Candidate::name_only("ok.pdf")],
        );

        assert_eq!(report.accepted.len(), 1);
        assert_eq!(report.dropped, 0);
        assert_eq!(registry.list()[0].name, "ok.pdf");
    }
}
