//! 文件校验服务 - 业务能力层
//!
//! 只负责判断单个候选文件能否进入批次，不关心批次状态

use crate::config::Config;
use crate::error::ValidationError;
use crate::models::candidate::{file_extension, Candidate};

/// 文件校验服务
///
/// 职责：
/// - 文件名必须可解析
/// - 加载阶段失败的文件直接拒绝
/// - 已知大小时不得超过上限
/// - 有扩展名时必须在允许列表中
/// - 重复检测不在这里做，由登记表负责
#[derive(Debug, Clone)]
pub struct FileValidator {
    max_file_size_bytes: u64,
    allowed_extensions: Vec<String>,
}

impl FileValidator {
    /// 创建新的校验服务
    pub fn new(config: &Config) -> Self {
        Self::with_rules(config.max_file_size_bytes, config.allowed_extensions.clone())
    }

    /// 使用自定义规则创建
    pub fn with_rules(max_file_size_bytes: u64, allowed_extensions: Vec<String>) -> Self {
        Self {
            max_file_size_bytes,
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    /// 校验候选文件，按顺序应用规则，第一个失败的规则生效
    pub fn validate(&self, candidate: &Candidate) -> Result<(), ValidationError> {
        let name = candidate
            .resolved_name()
            .ok_or(ValidationError::MissingName)?;

        if let Some(reason) = &candidate.load_error {
            return Err(ValidationError::Unreadable {
                name: name.to_string(),
                reason: reason.clone(),
            });
        }

        if let Some(size) = candidate.effective_size() {
            if size > self.max_file_size_bytes {
                return Err(ValidationError::FileTooLarge {
                    name: name.to_string(),
                    limit_bytes: self.max_file_size_bytes,
                });
            }
        }

        if let Some(extension) = file_extension(name) {
            if !self.allowed_extensions.iter().any(|allowed| *allowed == extension) {
                return Err(ValidationError::DisallowedExtension {
                    name: name.to_string(),
                    extension,
                });
            }
        }

        Ok(())
    }
}
