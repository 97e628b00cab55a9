use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 文件校验错误（未进入批次）
    #[error("校验错误: {0}")]
    Validation(#[from] ValidationError),
    /// 批次登记表错误
    #[error("登记表错误: {0}")]
    Registry(#[from] RegistryError),
    /// 提取服务错误
    #[error("提取错误: {0}")]
    Extraction(#[from] ExtractionError),
    /// 批次运行状态错误
    #[error("批次错误: {0}")]
    Batch(#[from] BatchError),
    /// 导出错误
    #[error("导出错误: {0}")]
    Export(#[from] ExportError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 文件读写错误
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),
}

/// 文件校验错误
///
/// 被拒绝的文件永远不会进入登记表
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// 文件名为空或无法解析
    #[error("文件名为空或无法解析")]
    MissingName,
    /// 文件超过大小上限
    #[error("文件 {name} 超过大小上限 {} MB", format_mb(.limit_bytes))]
    FileTooLarge { name: String, limit_bytes: u64 },
    /// 文件无法读取（不存在或没有权限）
    #[error("文件 {name} 无法读取: {reason}")]
    Unreadable { name: String, reason: String },
    /// 扩展名不在允许列表中
    #[error("文件 {name} 的扩展名 .{extension} 不受支持")]
    DisallowedExtension { name: String, extension: String },
    /// 与已登记文件重复
    #[error("文件 {name} 已在批次中")]
    Duplicate { name: String },
    /// 超出批次容量
    #[error("文件 {name} 超出批次容量 ({max_files} 个)")]
    BatchCapExceeded { name: String, max_files: usize },
}

impl ValidationError {
    /// 错误类别标签
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::ValidationRejected
    }
}

/// 以 MB 为单位显示字节数，保留一位小数
fn format_mb(bytes: &u64) -> String {
    format!("{:.1}", *bytes as f64 / (1024.0 * 1024.0))
}

/// 批次登记表错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// 指定 ID 的条目不存在
    #[error("条目 #{id} 不存在")]
    NotFound { id: u64 },
}

/// 提取服务错误
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// 健康检查失败
    #[error("后端不可达: {url}")]
    BackendUnreachable { url: String },
    /// 请求超时
    #[error("请求超时 ({endpoint}, {timeout_secs} 秒)")]
    Timeout { endpoint: String, timeout_secs: u64 },
    /// 后端返回非 2xx 响应
    #[error("服务错误 ({endpoint}, HTTP {status}): {detail}")]
    Service {
        endpoint: String,
        status: u16,
        kind: ServiceErrorKind,
        detail: String,
    },
    /// 2xx 但响应缺少必要字段
    #[error("响应格式错误 ({endpoint}): {reason}")]
    MalformedResponse { endpoint: String, reason: String },
    /// 网络请求失败
    #[error("网络请求失败 ({endpoint}): {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// 没有可上传的文件内容
    #[error("文件 {name} 没有可上传的内容: {reason}")]
    PayloadUnavailable { name: String, reason: String },
    /// 模拟模式下注入的失败
    #[error("模拟提取失败: {name}")]
    Simulated { name: String },
}

impl ExtractionError {
    /// 错误类别标签
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExtractionError::BackendUnreachable { .. } => ErrorKind::BackendUnreachable,
            ExtractionError::Timeout { .. } => ErrorKind::Timeout,
            ExtractionError::Service { kind, .. } => ErrorKind::ServiceError(*kind),
            ExtractionError::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            ExtractionError::Transport { .. } => ErrorKind::Transport,
            ExtractionError::PayloadUnavailable { .. } => ErrorKind::PayloadUnavailable,
            ExtractionError::Simulated { .. } => ErrorKind::SimulatedFailure,
        }
    }
}

/// 批次运行状态错误
///
/// 均在任何状态变更之前被拒绝
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchError {
    /// 批次为空
    #[error("没有待处理的文件")]
    EmptyBatch,
    /// 已有运行中的批次
    #[error("批次正在处理中")]
    AlreadyRunning,
    /// 批次处理中，不允许修改
    #[error("批次处理中，暂不允许{action}")]
    Busy { action: &'static str },
}

/// 导出错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    /// 没有成功的条目可导出
    #[error("没有可导出的数据")]
    NoData,
}

/// 配置错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// 配置值不合法
    #[error("配置项 {key} 的值 '{value}' 不合法: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
    /// 配置文件解析失败
    #[error("配置文件 {path} 解析失败: {message}")]
    ParseFailed { path: String, message: String },
}

/// 后端服务错误的细分类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceErrorKind {
    /// 400 / 422
    BadRequest,
    /// 413
    PayloadTooLarge,
    /// 502 / 503 / 504，上游模型不可用
    ModelUnavailable,
    /// 507
    OutOfMemory,
    /// 500
    Internal,
    /// 其他状态码
    Other(u16),
}

impl ServiceErrorKind {
    /// 按 HTTP 状态码分类
    pub fn from_status(status: u16) -> Self {
        match status {
            400 | 422 => ServiceErrorKind::BadRequest,
            413 => ServiceErrorKind::PayloadTooLarge,
            502..=504 => ServiceErrorKind::ModelUnavailable,
            507 => ServiceErrorKind::OutOfMemory,
            500 => ServiceErrorKind::Internal,
            other => ServiceErrorKind::Other(other),
        }
    }
}

/// 条目错误类别标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ValidationRejected,
    BackendUnreachable,
    Timeout,
    ServiceError(ServiceErrorKind),
    MalformedResponse,
    Transport,
    PayloadUnavailable,
    SimulatedFailure,
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建配置值不合法错误
    pub fn invalid_config(key: &'static str, value: impl ToString, reason: &'static str) -> Self {
        AppError::Config(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
            reason,
        })
    }

    /// 创建批次忙碌错误
    pub fn busy(action: &'static str) -> Self {
        AppError::Batch(BatchError::Busy { action })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
