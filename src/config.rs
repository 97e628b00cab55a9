use crate::error::{AppError, AppResult, ConfigError};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// 默认允许的扩展名：文档与常见图片格式
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &[
    "pdf", "dwg", "dxf", "arp", "gsfx", "xml", "rtf", "xlsx", "docx", "json", "jpg", "jpeg",
    "png", "gif", "bmp", "tiff", "tif", "ico", "webp",
];

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 提取服务地址
    pub backend_base_url: String,
    /// 单个批次最多文件数
    pub max_files: usize,
    /// 单个文件大小上限（字节）
    pub max_file_size_bytes: u64,
    /// 允许的扩展名（小写，不含点）
    pub allowed_extensions: Vec<String>,
    /// 回复语言
    pub response_language: String,
    // --- 超时配置 ---
    pub probe_timeout_secs: u64,
    pub extraction_timeout_secs: u64,
    /// 统一的提取指令（为空时按文件名生成）
    pub default_question: Option<String>,
    // --- 离线模拟配置 ---
    pub simulation_failure_rate: f64,
    pub simulation_latency_min_ms: u64,
    pub simulation_latency_max_ms: u64,
    /// 导出目录
    pub export_dir: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_base_url: "http://localhost:8080".to_string(),
            max_files: 100,
            max_file_size_bytes: 50 * 1024 * 1024,
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            response_language: "ru".to_string(),
            probe_timeout_secs: 5,
            extraction_timeout_secs: 6 * 60,
            default_question: None,
            simulation_failure_rate: 0.1,
            simulation_latency_min_ms: 1000,
            simulation_latency_max_ms: 3000,
            export_dir: "exports".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从环境变量覆盖默认配置
    pub fn from_env() -> Self {
        Self::default().overlay_env()
    }

    /// 加载配置：TOML 文件（可选）→ 环境变量 → 校验
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let base = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        let config = base.overlay_env();
        config.validate()?;
        Ok(config)
    }

    /// 从 TOML 文件读取，缺省字段使用默认值
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| match e {
            AppError::Config(ConfigError::ParseFailed { message, .. }) => {
                AppError::Config(ConfigError::ParseFailed {
                    path: path.display().to_string(),
                    message,
                })
            }
            other => other,
        })
    }

    /// 从 TOML 文本解析
    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        toml::from_str(content).map_err(|e| {
            AppError::Config(ConfigError::ParseFailed {
                path: String::new(),
                message: e.to_string(),
            })
        })
    }

    fn overlay_env(self) -> Self {
        let base = self;
        Self {
            backend_base_url: std::env::var("BACKEND_BASE_URL").unwrap_or(base.backend_base_url),
            max_files: std::env::var("MAX_FILES").ok().and_then(|v| v.parse().ok()).unwrap_or(base.max_files),
            max_file_size_bytes: std::env::var("MAX_FILE_SIZE_BYTES").ok().and_then(|v| v.parse().ok()).unwrap_or(base.max_file_size_bytes),
            allowed_extensions: std::env::var("ALLOWED_EXTENSIONS").ok().map(|v| parse_extension_list(&v)).unwrap_or(base.allowed_extensions),
            response_language: std::env::var("RESPONSE_LANGUAGE").unwrap_or(base.response_language),
            probe_timeout_secs: std::env::var("PROBE_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(base.probe_timeout_secs),
            extraction_timeout_secs: std::env::var("EXTRACTION_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(base.extraction_timeout_secs),
            default_question: std::env::var("DEFAULT_QUESTION").ok().or(base.default_question),
            simulation_failure_rate: std::env::var("SIMULATION_FAILURE_RATE").ok().and_then(|v| v.parse().ok()).unwrap_or(base.simulation_failure_rate),
            simulation_latency_min_ms: std::env::var("SIMULATION_LATENCY_MIN_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(base.simulation_latency_min_ms),
            simulation_latency_max_ms: std::env::var("SIMULATION_LATENCY_MAX_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(base.simulation_latency_max_ms),
            export_dir: std::env::var("EXPORT_DIR").unwrap_or(base.export_dir),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(base.verbose_logging),
        }
    }

    /// 校验配置取值
    pub fn validate(&self) -> AppResult<()> {
        if self.backend_base_url.trim().is_empty() {
            return Err(AppError::invalid_config("backend_base_url", &self.backend_base_url, "不能为空"));
        }
        if self.max_files == 0 {
            return Err(AppError::invalid_config("max_files", self.max_files, "必须大于 0"));
        }
        if self.max_file_size_bytes == 0 {
            return Err(AppError::invalid_config("max_file_size_bytes", self.max_file_size_bytes, "必须大于 0"));
        }
        if !(0.0..=1.0).contains(&self.simulation_failure_rate) {
            return Err(AppError::invalid_config("simulation_failure_rate", self.simulation_failure_rate, "必须在 [0, 1] 之间"));
        }
        if self.simulation_latency_min_ms > self.simulation_latency_max_ms {
            return Err(AppError::invalid_config("simulation_latency_min_ms", self.simulation_latency_min_ms, "不能大于 simulation_latency_max_ms"));
        }
        Ok(())
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_secs(self.extraction_timeout_secs)
    }
}

/// 解析逗号分隔的扩展名列表，统一为小写且去掉前导点
fn parse_extension_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect()
}
