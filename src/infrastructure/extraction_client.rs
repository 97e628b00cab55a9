//! 提取服务客户端 - 基础设施层
//!
//! 持有唯一的 HTTP 客户端，只暴露"健康检查"和"提取"两种能力

use crate::config::Config;
use crate::error::{ExtractionError, ServiceErrorKind};
use crate::models::candidate::{ContentClass, Payload};
use crate::utils::logging::truncate_text;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};
use std::time::Duration;
use tracing::{debug, warn};

/// 原始响应文本在错误信息中的最大预览长度
const ERROR_PREVIEW_CHARS: usize = 200;

/// 提取接口
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `POST /vision-query`，字段 `image_file`
    Vision,
    /// `POST /json-query`，字段 `json_file`
    Json,
}

impl Endpoint {
    pub fn for_class(class: ContentClass) -> Self {
        match class {
            ContentClass::Image => Endpoint::Vision,
            ContentClass::Document => Endpoint::Json,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Vision => "/vision-query",
            Endpoint::Json => "/json-query",
        }
    }

    pub fn file_field(&self) -> &'static str {
        match self {
            Endpoint::Vision => "image_file",
            Endpoint::Json => "json_file",
        }
    }
}

/// 单次提取请求
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    pub file_name: String,
    pub payload: Option<Payload>,
    /// 为空时根据文件名生成默认指令
    pub question: Option<String>,
}

/// 成功响应 `{response, model?, ...}`
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionResponse {
    pub response: String,
    pub model: Option<String>,
    pub prompt: Option<String>,
    /// 其余字段原样保留
    pub extra: Map<String, JsonValue>,
}

/// 失败响应中的 `detail` 字段
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Text(String),
    Structured {
        error: String,
        #[serde(default)]
        payload: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: ErrorDetail,
}

/// 提取服务客户端
///
/// 职责：
/// - 持有 reqwest::Client 与后端地址
/// - 健康检查使用短超时，提取使用长超时
/// - 把 HTTP 结果归类为 ExtractionError
/// - 不认识 Item / 批次
#[derive(Debug, Clone)]
pub struct ExtractionClient {
    http: reqwest::Client,
    base_url: String,
    response_language: String,
    probe_timeout: Duration,
    extraction_timeout: Duration,
}

impl ExtractionClient {
    /// 创建新的提取服务客户端
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.backend_base_url.trim_end_matches('/').to_string(),
            response_language: config.response_language.clone(),
            probe_timeout: config.probe_timeout(),
            extraction_timeout: config.extraction_timeout(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 健康检查：`GET /health`，2xx 视为可达，其余情况一律不可达
    pub async fn probe(&self) -> bool {
        let url = self.url("/health");
        match self.http.get(&url).timeout(self.probe_timeout).send().await {
            Ok(response) if response.status().is_success() => {
                debug!("后端健康检查通过: {}", url);
                true
            }
            Ok(response) => {
                warn!("后端健康检查失败: {} 返回 {}", url, response.status());
                false
            }
            Err(e) => {
                warn!("后端不可达: {} ({})", url, e);
                false
            }
        }
    }

    /// 调用提取接口
    ///
    /// # 参数
    /// - `request`: 文件名、内容和可选的指令
    ///
    /// # 返回
    /// 返回解析后的响应；响应缺少 `response` 字段时视为格式错误
    pub async fn extract(
        &self,
        request: &ExtractionRequest,
    ) -> Result<ExtractionResponse, ExtractionError> {
        let endpoint = Endpoint::for_class(ContentClass::from_name(&request.file_name));
        let bytes = read_payload(&request.file_name, request.payload.as_ref()).await?;
        let question = request
            .question
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| default_question(&request.file_name, &self.response_language));

        debug!(
            "调用提取接口 {}，文件: {}，大小: {} 字节",
            endpoint.path(),
            request.file_name,
            bytes.len()
        );

        let form = Form::new()
            .part(
                endpoint.file_field(),
                Part::bytes(bytes).file_name(request.file_name.clone()),
            )
            .text("question", question)
            .text("response_language", self.response_language.clone());

        let response = self
            .http
            .post(self.url(endpoint.path()))
            .multipart(form)
            .timeout(self.extraction_timeout)
            .send()
            .await
            .map_err(|e| self.transport_error(endpoint, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(endpoint, e))?;

        if !status.is_success() {
            let detail = decode_error_detail(status.as_u16(), &body);
            warn!(
                "提取接口返回错误 {} (HTTP {}): {}",
                endpoint.path(),
                status.as_u16(),
                detail
            );
            return Err(ExtractionError::Service {
                endpoint: endpoint.path().to_string(),
                status: status.as_u16(),
                kind: ServiceErrorKind::from_status(status.as_u16()),
                detail,
            });
        }

        parse_success_body(endpoint, &body)
    }

    fn transport_error(&self, endpoint: Endpoint, error: reqwest::Error) -> ExtractionError {
        if error.is_timeout() {
            ExtractionError::Timeout {
                endpoint: endpoint.path().to_string(),
                timeout_secs: self.extraction_timeout.as_secs(),
            }
        } else {
            ExtractionError::Transport {
                endpoint: endpoint.path().to_string(),
                source: error,
            }
        }
    }
}

/// 读取待上传的字节
async fn read_payload(name: &str, payload: Option<&Payload>) -> Result<Vec<u8>, ExtractionError> {
    match payload {
        Some(Payload::Inline(bytes)) => Ok(bytes.to_vec()),
        Some(Payload::File { path }) => {
            tokio::fs::read(path)
                .await
                .map_err(|e| ExtractionError::PayloadUnavailable {
                    name: name.to_string(),
                    reason: format!("无法读取 {}: {}", path.display(), e),
                })
        }
        None => Err(ExtractionError::PayloadUnavailable {
            name: name.to_string(),
            reason: "仅有文件名引用".to_string(),
        }),
    }
}

/// 根据文件名生成默认指令
pub fn default_question(file_name: &str, response_language: &str) -> String {
    match response_language {
        "en" => format!(
            "Extract all fields, tables and text from the document \"{}\". Answer in English.",
            file_name
        ),
        _ => format!(
            "Извлеки все поля, таблицы и текст из документа «{}». Ответь на русском языке.",
            file_name
        ),
    }
}

/// 解析错误响应的原因
///
/// 优先使用 `detail` 字段（字符串或 `{error, payload}`），
/// 其次是截断的原始文本，最后只给出状态码
pub fn decode_error_detail(status: u16, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return match parsed.detail {
            ErrorDetail::Text(text) => text,
            ErrorDetail::Structured {
                error,
                payload: Some(payload),
            } if !payload.is_empty() => format!("{} ({})", error, truncate_text(&payload, ERROR_PREVIEW_CHARS)),
            ErrorDetail::Structured { error, .. } => error,
        };
    }

    let raw = body.trim();
    if !raw.is_empty() {
        return truncate_text(raw, ERROR_PREVIEW_CHARS);
    }

    format!("HTTP {}", status)
}

/// 解析成功响应
fn parse_success_body(endpoint: Endpoint, body: &str) -> Result<ExtractionResponse, ExtractionError> {
    let malformed = |reason: &str| ExtractionError::MalformedResponse {
        endpoint: endpoint.path().to_string(),
        reason: reason.to_string(),
    };

    let value: JsonValue = serde_json::from_str(body).map_err(|_| malformed("响应不是合法的 JSON"))?;
    let mut object = match value {
        JsonValue::Object(object) => object,
        _ => return Err(malformed("响应不是 JSON 对象")),
    };

    let response = match object.remove("response") {
        Some(JsonValue::String(text)) => text,
        Some(_) => return Err(malformed("response 字段不是字符串")),
        None => return Err(malformed("缺少 response 字段")),
    };
    let model = take_string(&mut object, "model");
    let prompt = take_string(&mut object, "prompt");

    Ok(ExtractionResponse {
        response,
        model,
        prompt,
        extra: object,
    })
}

fn take_string(object: &mut Map<String, JsonValue>, key: &str) -> Option<String> {
    match object.remove(key) {
        Some(JsonValue::String(text)) => Some(text),
        Some(other) if !other.is_null() => {
            object.insert(key.to_string(), other);
            None
        }
        _ => None,
    }
}
