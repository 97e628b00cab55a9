//! 后端提取服务 - 业务能力层
//!
//! 只负责"调用后端并把响应转换为提取结果"，不关心流程

use crate::error::ExtractionError;
use crate::infrastructure::{ExtractionClient, ExtractionRequest, ExtractionResponse};
use crate::models::candidate::{document_type_label, file_extension};
use crate::models::item::{ExtractionResult, ResultSource};
use crate::services::extractor::{ExtractionJob, Extractor};
use async_trait::async_trait;
use tracing::debug;

/// 后端提取服务
pub struct RemoteExtractor {
    client: ExtractionClient,
}

impl RemoteExtractor {
    pub fn new(client: ExtractionClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Extractor for RemoteExtractor {
    fn label(&self) -> &'static str {
        "后端服务"
    }

    async fn ensure_available(&self) -> Result<(), ExtractionError> {
        if self.client.probe().await {
            Ok(())
        } else {
            Err(ExtractionError::BackendUnreachable {
                url: self.client.base_url().to_string(),
            })
        }
    }

    async fn extract(&self, job: &ExtractionJob) -> Result<ExtractionResult, ExtractionError> {
        let request = ExtractionRequest {
            file_name: job.name.clone(),
            payload: job.payload.clone(),
            question: job.question.clone(),
        };

        let response = self.client.extract(&request).await?;
        debug!(
            "后端返回 {} 字符，模型: {:?}",
            response.response.chars().count(),
            response.model
        );

        Ok(to_extraction_result(job, response))
    }
}

/// 把后端响应转换为提取结果
///
/// 后端未给出置信度时留空，未给出页数时记为 1
pub fn to_extraction_result(job: &ExtractionJob, response: ExtractionResponse) -> ExtractionResult {
    let confidence = response
        .extra
        .get("confidence")
        .and_then(|v| v.as_f64())
        .filter(|c| (0.0..=1.0).contains(c));

    let page_count = ["page_count", "pages"]
        .iter()
        .find_map(|key| response.extra.get(*key).and_then(|v| v.as_u64()))
        .and_then(|n| u32::try_from(n).ok())
        .filter(|n| *n > 0)
        .unwrap_or(1);

    ExtractionResult {
        document_type: document_type_label(&job.name).to_string(),
        extracted_text: response.response,
        confidence,
        page_count,
        size_bytes: job.size,
        source_format: source_format(&job.name),
        source: ResultSource::Backend {
            model: response.model,
        },
    }
}

/// 大写扩展名，没有扩展名时为空字符串
pub fn source_format(name: &str) -> String {
    file_extension(name)
        .map(|ext| ext.to_ascii_uppercase())
        .unwrap_or_default()
}
