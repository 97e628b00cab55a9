//! 结果导出服务 - 业务能力层
//!
//! 只读取登记表中的成功条目，生成导出数据，不修改任何状态

use crate::error::{AppResult, ExportError};
use crate::models::item::{Item, ResultSource};
use crate::services::batch_registry::BatchRegistry;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{json, Value as JsonValue};
use std::path::{Path, PathBuf};
use tracing::info;

/// 导出数据
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPayload {
    /// ISO-8601 时间戳
    pub timestamp: String,
    pub total_items: usize,
    pub succeeded_count: usize,
    pub failed_count: usize,
    pub results: Vec<ExportEntry>,
}

/// 单个成功条目
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEntry {
    pub name: String,
    pub document_type: String,
    pub confidence: Option<f64>,
    pub extracted_data: JsonValue,
}

/// 结果导出服务
pub struct ResultExporter;

impl ResultExporter {
    /// 生成导出数据，没有成功条目时返回 `NoData`
    pub fn export(registry: &BatchRegistry) -> Result<ExportPayload, ExportError> {
        let results: Vec<ExportEntry> = registry.successes().filter_map(to_entry).collect();

        if results.is_empty() {
            return Err(ExportError::NoData);
        }

        let counters = registry.counters();
        Ok(ExportPayload {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            total_items: counters.total,
            succeeded_count: counters.succeeded,
            failed_count: counters.failed,
            results,
        })
    }
}

fn to_entry(item: &Item) -> Option<ExportEntry> {
    let result = item.result()?;
    let (source, model) = match &result.source {
        ResultSource::Backend { model } => ("backend", model.clone()),
        ResultSource::Simulated => ("simulated", None),
    };

    Some(ExportEntry {
        name: item.name.clone(),
        document_type: result.document_type.clone(),
        confidence: result.confidence,
        extracted_data: json!({
            "title": format!("文档: {}", item.name),
            "extractedText": result.extracted_text,
            "pages": result.page_count,
            "metadata": {
                "size": result.size_bytes,
                "format": result.source_format,
                "source": source,
                "model": model,
            }
        }),
    })
}

impl ExportPayload {
    pub fn to_json_pretty(&self) -> AppResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| std::io::Error::other(e).into())
    }

    /// 写入导出目录，文件名包含时间戳
    ///
    /// # 返回
    /// 返回写入的文件路径
    pub async fn save_to_dir(&self, dir: &Path) -> AppResult<PathBuf> {
        tokio::fs::create_dir_all(dir).await?;
        let file_name = format!(
            "batch-export-{}.json",
            Utc::now().format("%Y%m%d-%H%M%S")
        );
        let path = dir.join(file_name);
        tokio::fs::write(&path, self.to_json_pretty()?).await?;
        info!("💾 导出 {} 条结果至: {}", self.results.len(), path.display());
        Ok(path)
    }
}
