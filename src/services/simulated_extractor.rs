//! 本地模拟提取 - 业务能力层
//!
//! 后端不可达时生成占位结果，保证离线/演示模式下流程仍然完整。
//! 结果来源标记为 `ResultSource::Simulated`，不会与真实结果混淆。

use crate::config::Config;
use crate::error::ExtractionError;
use crate::models::candidate::document_type_label;
use crate::models::item::{ExtractionResult, ResultSource};
use crate::services::extractor::{ExtractionJob, Extractor};
use crate::services::remote_extractor::source_format;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

/// 模拟置信度下限（含）
const MIN_CONFIDENCE: f64 = 0.7;
/// 模拟置信度上限（不含）
const MAX_CONFIDENCE: f64 = 1.0;

/// 本地模拟提取
pub struct SimulatedExtractor {
    rng: Mutex<StdRng>,
    failure_rate: f64,
    latency_ms: Option<RangeInclusive<u64>>,
}

impl SimulatedExtractor {
    /// 按配置创建（失败率、延迟范围）
    pub fn new(config: &Config) -> Self {
        let latency = config.simulation_latency_min_ms..=config.simulation_latency_max_ms;
        Self::with_rng(
            StdRng::from_entropy(),
            config.simulation_failure_rate,
            (config.simulation_latency_max_ms > 0).then_some(latency),
        )
    }

    /// 固定随机种子、无延迟，便于测试复现
    pub fn seeded(seed: u64, failure_rate: f64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), failure_rate, None)
    }

    fn with_rng(rng: StdRng, failure_rate: f64, latency_ms: Option<RangeInclusive<u64>>) -> Self {
        Self {
            rng: Mutex::new(rng),
            failure_rate: failure_rate.clamp(0.0, 1.0),
            latency_ms,
        }
    }

    /// 一次性抽取本次模拟需要的随机值，锁不跨越 await
    fn draw(&self) -> Draw {
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        Draw {
            fail: rng.gen_bool(self.failure_rate),
            confidence: rng.gen_range(MIN_CONFIDENCE..MAX_CONFIDENCE),
            pages: rng.gen_range(1..=50),
            fallback_size: rng.gen_range(10_000..1_010_000),
            delay_ms: self
                .latency_ms
                .clone()
                .map(|range| rng.gen_range(range))
                .unwrap_or(0),
        }
    }
}

struct Draw {
    fail: bool,
    confidence: f64,
    pages: u32,
    fallback_size: u64,
    delay_ms: u64,
}

#[async_trait]
impl Extractor for SimulatedExtractor {
    fn label(&self) -> &'static str {
        "本地模拟"
    }

    async fn ensure_available(&self) -> Result<(), ExtractionError> {
        Ok(())
    }

    async fn extract(&self, job: &ExtractionJob) -> Result<ExtractionResult, ExtractionError> {
        let draw = self.draw();

        if draw.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(draw.delay_ms)).await;
        }

        if draw.fail {
            debug!("模拟提取注入失败: {}", job.name);
            return Err(ExtractionError::Simulated {
                name: job.name.clone(),
            });
        }

        Ok(ExtractionResult {
            document_type: document_type_label(&job.name).to_string(),
            extracted_text: format!("从文件 {} 提取的文本（本地模拟）...", job.name),
            confidence: Some(draw.confidence),
            page_count: draw.pages,
            size_bytes: Some(job.size.unwrap_or(draw.fallback_size)),
            source_format: source_format(&job.name),
            source: ResultSource::Simulated,
        })
    }
}
