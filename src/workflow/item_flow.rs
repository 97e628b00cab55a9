//! 条目处理流程 - 流程层
//!
//! 核心职责：定义"一个文件"的完整处理流程
//!
//! 流程顺序：
//! 1. 检查后端是否可达
//! 2. 可达 → 后端提取；失败即为错误，不再回退
//! 3. 不可达 → 本地模拟（兜底）

use crate::models::item::{ItemError, ItemStatus};
use crate::services::extractor::{ExtractionJob, Extractor};
use crate::utils::logging::truncate_text;
use crate::workflow::item_ctx::ItemCtx;
use std::sync::Arc;
use tracing::{error, info, warn};

/// 条目处理流程
///
/// - 决定使用哪个提取策略
/// - 把提取结果转换为终态（成功或错误）
/// - 不持有批次状态
pub struct ItemFlow {
    primary: Arc<dyn Extractor>,
    fallback: Arc<dyn Extractor>,
    question: Option<String>,
    verbose_logging: bool,
}

impl ItemFlow {
    /// 创建新的条目处理流程
    pub fn new(primary: Arc<dyn Extractor>, fallback: Arc<dyn Extractor>) -> Self {
        Self {
            primary,
            fallback,
            question: None,
            verbose_logging: false,
        }
    }

    /// 批次统一的提取指令
    pub fn with_question(mut self, question: Option<String>) -> Self {
        self.question = question;
        self
    }

    pub fn with_verbose_logging(mut self, verbose: bool) -> Self {
        self.verbose_logging = verbose;
        self
    }

    pub fn question(&self) -> Option<&str> {
        self.question.as_deref()
    }

    /// 处理单个文件，总是返回终态
    pub async fn run(&self, ctx: &ItemCtx, job: &ExtractionJob) -> ItemStatus {
        let extractor = match self.primary.ensure_available().await {
            Ok(()) => &self.primary,
            Err(e) => {
                warn!(
                    "{} ⚠️ {} [{:?}]，使用{}",
                    ctx,
                    e,
                    e.kind(),
                    self.fallback.label()
                );
                &self.fallback
            }
        };

        match extractor.extract(job).await {
            Ok(result) => {
                let confidence = result
                    .confidence
                    .map(|c| format!("{:.0}%", c * 100.0))
                    .unwrap_or_else(|| "未知".to_string());
                info!(
                    "{} ✓ {}提取完成 (置信度: {})",
                    ctx,
                    extractor.label(),
                    confidence
                );
                if self.verbose_logging {
                    info!("{}   {}", ctx, truncate_text(&result.extracted_text, 80));
                }
                ItemStatus::Success(result)
            }
            Err(e) => {
                error!("{} ❌ {}提取失败: {}", ctx, extractor.label(), e);
                ItemStatus::Error(ItemError::new(format!("{}: {}", ctx.name, e), e.kind()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, ExtractionError, ServiceErrorKind};
    use crate::models::item::{ExtractionResult, ItemId, ResultSource};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 可控的测试提取器
    struct FakeExtractor {
        available: bool,
        fail_with_status: Option<u16>,
        calls: AtomicUsize,
    }

    impl FakeExtractor {
        fn new(available: bool, fail_with_status: Option<u16>) -> Arc<Self> {
            Arc::new(Self {
                available,
                fail_with_status,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Extractor for FakeExtractor {
        fn label(&self) -> &'static str {
            "fake"
        }

        async fn ensure_available(&self) -> Result<(), ExtractionError> {
            if self.available {
                Ok(())
            } else {
                Err(ExtractionError::BackendUnreachable {
                    url: "http://fake".to_string(),
                })
            }
        }

        async fn extract(&self, job: &ExtractionJob) -> Result<ExtractionResult, ExtractionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(status) = self.fail_with_status {
                return Err(ExtractionError::Service {
                    endpoint: "/json-query".to_string(),
                    status,
                    kind: ServiceErrorKind::from_status(status),
                    detail: "backend detail".to_string(),
                });
            }
            Ok(ExtractionResult {
                document_type: "PDF 文档".to_string(),
                extracted_text: job.name.clone(),
                confidence: Some(0.95),
                page_count: 1,
                size_bytes: job.size,
                source_format: "PDF".to_string(),
                source: ResultSource::Backend { model: None },
            })
        }
    }

    fn job() -> (ItemCtx, ExtractionJob) {
        let ctx = ItemCtx::new(ItemId(1), 0, 1, "d.pdf");
        let job = ExtractionJob {
            item_id: ItemId(1),
            name: "d.pdf".to_string(),
            size: Some(10),
            payload: None,
            question: None,
        };
        (ctx, job)
    }

    #[tokio::test]
    async fn test_reachable_backend_is_used() {
        let primary = FakeExtractor::new(true, None);
        let fallback = FakeExtractor::new(true, None);
        let flow = ItemFlow::new(primary.clone(), fallback.clone());
        let (ctx, job) = job();

        assert!(flow.run(&ctx, &job).await.is_success());
        assert_eq!(primary.calls.load(Ordering::SeqCst), 1);
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_backend_failure_does_not_fall_back() {
        let primary = FakeExtractor::new(true, Some(507));
        let fallback = FakeExtractor::new(true, None);
        let flow = ItemFlow::new(primary.clone(), fallback.clone());
        let (ctx, job) = job();

        match flow.run(&ctx, &job).await {
            ItemStatus::Error(error) => {
                assert_eq!(error.kind, ErrorKind::ServiceError(ServiceErrorKind::OutOfMemory));
                assert!(error.message.contains("backend detail"));
                assert!(error.message.contains("d.pdf"));
            }
            other => panic!("unexpected status: {:?}", other),
        }
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unreachable_backend_uses_fallback() {
        let primary = FakeExtractor::new(false, None);
        let fallback = FakeExtractor::new(true, None);
        let flow = ItemFlow::new(primary.clone(), fallback.clone());
        let (ctx, job) = job();

        assert!(flow.run(&ctx, &job).await.is_success());
        assert_eq!(primary.calls.load(Ordering::SeqCst), 0);
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 1);
    }
}
