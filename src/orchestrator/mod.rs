//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批次状态和流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `session` - 批次会话
//! - 持有登记表（`BatchRegistry`）、运行标志和最近一次进度
//! - 接收文件、清空批次、导出结果
//! - 运行中拒绝修改
//!
//! ### `batch_processor` - 批次处理器
//! - 按提交顺序遍历条目（`Vec<Item>`）
//! - 驱动状态流转并上报进度
//! - 输出本次运行的统计
//!
//! ### `progress` - 进度上报
//!
//! ### `app` - 应用入口
//! - 组装客户端与提取策略，完成一整轮处理和导出
//!
//! ## 层次关系
//!
//! ```text
//! app (接收 → 处理 → 导出)
//!     ↓
//! batch_processor (处理 Vec<Item>)
//!     ↓
//! workflow::ItemFlow (处理单个 Item)
//!     ↓
//! services (能力层：validate / registry / extract / export)
//!     ↓
//! infrastructure (基础设施：ExtractionClient)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：session 管状态，batch_processor 管调度
//! 2. **资源隔离**：只有基础设施层持有 HTTP 客户端
//! 3. **向下依赖**：编排层 → workflow → services → infrastructure
//! 4. **无业务逻辑**：只做调度和统计，不做具体业务判断

pub mod app;
pub mod batch_processor;
pub mod progress;
pub mod session;

// 重新导出主要类型
pub use app::App;
pub use batch_processor::{ProcessingOrchestrator, RunSummary};
pub use progress::{LogProgress, ProgressSink, ProgressUpdate};
pub use session::BatchSession;
