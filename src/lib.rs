//! # Doc Batch Client
//!
//! 批量提交文档/图片到提取服务、跟踪进度并导出结果的 Rust 客户端
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（HTTP 客户端），只暴露能力
//! - `ExtractionClient` - 唯一的 client owner，提供 probe() / extract() 能力
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，每个服务只做一件事
//! - `FileValidator` - 单个文件的准入校验
//! - `BatchRegistry` - 有序登记表与计数
//! - `RemoteExtractor` / `SimulatedExtractor` - 提取策略
//! - `ResultExporter` - 导出成功结果
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个文件"的完整处理流程
//! - `ItemCtx` - 上下文封装（第几个文件 / 共几个）
//! - `ItemFlow` - 流程编排（健康检查 → 后端提取 | 本地模拟）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/session` - 批次会话状态
//! - `orchestrator/batch_processor` - 批次处理器，顺序驱动状态流转
//! - `orchestrator/app` - 应用入口
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult, ErrorKind, ServiceErrorKind};
pub use infrastructure::ExtractionClient;
pub use models::{Candidate, Item, ItemId, ItemStatus};
pub use orchestrator::{App, BatchSession, ProcessingOrchestrator, RunSummary};
pub use services::{BatchRegistry, FileValidator, ResultExporter};
pub use workflow::{ItemCtx, ItemFlow};
