//! 批次会话状态
//!
//! 持有登记表、运行标志和最近一次进度，替代散落的全局可变状态。
//! 所有锁都只在同步代码中短暂持有，不跨越 await。

use crate::config::Config;
use crate::error::{AppError, AppResult, BatchError, ExportError};
use crate::models::candidate::Candidate;
use crate::models::item::{BatchCounters, Item};
use crate::orchestrator::progress::ProgressUpdate;
use crate::services::batch_registry::BatchRegistry;
use crate::services::file_validator::FileValidator;
use crate::services::intake::{intake, IntakeReport};
use crate::services::result_exporter::{ExportPayload, ResultExporter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

/// 批次会话
pub struct BatchSession {
    registry: Mutex<BatchRegistry>,
    active: AtomicBool,
    progress: Mutex<ProgressUpdate>,
    validator: FileValidator,
    max_files: usize,
}

impl BatchSession {
    /// 创建空会话
    pub fn new(config: &Config) -> Self {
        Self::with_rules(FileValidator::new(config), config.max_files)
    }

    pub fn with_rules(validator: FileValidator, max_files: usize) -> Self {
        Self {
            registry: Mutex::new(BatchRegistry::new()),
            active: AtomicBool::new(false),
            progress: Mutex::new(ProgressUpdate::ready()),
            validator,
            max_files,
        }
    }

    /// 接收一组文件；运行中不允许
    pub fn intake(&self, candidates: Vec<Candidate>) -> AppResult<IntakeReport> {
        let mut registry = self.registry();
        if self.is_active() {
            return Err(AppError::busy("添加文件"));
        }
        Ok(intake(&mut registry, &self.validator, self.max_files, candidates))
    }

    /// 当前条目的副本（插入顺序）
    pub fn snapshot(&self) -> Vec<Item> {
        self.registry().list().to_vec()
    }

    pub fn counters(&self) -> BatchCounters {
        self.registry().counters()
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    pub fn is_empty(&self) -> bool {
        self.registry().is_empty()
    }

    /// 最近一次进度
    pub fn progress(&self) -> ProgressUpdate {
        lock(&self.progress).clone()
    }

    /// 导出当前成功的条目，只读
    pub fn export(&self) -> Result<ExportPayload, ExportError> {
        ResultExporter::export(&self.registry())
    }

    /// 清空批次，计数和进度回到初始状态；运行中不允许
    pub fn clear(&self) -> AppResult<()> {
        let mut registry = self.registry();
        if self.is_active() {
            return Err(AppError::busy("清空批次"));
        }
        registry.clear();
        *lock(&self.progress) = ProgressUpdate::ready();
        Ok(())
    }

    /// 开始一次运行
    ///
    /// 批次为空或已有运行时直接拒绝，不改变任何状态。
    /// 返回的守卫在销毁时清除运行标志。
    pub(crate) fn begin_run(&self) -> AppResult<ActiveRun<'_>> {
        let mut registry = self.registry();
        if self.is_active() {
            return Err(BatchError::AlreadyRunning.into());
        }
        if registry.is_empty() {
            return Err(BatchError::EmptyBatch.into());
        }
        if self
            .active
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(BatchError::AlreadyRunning.into());
        }
        registry.reset_for_run();
        Ok(ActiveRun { session: self })
    }

    pub(crate) fn registry(&self) -> MutexGuard<'_, BatchRegistry> {
        lock(&self.registry)
    }

    pub(crate) fn set_progress(&self, update: ProgressUpdate) {
        *lock(&self.progress) = update;
    }
}

/// 运行守卫：无论正常结束、出错还是 panic，都会清除运行标志
pub(crate) struct ActiveRun<'a> {
    session: &'a BatchSession,
}

impl Drop for ActiveRun<'_> {
    fn drop(&mut self) {
        self.session.active.store(false, Ordering::SeqCst);
    }
}

/// 获取锁；持锁方 panic 后数据仍可用
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
