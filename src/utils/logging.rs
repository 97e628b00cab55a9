/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use crate::config::Config;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// 默认级别为 info，可通过 `RUST_LOG` 覆盖；重复调用不会报错
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `config`: 当前配置
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 批量文档提取模式");
    info!("🌐 提取服务: {}", config.backend_base_url);
    info!(
        "📊 批次上限: {} 个文件，单文件上限: {} MB",
        config.max_files,
        config.max_file_size_bytes / (1024 * 1024)
    );
    info!("{}", "=".repeat(60));
}

/// 记录文件接收结果
///
/// # 参数
/// - `accepted`: 接收数量
/// - `rejected`: 拒绝数量（含因容量丢弃的）
/// - `dropped`: 因容量丢弃的数量
pub fn log_intake(accepted: usize, rejected: usize, dropped: usize) {
    info!("✓ 已接收 {} 个文件", accepted);
    if rejected > 0 {
        warn!("⚠️ 拒绝 {} 个文件（其中超出容量 {} 个）", rejected, dropped);
    }
}

/// 记录批次开始信息
///
/// # 参数
/// - `total`: 文件总数
pub fn log_run_start(total: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始处理批次，共 {} 个文件", total);
    info!("{}", "=".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `success`: 成功数量
/// - `failed`: 失败数量
/// - `simulated`: 其中本地模拟的数量
/// - `total`: 总数
pub fn print_final_stats(success: usize, failed: usize, simulated: usize, total: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", success, total);
    if simulated > 0 {
        info!("🧪 其中本地模拟: {}", simulated);
    }
    info!("❌ 失败: {}", failed);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
