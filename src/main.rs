use anyhow::Result;
use doc_batch_client::utils::logging;
use doc_batch_client::{App, Config};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logging::init();

    // 加载配置（BATCH_CONFIG 指向可选的 TOML 文件）
    let config_path = std::env::var("BATCH_CONFIG").ok().map(PathBuf::from);
    let config = Config::load(config_path.as_deref())?;

    // 命令行参数为文件或目录
    let inputs: Vec<PathBuf> = std::env::args().skip(1).map(PathBuf::from).collect();
    if inputs.is_empty() {
        anyhow::bail!("用法: doc-batch <文件或目录>...");
    }

    // 初始化并运行应用
    App::initialize(config)?.run(&inputs).await?;

    Ok(())
}
