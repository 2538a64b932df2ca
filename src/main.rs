use anyhow::Result;
use note_to_think_submit::orchestrator::App;
use note_to_think_submit::utils::logging;
use note_to_think_submit::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logging::init();

    // 加载配置
    let config = Config::from_env();

    // 初始化并运行应用
    App::initialize(config)?.run().await?;

    Ok(())
}
