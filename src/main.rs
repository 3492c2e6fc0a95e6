use clap::Parser;

use policy_handbook::cli::{Cli, Commands};
use policy_handbook::config::{StaticConfig, get_config, init_config_with};
use policy_handbook::runtime::run_command;
use policy_handbook::system::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let command = cli.command();

    // generate-config 不需要加载现有配置，也不初始化日志
    if let Commands::GenerateConfig { .. } = command {
        return run_command(command).await;
    }

    init_config_with(StaticConfig::load_from(&cli.config));
    let config = get_config();

    // guard 必须活到进程结束，否则文件日志会丢失
    let _log_guard = init_logging(&config.logging)?;

    tracing::info!(
        "policy-handbook {} starting ({:?})",
        env!("CARGO_PKG_VERSION"),
        command
    );
    run_command(command).await
}
