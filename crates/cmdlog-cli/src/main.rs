use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cmdlog_cli::{
    cli::{Cli, Commands},
    commands,
};
use cmdlog_config::CmdlogConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = cli.level_filter();
    let env_filter = format!("cmdlog={level},cmdlog_core={level},cmdlog_cli={level},cmdlog_config={level}");
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(env_filter))
        .with_writer(std::io::stderr)
        .init();

    // Config file, then CMDLOG_DIR, then --log-dir
    let mut config = CmdlogConfig::load_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;
    config.apply_env_overrides();
    if let Some(dir) = cli.log_dir {
        config.logger.log_dir = Some(dir);
    }
    config.validate().context("Invalid configuration")?;
    debug!("Effective log dir: {:?}", config.logger.log_dir);

    match cli.command {
        Commands::Feed { file, insert_text } => {
            if insert_text {
                config.logger.log_insert_text = true;
            }
            commands::feed::execute(&config, file)?
        }
        Commands::Escape { codes } => commands::escape::execute(&config, &codes)?,
        Commands::Config => commands::config::execute(&config)?,
    }

    Ok(())
}
