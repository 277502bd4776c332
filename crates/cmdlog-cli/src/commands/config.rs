use anyhow::{Context, Result};
use cmdlog_config::CmdlogConfig;

/// Print the effective configuration
pub fn execute(config: &CmdlogConfig) -> Result<()> {
    let rendered = config
        .to_toml()
        .context("Failed to render configuration")?;
    print!("{rendered}");
    Ok(())
}
