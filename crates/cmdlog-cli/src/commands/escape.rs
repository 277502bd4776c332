use crate::script::parse_code;
use anyhow::{bail, Result};
use cmdlog_config::CmdlogConfig;
use cmdlog_core::EscapeTable;

/// Print `<code>\t<rendering>` for each code
pub fn execute(config: &CmdlogConfig, codes: &[String]) -> Result<()> {
    let table = EscapeTable::new(&config.logger.special_keys);

    for text in codes {
        let Some(code) = parse_code(text) else {
            bail!("invalid key code '{}'", text);
        };
        println!("{}\t{}", text, table.escape(code));
    }

    Ok(())
}
