use crate::script::ScriptLine;
use anyhow::{Context, Result};
use cmdlog_config::CmdlogConfig;
use cmdlog_core::{EditorTap, FlushOutcome};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Summary of one feed run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FeedStats {
    /// Script lines that produced events
    pub events: usize,
    /// Key codes handed to the tap (filtered ones included)
    pub keys: usize,
    /// Runs written to the log
    pub runs: u64,
}

/// Feed a script through an `EditorTap` built from `config`
pub fn feed<R: BufRead>(config: &CmdlogConfig, reader: R) -> Result<(FeedStats, Option<PathBuf>)> {
    let mut tap = EditorTap::new(&config.logger);
    let table = tap.logger().escape_table().clone();
    let path = tap.logger().log_path();
    let mut stats = FeedStats::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read script")?;
        let Some(event) = ScriptLine::parse(&line, &table)
            .with_context(|| format!("Invalid script line {}", index + 1))?
        else {
            continue;
        };

        debug!(
            "{} {} keys in {}{}",
            event.codes.len(),
            if event.replaying { "replayed" } else { "typed" },
            event.mode,
            if event.filetype.is_empty() { String::new() } else { format!(" ({})", event.filetype) }
        );
        for code in &event.codes {
            tap.on_key(event.mode, *code, &event.filetype, event.replaying);
        }
        stats.events += 1;
        stats.keys += event.codes.len();
    }

    let mut runs = tap.logger().lines_written();
    if tap.close() == FlushOutcome::Written {
        runs += 1;
    }
    stats.runs = runs;

    Ok((stats, path))
}

/// Execute `cmdlog feed`
pub fn execute(config: &CmdlogConfig, file: Option<PathBuf>) -> Result<()> {
    if config.logger.enabled_dir().is_none() {
        warn!("No log directory configured; set --log-dir or CMDLOG_DIR to write a log");
    }

    let (stats, path) = match file {
        Some(path) => {
            let script = File::open(&path)
                .with_context(|| format!("Failed to open script {}", path.display()))?;
            feed(config, BufReader::new(script))?
        }
        None => feed(config, io::stdin().lock())?,
    };

    info!("Fed {} keys from {} events", stats.keys, stats.events);
    match path {
        Some(path) if stats.runs > 0 => {
            println!("{} runs written to {}", stats.runs, path.display());
        }
        _ => println!("no runs written"),
    }

    Ok(())
}
