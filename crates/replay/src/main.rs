mod scenario;

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use flexi_logger::Logger;

use crate::scenario::Scenario;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: folio-replay <scenario.json>");
        std::process::exit(1);
    }

    // RUST_LOG overrides the default level.
    let _logger = Logger::try_with_env_or_str("warn")?.log_to_stderr().start()?;

    let path = PathBuf::from(&args[1]);
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("reading {}", path.display()))?;
    let report = Scenario::from_json(&json)?.run()?;

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &report)?;
    writeln!(stdout)?;
    Ok(())
}
