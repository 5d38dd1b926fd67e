// src/logging.rs
// Installs the global tracing subscriber. Logs go to stderr so that the JSON
// report printed by `analyze --json` stays alone on stdout.

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

pub fn init(verbosity: u8) -> Result<()> {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}
