use std::fs::File;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Env var naming a log file prefix.
pub const LOG_PATH_ENV: &str = "KATA_BLOG_LOG";

/// Install the global subscriber.
///
/// Without `KATA_BLOG_LOG`, warnings and errors go to stderr so they never mix
/// with command output. With it, everything from `info` up goes to
/// `{prefix}.{unix_secs}.{pid}`, one file per invocation. `RUST_LOG` overrides
/// the level in both cases.
pub fn init_tracing() {
    let (writer, default_level, to_file) = match log_file() {
        Some(file) => (BoxMakeWriter::new(file), "info", true),
        None => (BoxMakeWriter::new(std::io::stderr), "warn", false),
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(!to_file)
        .with_target(to_file);

    tracing_subscriber::registry().with(filter).with(layer).init();
}

fn log_file() -> Option<File> {
    let prefix = std::env::var(LOG_PATH_ENV).ok().filter(|p| !p.is_empty())?;
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let path = format!("{}.{}.{}", prefix, secs, std::process::id());

    match File::create(&path) {
        Ok(file) => Some(file),
        Err(e) => {
            eprintln!("Warning: Failed to create log file {}: {}", path, e);
            None
        }
    }
}
