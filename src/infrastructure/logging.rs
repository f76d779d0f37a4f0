use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Installs a tracing subscriber that appends to `path`.
///
/// The terminal UI owns stdout, so logs only ever go to a file. `RUST_LOG`
/// takes precedence over `level`.
pub fn init_file_logging(
    path: &Path,
    level: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("reinstate={level},warn")))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .compact()
        .try_init()?;

    Ok(())
}
