//! Append-only run log.
//!
//! Standard output carries the acknowledgment line, so diagnostics go to a
//! text file instead: `fflog.txt` beside the executable, or the path in
//! `AACMD_LOG_FILE`. Verbosity follows `RUST_LOG` and defaults to `info`.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

/// Log file name used next to the executable.
pub const LOG_FILE_NAME: &str = "fflog.txt";

/// Environment variable overriding the log file location.
pub const LOG_FILE_ENV: &str = "AACMD_LOG_FILE";

/// Default log location for an executable at `exe`.
pub fn default_log_path(exe: &Path) -> PathBuf {
    exe.with_file_name(LOG_FILE_NAME)
}

/// Resolve the log file location from the environment.
pub fn log_file_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(LOG_FILE_ENV) {
        return Ok(PathBuf::from(path));
    }
    let exe = std::env::current_exe().context("cannot locate executable")?;
    Ok(default_log_path(&exe))
}

/// Install the global subscriber writing to the append log.
///
/// Returns the path being written to.
pub fn init() -> Result<PathBuf> {
    let path = log_file_path()?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow!("cannot install log subscriber: {e}"))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_path_beside_executable() {
        let exe = Path::new("/opt/aacmd/bin/aacmd");
        assert_eq!(
            default_log_path(exe),
            PathBuf::from("/opt/aacmd/bin/fflog.txt")
        );
    }
}
