//! Log sink selection
//!
//! While serving, stdout carries the MCP protocol, so logs go to a file under
//! `~/.azdo-mcp`. Every other command logs to stderr.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// A thread-safe writer that flushes and syncs the log file on every write
///
/// A client that kills the server mid-session must still find the last
/// lines it logged on disk.
///
/// # Example
///
/// ```no_run
/// use std::fs::File;
/// use std::io::Write;
/// use std::sync::{Arc, Mutex};
/// use azdo_mcp_cli::logging::FileWriterGuard;
///
/// let file = File::create("mcp.log").unwrap();
/// let mut guard = FileWriterGuard::new(Arc::new(Mutex::new(file)));
/// guard.write_all(b"Log message\n").unwrap();
/// ```
#[derive(Clone)]
pub struct FileWriterGuard {
    file: Arc<Mutex<File>>,
}

impl FileWriterGuard {
    /// Creates a new `FileWriterGuard` wrapping the given file
    pub fn new(file: Arc<Mutex<File>>) -> Self {
        Self { file }
    }
}

impl Write for FileWriterGuard {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        let written = file.write(buf)?;
        file.flush()?;
        file.sync_all()?;
        Ok(written)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        file.flush()?;
        file.sync_all()
    }
}

/// Default level from the verbosity flags
///
/// `quiet` wins over `debug`, which wins over `verbose`.
pub fn level_for(quiet: bool, debug: bool, verbose: bool) -> Level {
    if quiet {
        Level::ERROR
    } else if debug {
        Level::DEBUG
    } else if verbose {
        Level::TRACE
    } else {
        Level::INFO
    }
}

/// Filter honouring `RUST_LOG`, falling back to `level`
pub fn env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()))
}

/// Open `path` for appending, creating its directory first
pub fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber
///
/// With `log_file` set, logs are appended there without ANSI colours; if the
/// file cannot be opened, logging falls back to stderr and says so.
pub fn init(level: Level, log_file: Option<&Path>) {
    let Some(path) = log_file else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(env_filter(level))
            .init();
        return;
    };

    match open_log_file(path) {
        Ok(file) => {
            let guard = FileWriterGuard::new(Arc::new(Mutex::new(file)));
            tracing_subscriber::fmt()
                .with_writer(move || guard.clone())
                .with_env_filter(env_filter(level))
                .with_ansi(false)
                .init();
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(env_filter(level))
                .init();
            tracing::warn!(
                "Failed to open log file {}, using stderr: {}",
                path.display(),
                e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::TempDir;

    #[test]
    fn test_level_precedence() {
        assert_eq!(level_for(false, false, false), Level::INFO);
        assert_eq!(level_for(false, false, true), Level::TRACE);
        assert_eq!(level_for(false, true, true), Level::DEBUG);
        assert_eq!(level_for(true, true, true), Level::ERROR);
    }

    #[test]
    fn test_open_log_file_creates_directory() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".azdo-mcp").join("mcp.log");

        open_log_file(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_writer_guard_appends() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("mcp.log");

        let file = open_log_file(&path).unwrap();
        let mut guard = FileWriterGuard::new(Arc::new(Mutex::new(file)));
        guard.write_all(b"first\n").unwrap();

        let mut second = guard.clone();
        second.write_all(b"second\n").unwrap();

        let mut content = String::new();
        File::open(&path)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "first\nsecond\n");
    }
}
