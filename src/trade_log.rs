//! Persistent Trade Log
//!
//! Append-only, human-readable record of executed and attempted trades.
//! Never read back by the bot.
//!
//! Output format (one line per entry):
//!   2026-10-19T08:15:02.114Z | ✅ Pancake→DODO VAI/USDT | Loan: 10000.0 | Profit: 30.0 | GasPrice: 5.0 gwei
//!   2026-10-19T08:15:02.391Z | Tx Hash: 0x...
//!   (or, when submission fails)
//!   2026-10-19T08:15:02.391Z | ❌ Tx failed: <reason>
//!
//! Author: AI-Generated
//! Created: 2026-10-19
//! Modified: 2026-10-21 - Failure line in the format notes

use chrono::Utc;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, warn};

/// Write-only trade record sink
pub trait TradeLog: Send + Sync {
    fn record(&self, message: &str);
}

/// Prefix a message with a UTC millisecond timestamp
pub fn format_line(message: &str) -> String {
    format!("{} | {}", Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ"), message)
}

/// Appends timestamped lines to a text file and echoes them to the console
pub struct FileTradeLog {
    path: PathBuf,
    file: Mutex<Option<File>>,
}

impl FileTradeLog {
    /// Open (or create) the log file. Parent directories are created as needed.
    /// An unopenable file degrades to console-only logging.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!("Failed to create trade log directory {:?}: {}", parent, e);
            }
        }

        let file = match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(f) => {
                info!("Trade log: appending to {:?}", path);
                Some(f)
            }
            Err(e) => {
                warn!("Trade log: failed to open {:?}: {} (console only)", path, e);
                None
            }
        };

        Self {
            path,
            file: Mutex::new(file),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TradeLog for FileTradeLog {
    fn record(&self, message: &str) {
        let line = format_line(message);
        info!("{}", line);

        let mut guard = self.file.lock().unwrap_or_else(|p| p.into_inner());
        let Some(file) = guard.as_mut() else {
            return;
        };

        if let Err(e) = writeln!(file, "{}", line).and_then(|_| file.flush()) {
            warn!("Trade log write error ({:?}): {}", self.path, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_line_has_timestamp_prefix() {
        let line = format_line("Tx Hash: 0xabc");
        let (stamp, rest) = line.split_once(" | ").unwrap();
        assert!(stamp.ends_with('Z'));
        assert_eq!(stamp.len(), "2026-01-01T00:00:00.000Z".len());
        assert_eq!(rest, "Tx Hash: 0xabc");
    }

    #[test]
    fn test_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("profit-log.txt");

        let log = FileTradeLog::new(&path);
        log.record("first");
        log.record("second");
        drop(log);

        // Reopening appends instead of truncating
        FileTradeLog::new(&path).record("third");

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("| first"));
        assert!(lines[2].ends_with("| third"));
    }
}
