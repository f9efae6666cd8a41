//! Optional timestamped debug log, enabled with `--debug-log FILE`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

/// Where debug messages go. Disabled by default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DebugLog {
    path: Option<PathBuf>,
}

impl DebugLog {
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn to_file(path: impl Into<PathBuf>) -> Self {
        Self { path: Some(path.into()) }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Appends `msg` to the log file. Write failures are ignored.
    pub fn log(&self, msg: impl AsRef<str>) {
        if let Some(p) = &self.path {
            if let Ok(mut file) = fs::OpenOptions::new().append(true).create(true).open(p) {
                let _ = writeln!(
                    file,
                    "[{}] {}",
                    Local::now().format("%Y-%m-%d %H:%M:%S"),
                    msg.as_ref()
                );
            }
        }
    }
}
