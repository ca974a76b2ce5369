//! Small filesystem helpers

use crate::{Error, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

pub struct Utils;

impl Utils {
    /// `prefix` + local `YYYYmmdd_HHMMSS` + `postfix`
    pub fn date_time_filename(prefix: &str, postfix: &str) -> String {
        let now = chrono::Local::now();
        format!("{}{}{}", prefix, now.format("%Y%m%d_%H%M%S"), postfix)
    }
}

/// Temporary directory removed (with its files) on drop
pub struct TempFolder {
    path: PathBuf,
}

impl TempFolder {
    pub fn new() -> Result<Self> {
        let mut path = env::temp_dir();
        let unique = format!(
            "mpmkit_{}_{}_{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos())
                .unwrap_or(0),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        );
        path.push(unique);
        fs::create_dir_all(&path)
            .map_err(|e| Error::OperationFailed(format!("Failed to create temp dir: {}", e)))?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempFolder {
    fn drop(&mut self) {
        if let Ok(entries) = fs::read_dir(&self.path) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_file() {
                    let _ = fs::remove_file(path);
                }
            }
        }
        let _ = fs::remove_dir(&self.path);
    }
}
