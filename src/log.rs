//! Timestamped log file for simulation setup sessions

use crate::utils::Utils;
use crate::{Config, Error, Result};
use chrono::{Local, Utc};
use std::env;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Shared log file handle
///
/// Every line is prefixed with the seconds elapsed since the log was opened
/// and the delta to the previous line. Clones write to the same file.
#[derive(Clone)]
pub struct LogFile {
    inner: Arc<LogFileInner>,
}

struct LogFileInner {
    path: PathBuf,
    state: Mutex<LogState>,
    start: Instant,
    output_to_console: bool,
}

struct LogState {
    writer: BufWriter<File>,
    last_seconds: f32,
}

impl LogFile {
    /// Open a log file, truncating it
    ///
    /// Without a path, a timestamped `mpmkit_*.log` is created in the temp
    /// folder.
    pub fn new(path: Option<&Path>, output_to_console: bool) -> Result<Self> {
        let path = match path {
            Some(path) if !path.as_os_str().is_empty() => path.to_path_buf(),
            _ => env::temp_dir().join(Utils::date_time_filename("mpmkit_", ".log")),
        };

        let file = File::create(&path).map_err(|e| {
            Error::FileSave(format!("Unable to create file {}: {}", path.display(), e))
        })?;

        let log = Self {
            inner: Arc::new(LogFileInner {
                path: path.clone(),
                state: Mutex::new(LogState {
                    writer: BufWriter::new(file),
                    last_seconds: 0.0,
                }),
                start: Instant::now(),
                output_to_console,
            }),
        };

        log.log(format!("Opened {}", path.display()))?;
        log.log_time()?;
        log.log(format!(
            "Platform:             {} ({})",
            env::consts::OS,
            env::consts::ARCH
        ))?;
        log.log(format!(
            "Processor Count:      {}",
            std::thread::available_parallelism()
                .map(|c| c.get())
                .unwrap_or(0)
        ))?;
        log.log("\n----------------------------------------\n")?;

        Ok(log)
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Write a message; multi-line messages get one prefix per line
    pub fn log(&self, message: impl AsRef<str>) -> Result<()> {
        self.inner.log_lines(message.as_ref())
    }

    pub fn log_time(&self) -> Result<()> {
        let utc = Utc::now();
        let local = Local::now();
        self.log(format!(
            "Current time (UTC): {}",
            utc.format("%Y-%m-%d %H:%M:%S (UTC)")
        ))?;
        self.log(format!(
            "Current local time: {}",
            local.format("%Y-%m-%d %H:%M:%S (%z)")
        ))?;
        Ok(())
    }

    /// Dump a configuration, one key per line
    pub fn log_config(&self, config: &Config) -> Result<()> {
        self.log(config.describe())
    }
}

impl LogFileInner {
    fn log_lines(&self, message: &str) -> Result<()> {
        let seconds = self.start.elapsed().as_secs_f32();

        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let diff = seconds - state.last_seconds;
        let prefix = format!("{:7.0}s {:6.1}+ ", seconds, diff);

        for line in message.split('\n') {
            if self.output_to_console {
                println!("{}{}", prefix, line);
            }
            state.writer.write_all(prefix.as_bytes())?;
            state.writer.write_all(line.as_bytes())?;
            state.writer.write_all(b"\n")?;
        }
        state.writer.flush()?;
        state.last_seconds = seconds;

        Ok(())
    }
}

impl Drop for LogFileInner {
    fn drop(&mut self) {
        let _ = self.log_lines("\n----------------------------------------\n");
        let _ = self.log_lines(&format!(
            "Closing log file at {}",
            Utc::now().format("%Y-%m-%d %H:%M:%S (UTC)")
        ));
    }
}
