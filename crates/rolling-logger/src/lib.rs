//! Rolling Logger
//!
//! A `tracing-subscriber` backend that appends formatted records to a
//! size-rotated log file and keeps the most recent lines in a circular
//! buffer, so an application can show its own log without touching disk.
//!
//! `log` records are bridged into `tracing` when the logger is installed.

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::MakeWriter;

#[cfg(test)]
mod tests;

/// Logger settings, usually embedded in the application config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Directory for log files (None = memory only)
    pub dir: Option<PathBuf>,
    /// File name stem, the active file is `<prefix>.log`
    pub file_prefix: String,
    /// Rotate once the active file would exceed this size
    pub max_file_bytes: u64,
    /// Total number of files kept, including the active one
    pub max_files: usize,
    /// Lines kept in the circular buffer
    pub buffer_lines: usize,
    /// Maximum level: trace, debug, info, warn, error, off
    pub level: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            dir: None,
            file_prefix: "todo-sync".to_string(),
            max_file_bytes: 1024 * 1024,
            max_files: 3,
            buffer_lines: 500,
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("log file error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid log level {0:?}")]
    InvalidLevel(String),
    #[error("a global logger is already installed: {0}")]
    AlreadyInstalled(String),
}

/// Handle to the shared log sink. Cheap to clone.
#[derive(Clone)]
pub struct RollingLogger {
    inner: Arc<Mutex<Sink>>,
}

impl RollingLogger {
    /// Create a sink without installing it globally
    pub fn new(config: &LoggerConfig) -> Result<Self, LoggerError> {
        let file = match &config.dir {
            Some(dir) => Some(LogFile::open(
                dir,
                &config.file_prefix,
                config.max_file_bytes,
                config.max_files,
            )?),
            None => None,
        };

        Ok(Self {
            inner: Arc::new(Mutex::new(Sink {
                lines: VecDeque::with_capacity(config.buffer_lines.min(4096)),
                capacity: config.buffer_lines,
                partial: String::new(),
                file,
            })),
        })
    }

    /// Create the sink and install it as the global `tracing` subscriber.
    pub fn init(config: &LoggerConfig) -> Result<Self, LoggerError> {
        let level = LevelFilter::from_str(&config.level)
            .map_err(|_| LoggerError::InvalidLevel(config.level.clone()))?;
        let logger = Self::new(config)?;

        tracing_subscriber::fmt()
            .with_writer(logger.clone())
            .with_timer(LocalTime)
            .with_ansi(false)
            .with_max_level(level)
            .try_init()
            .map_err(|e| LoggerError::AlreadyInstalled(e.to_string()))?;

        log::info!(
            "logger ready (level={}, file={:?})",
            config.level,
            config.dir.as_ref().map(|d| d.join(format!("{}.log", config.file_prefix)))
        );
        Ok(logger)
    }

    /// Most recent complete lines, oldest first
    pub fn recent(&self) -> Vec<String> {
        self.lock().lines.iter().cloned().collect()
    }

    pub fn clear(&self) {
        self.lock().lines.clear();
    }

    fn lock(&self) -> MutexGuard<'_, Sink> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<'a> MakeWriter<'a> for RollingLogger {
    type Writer = RollingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        RollingWriter {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Per-record writer handed out to the fmt layer
pub struct RollingWriter {
    inner: Arc<Mutex<Sink>>,
}

impl Write for RollingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut sink = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        sink.append(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut sink = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        match sink.file.as_mut() {
            Some(file) => file.handle.flush(),
            None => Ok(()),
        }
    }
}

struct LocalTime;

impl FormatTime for LocalTime {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

struct Sink {
    lines: VecDeque<String>,
    capacity: usize,
    /// Bytes after the last newline, completed by the next write
    partial: String,
    file: Option<LogFile>,
}

impl Sink {
    fn append(&mut self, buf: &[u8]) -> io::Result<()> {
        if let Some(file) = self.file.as_mut() {
            file.write(buf)?;
        }

        self.partial.push_str(&String::from_utf8_lossy(buf));
        while let Some(pos) = self.partial.find('\n') {
            let line = self.partial[..pos].trim_end_matches('\r').to_string();
            self.partial.drain(..=pos);
            self.push_line(line);
        }
        Ok(())
    }

    fn push_line(&mut self, line: String) {
        if self.capacity == 0 {
            return;
        }
        while self.lines.len() >= self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }
}

struct LogFile {
    dir: PathBuf,
    prefix: String,
    max_bytes: u64,
    max_files: usize,
    handle: File,
    written: u64,
}

impl LogFile {
    fn open(dir: &Path, prefix: &str, max_bytes: u64, max_files: usize) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        let path = file_path(dir, prefix, 0);
        let handle = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = handle.metadata()?.len();

        Ok(Self {
            dir: dir.to_path_buf(),
            prefix: prefix.to_string(),
            max_bytes,
            max_files,
            handle,
            written,
        })
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<()> {
        if self.written > 0 && self.written + buf.len() as u64 > self.max_bytes {
            self.rotate()?;
        }
        self.handle.write_all(buf)?;
        self.written += buf.len() as u64;
        Ok(())
    }

    /// `<prefix>.log` becomes `<prefix>.log.1`, older archives shift up by one
    /// and the oldest beyond `max_files` is removed.
    fn rotate(&mut self) -> io::Result<()> {
        self.handle.flush()?;
        let active = file_path(&self.dir, &self.prefix, 0);

        if self.max_files <= 1 {
            self.handle = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&active)?;
            self.written = 0;
            return Ok(());
        }

        let oldest = file_path(&self.dir, &self.prefix, self.max_files - 1);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for index in (1..self.max_files - 1).rev() {
            let from = file_path(&self.dir, &self.prefix, index);
            if from.exists() {
                fs::rename(&from, file_path(&self.dir, &self.prefix, index + 1))?;
            }
        }
        fs::rename(&active, file_path(&self.dir, &self.prefix, 1))?;

        self.handle = OpenOptions::new().create(true).append(true).open(&active)?;
        self.written = 0;
        Ok(())
    }
}

fn file_path(dir: &Path, prefix: &str, index: usize) -> PathBuf {
    if index == 0 {
        dir.join(format!("{prefix}.log"))
    } else {
        dir.join(format!("{prefix}.log.{index}"))
    }
}
