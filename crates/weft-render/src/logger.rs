/* crates/weft-render/src/logger.rs */

// Logging surface for the render core. The only warning the core itself
// emits is the deprecated-resolve guidance; hosts plug in their own sink.

use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
  Info,
  Warn,
  Error,
}

/// Accepts a severity/category/message triple.
pub trait LogSink: Send + Sync {
  fn log(&self, severity: Severity, category: &str, message: &str);
}

/// Drops everything. Default for renders that configure no logging.
pub struct NullSink;

impl LogSink for NullSink {
  fn log(&self, _severity: Severity, _category: &str, _message: &str) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
  pub severity: Severity,
  pub category: String,
  pub message: String,
}

/// Collects entries in memory. Used by tests and the dev overlay.
#[derive(Default)]
pub struct MemorySink {
  entries: Mutex<Vec<LogEntry>>,
}

impl MemorySink {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn entries(&self) -> Vec<LogEntry> {
    self.entries.lock().unwrap_or_else(PoisonError::into_inner).clone()
  }
}

impl LogSink for MemorySink {
  fn log(&self, severity: Severity, category: &str, message: &str) {
    self.entries.lock().unwrap_or_else(PoisonError::into_inner).push(LogEntry {
      severity,
      category: category.to_string(),
      message: message.to_string(),
    });
  }
}
