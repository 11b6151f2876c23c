use std::sync::{Mutex, PoisonError};
use tracing::info;

/// Line-oriented sink for greeting output.
pub trait Console: Send + Sync {
    fn line(&self, line: &str);
}

/// Writes every line through `tracing` at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingConsole;

impl Console for TracingConsole {
    fn line(&self, line: &str) {
        info!(target: "greetr::console", "{}", line);
    }
}

/// Keeps every line in memory, in arrival order.
#[derive(Debug, Default)]
pub struct MemoryConsole {
    lines: Mutex<Vec<String>>,
}

impl MemoryConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Console for MemoryConsole {
    fn line(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_string());
    }
}
