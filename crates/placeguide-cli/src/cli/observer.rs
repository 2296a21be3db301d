//! Observer that shows lookup status on the terminal.

use placeguide_core::notify::Observer;

/// Prints `warning: ...` / `error: ...` to stderr and logs the same message.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleObserver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Warning,
    Error,
}

/// The stderr line for one observer message.
pub fn console_line(level: Level, message: &str) -> String {
    let prefix = match level {
        Level::Warning => "warning",
        Level::Error => "error",
    };
    format!("{}: {}", prefix, message)
}

impl Observer for ConsoleObserver {
    fn warn(&self, message: &str) {
        tracing::warn!("{}", message);
        eprintln!("{}", console_line(Level::Warning, message));
    }

    fn error(&self, message: &str) {
        tracing::error!("{}", message);
        eprintln!("{}", console_line(Level::Error, message));
    }
}
