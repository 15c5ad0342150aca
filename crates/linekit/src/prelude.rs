//! Convenient re-exports for common use cases
//!
//! # Usage
//!
//! ```rust
//! use linekit::prelude::*;
//!
//! struct Shout;
//!
//! impl ReplHandler for Shout {
//!     type Output = String;
//!
//!     fn prompt(&self) -> String {
//!         "! ".to_string()
//!     }
//!
//!     fn eval(&mut self, line: &str) -> Result<Evaluation<String>, EvalError> {
//!         Ok(Evaluation::Value(line.to_uppercase()))
//!     }
//! }
//! ```

// Re-export commonly used types from low-level crates
pub use linekit_core::{
    // Console abstractions
    console::{ConsoleError, ConsoleInput, ConsoleOutput, ConsoleResult, RawModeGuard, TerminalMode},
    // Handler interface
    handler::{Completion, EvalError, Evaluation, ReplHandler},
    // Engine
    repl::{ReplConfig, ReplEngine, ReplError},
    BufferError,
    LineBuffer,
};

// Re-export high-level components from this crate
pub use crate::{
    completion::{Completer, PrefixCompleter},
    history::{load_history, save_history},
    run, run_with_config,
};

// Re-export I/O implementations for direct access
pub use linekit_io::{create_console_io, MockConsoleInput, MockConsoleOutput};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prelude_imports() {
        let buffer = LineBuffer::new(8);
        assert!(buffer.is_empty());

        let completer = PrefixCompleter::new(["help"]);
        assert_eq!(completer.complete("he").addendum, "lp");

        let config = ReplConfig::default();
        assert_eq!(config.terminal_mode, TerminalMode::Raw);

        let _error = BufferError::invalid_cursor_position(10, 5);
    }
}
