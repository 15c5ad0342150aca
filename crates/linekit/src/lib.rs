//! # Linekit: a byte-oriented line editor for REPLs
//!
//! Linekit turns raw keystrokes into an editable input line (cursor motion,
//! word commands, kill/yank, history, tab completion and bracket matching)
//! and hands each finished line to your [`ReplHandler`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use linekit::prelude::*;
//!
//! struct Echo;
//!
//! impl ReplHandler for Echo {
//!     type Output = String;
//!
//!     fn prompt(&self) -> String {
//!         "echo> ".to_string()
//!     }
//!
//!     fn eval(&mut self, line: &str) -> Result<Evaluation<String>, EvalError> {
//!         Ok(Evaluation::Value(line.to_string()))
//!     }
//! }
//!
//! linekit::run(Echo).unwrap();
//! ```
//!
//! ## Architecture
//!
//! - **Core** (`linekit-core`): edit buffer, renderer, key dispatcher, engine
//! - **Platform I/O** (`linekit-io`): termios terminal backend, test doubles, debug log
//! - **This crate**: re-exports, completion helpers, history files

// Re-export low-level primitives from linekit-core
pub use linekit_core::{
    buffer::{LineBuffer, DEFAULT_CAPACITY},
    console::{ConsoleError, ConsoleInput, ConsoleOutput, ConsoleResult, RawModeGuard, TerminalMode},
    dispatcher::{DispatchState, Flow, KeyDispatcher},
    error::{BufferError, BufferResult},
    handler::{Completion, EvalError, Evaluation, ReplHandler},
    key::Key,
    renderer::Renderer,
    repl::{ReplConfig, ReplEngine, ReplError},
};

// Re-export I/O implementations from linekit-io
pub use linekit_io::{
    create_console_input, create_console_io, create_console_output, create_mock_console_io,
    debug, mock, MockConsoleInput, MockConsoleOutput,
};

pub mod completion;
pub mod history;
pub mod prelude;

pub use completion::{Completer, PrefixCompleter};
pub use history::{load_history, save_history};

/// Run `handler` on the process terminal with the default configuration.
///
/// Returns the handler once the user ends input on an empty line.
pub fn run<H: ReplHandler>(handler: H) -> Result<H, ReplError> {
    run_with_config(ReplConfig::default(), handler)
}

/// Run `handler` on the process terminal with `config`.
pub fn run_with_config<H: ReplHandler>(config: ReplConfig, handler: H) -> Result<H, ReplError> {
    let (input, output) = create_console_io()?;
    let mut engine = ReplEngine::new(config, input, output, handler)?;
    engine.run()?;
    Ok(engine.into_handler())
}
