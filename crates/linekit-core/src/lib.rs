//! Linekit Core Library
//!
//! The platform-independent part of a byte-oriented line editor: the edit
//! buffer with its kill/yank register and history, the renderer that keeps the
//! terminal line in sync with it, the key dispatcher state machine, and the
//! REPL engine that runs them against a caller-supplied [`ReplHandler`].
//! Terminal backends live in `linekit-io`.

pub mod buffer;
pub mod error;
pub mod key;

// Console I/O abstraction
pub mod console;

// Rendering
pub mod renderer;

// Handler capability interface
pub mod handler;

// Key dispatch
pub mod dispatcher;

// REPL engine
pub mod repl;

// Re-export commonly used types for convenience
pub use buffer::{LineBuffer, DEFAULT_CAPACITY};
pub use error::{BufferError, BufferResult};
pub use key::Key;

pub use console::{
    ConsoleError, ConsoleInput, ConsoleOutput, ConsoleResult, RawModeGuard, TerminalMode,
};

pub use renderer::Renderer;

pub use handler::{Completion, EvalError, Evaluation, ReplHandler};

pub use dispatcher::{DispatchState, Flow, KeyDispatcher};

pub use repl::{ReplConfig, ReplEngine, ReplError};
