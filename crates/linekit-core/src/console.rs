//! Console input/output abstraction traits and types
//!
//! The editing engine talks to the terminal only through these traits: one byte
//! in at a time, raw bytes out. Backends live in `linekit-io`.

use std::fmt;
use std::io;
use thiserror::Error;

/// Move the cursor one column left.
pub const CURSOR_BACKWARD: &[u8] = b"\x1b[1D";
/// Move the cursor one column right.
pub const CURSOR_FORWARD: &[u8] = b"\x1b[1C";
/// Audible signal.
pub const BELL: &[u8] = b"\x07";

/// Terminal discipline the engine runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TerminalMode {
    /// Unbuffered, no echo; the terminal still turns Ctrl+C into a signal
    Cbreak,
    /// Like `Cbreak`, but signal keys arrive as plain bytes
    #[default]
    Raw,
}

impl fmt::Display for TerminalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminalMode::Cbreak => write!(f, "cbreak"),
            TerminalMode::Raw => write!(f, "raw"),
        }
    }
}

/// Byte source of the terminal channel
pub trait ConsoleInput: Send + Sync {
    /// Put the terminal into `mode`; the previous settings come back when the
    /// returned guard is restored or dropped.
    fn enable_raw_mode(&self, mode: TerminalMode) -> ConsoleResult<RawModeGuard>;

    /// Block until one byte is available.
    ///
    /// Returns [`ConsoleError::EndOfStream`] when the source is exhausted.
    fn read_byte(&self) -> ConsoleResult<u8>;
}

/// Byte sink of the terminal channel
pub trait ConsoleOutput: Send + Sync {
    /// Write all bytes, in order.
    fn write_bytes(&self, bytes: &[u8]) -> ConsoleResult<()>;

    /// Flush buffered output to the terminal.
    fn flush(&self) -> ConsoleResult<()>;

    fn write_text(&self, text: &str) -> ConsoleResult<()> {
        self.write_bytes(text.as_bytes())
    }

    fn cursor_backward(&self) -> ConsoleResult<()> {
        self.write_bytes(CURSOR_BACKWARD)
    }

    fn cursor_forward(&self) -> ConsoleResult<()> {
        self.write_bytes(CURSOR_FORWARD)
    }

    fn beep(&self) -> ConsoleResult<()> {
        self.write_bytes(BELL)
    }

    fn newline(&self) -> ConsoleResult<()> {
        self.write_bytes(b"\n")
    }
}

type RestoreFn = Box<dyn FnOnce() -> ConsoleResult<()> + Send>;

/// RAII guard for terminal raw mode with primary restoration responsibility
pub struct RawModeGuard {
    restore_fn: Option<RestoreFn>,
    mode: TerminalMode,
    platform_info: String,
}

impl RawModeGuard {
    pub fn new<F>(mode: TerminalMode, restore_fn: F, platform_info: String) -> Self
    where
        F: FnOnce() -> ConsoleResult<()> + Send + 'static,
    {
        Self {
            restore_fn: Some(Box::new(restore_fn)),
            mode,
            platform_info,
        }
    }

    pub fn mode(&self) -> TerminalMode {
        self.mode
    }

    pub fn platform_info(&self) -> &str {
        &self.platform_info
    }

    /// Whether the saved settings have not been put back yet.
    pub fn is_active(&self) -> bool {
        self.restore_fn.is_some()
    }

    /// Manually restore terminal mode (prevents automatic restoration on drop)
    pub fn restore(mut self) -> ConsoleResult<()> {
        match self.restore_fn.take() {
            Some(restore_fn) => restore_fn(),
            None => Err(ConsoleError::TerminalError("Already restored".to_string())),
        }
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Some(restore_fn) = self.restore_fn.take() {
            if let Err(e) = restore_fn() {
                log::warn!("failed to restore terminal ({}): {e}", self.platform_info);
            }
        }
    }
}

impl fmt::Debug for RawModeGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawModeGuard")
            .field("mode", &self.mode)
            .field("platform_info", &self.platform_info)
            .field("is_active", &self.is_active())
            .finish()
    }
}

/// Console operation errors
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Read or write on the terminal failed
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    /// Input source has no more bytes
    #[error("End of input stream")]
    EndOfStream,
    /// Terminal setup/teardown error
    #[error("Terminal error: {0}")]
    TerminalError(String),
    /// Feature not supported on this platform
    #[error("Feature '{feature}' not supported on platform '{platform}'")]
    UnsupportedFeature { feature: String, platform: String },
}

impl ConsoleError {
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, ConsoleError::EndOfStream)
    }
}

/// Result type for console operations
pub type ConsoleResult<T> = Result<T, ConsoleError>;
