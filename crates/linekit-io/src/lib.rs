//! Terminal channel backends for linekit.
//!
//! Provides implementations of the `linekit-core` console traits:
//! - `UnixConsoleInput` / `UnixConsoleOutput` (termios, stdin/stdout)
//! - `MockConsoleInput` / `MockConsoleOutput` (scripted bytes, captured output)

// Re-export core types and traits
pub use linekit_core::{
    ConsoleError, ConsoleInput, ConsoleOutput, ConsoleResult, RawModeGuard, TerminalMode,
};

/// Create both console input and output for the current platform
pub fn create_console_io() -> ConsoleResult<(Box<dyn ConsoleInput>, Box<dyn ConsoleOutput>)> {
    let input = create_console_input()?;
    let output = create_console_output()?;
    Ok((input, output))
}

/// Create console input for the current platform
pub fn create_console_input() -> ConsoleResult<Box<dyn ConsoleInput>> {
    #[cfg(unix)]
    {
        let input = unix::UnixConsoleInput::new()?;
        Ok(Box::new(input))
    }

    #[cfg(not(unix))]
    {
        Err(ConsoleError::UnsupportedFeature {
            feature: "console input".to_string(),
            platform: std::env::consts::OS.to_string(),
        })
    }
}

/// Create console output for the current platform
pub fn create_console_output() -> ConsoleResult<Box<dyn ConsoleOutput>> {
    #[cfg(unix)]
    {
        let output = unix::UnixConsoleOutput::new()?;
        Ok(Box::new(output))
    }

    #[cfg(not(unix))]
    {
        Err(ConsoleError::UnsupportedFeature {
            feature: "console output".to_string(),
            platform: std::env::consts::OS.to_string(),
        })
    }
}

/// Create mock console I/O for testing, with `script` already queued as input.
///
/// The returned handles share state with the clones boxed into an engine.
pub fn create_mock_console_io(script: &[u8]) -> (mock::MockConsoleInput, mock::MockConsoleOutput) {
    let input = mock::MockConsoleInput::new();
    input.queue_bytes(script);
    (input, mock::MockConsoleOutput::new())
}

/// Get information about the current platform and its console implementation.
pub fn get_platform_info() -> String {
    #[cfg(unix)]
    {
        format!("Unix termios console I/O (OS: {})", std::env::consts::OS)
    }

    #[cfg(not(unix))]
    {
        format!("Unsupported platform: {}", std::env::consts::OS)
    }
}

// Platform-specific modules
#[cfg(unix)]
mod unix;

// Mock implementation for testing
pub mod mock;

// File-backed log output
pub mod debug;

#[cfg(unix)]
pub use unix::{UnixConsoleInput, UnixConsoleOutput};

pub use mock::{MockConsoleInput, MockConsoleOutput};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_factory_queues_script() {
        let (input, output) = create_mock_console_io(b"12");
        assert_eq!(input.queued_byte_count(), 2);
        assert!(output.get_output().is_empty());
    }

    #[test]
    fn test_platform_info_names_os() {
        assert!(get_platform_info().contains(std::env::consts::OS));
    }
}
