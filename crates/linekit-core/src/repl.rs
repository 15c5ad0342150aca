//! REPL (Read-Eval-Print Loop) engine and configuration.
//!
//! This module wires a [`ConsoleInput`], a [`Renderer`] over a
//! [`ConsoleOutput`], the [`LineBuffer`] and a [`KeyDispatcher`] into the
//! session loop that drives a [`ReplHandler`].

use crate::{
    buffer::{LineBuffer, DEFAULT_CAPACITY},
    console::{ConsoleError, ConsoleInput, ConsoleOutput, TerminalMode},
    dispatcher::{Flow, KeyDispatcher},
    error::BufferError,
    handler::ReplHandler,
    key::ESCAPE,
    renderer::Renderer,
};
use log::{debug, warn};
use std::time::Duration;
use thiserror::Error;

/// Configuration for the REPL engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplConfig {
    /// Storage reserved for the edit buffer at session start
    pub initial_capacity: usize,
    /// How long the cursor rests on a matched opening bracket
    pub highlight_pause: Duration,
    /// Whether typing a closing bracket flashes its opener
    pub bracket_highlight: bool,
    /// Printed when the interrupt key is pressed
    pub interrupt_notice: String,
    /// Printed before the message of a failed evaluation
    pub error_prefix: String,
    /// Terminal discipline held for the whole session
    pub terminal_mode: TerminalMode,
}

impl Default for ReplConfig {
    fn default() -> Self {
        ReplConfig {
            initial_capacity: DEFAULT_CAPACITY,
            highlight_pause: Duration::from_millis(150),
            bracket_highlight: true,
            interrupt_notice: "*** Interrupt ***\n".to_string(),
            error_prefix: "*** ".to_string(),
            terminal_mode: TerminalMode::Raw,
        }
    }
}

impl ReplConfig {
    /// Validate the REPL configuration.
    pub fn validate(&self) -> Result<(), ReplError> {
        if self.initial_capacity == 0 {
            return Err(ReplError::ConfigurationError(
                "Initial buffer capacity must be greater than 0".to_string(),
            ));
        }

        if self.interrupt_notice.bytes().any(|b| b == ESCAPE) {
            return Err(ReplError::ConfigurationError(
                "Interrupt notice cannot contain escape sequences".to_string(),
            ));
        }

        Ok(())
    }
}

/// Errors that end a REPL session.
#[derive(Debug, Error)]
pub enum ReplError {
    /// Console I/O error
    #[error("Console error: {0}")]
    ConsoleError(#[from] ConsoleError),
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    /// Edit buffer left in an inconsistent state
    #[error("Buffer error: {0}")]
    BufferError(#[from] BufferError),
}

impl ReplError {
    /// True when the session ended because the input stream closed.
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, ReplError::ConsoleError(e) if e.is_end_of_stream())
    }
}

/// Main REPL engine that orchestrates all components.
pub struct ReplEngine<H: ReplHandler> {
    config: ReplConfig,
    input: Box<dyn ConsoleInput>,
    renderer: Renderer,
    buffer: LineBuffer,
    dispatcher: KeyDispatcher,
    handler: H,
}

impl<H: ReplHandler> ReplEngine<H> {
    /// Create a new REPL engine with the given configuration.
    pub fn new(
        config: ReplConfig,
        input: Box<dyn ConsoleInput>,
        output: Box<dyn ConsoleOutput>,
        handler: H,
    ) -> Result<Self, ReplError> {
        config.validate()?;

        Ok(ReplEngine {
            buffer: LineBuffer::new(config.initial_capacity),
            dispatcher: KeyDispatcher::new(&config),
            renderer: Renderer::new(output),
            input,
            handler,
            config,
        })
    }

    /// Get a reference to the current configuration.
    pub fn config(&self) -> &ReplConfig {
        &self.config
    }

    pub fn buffer(&self) -> &LineBuffer {
        &self.buffer
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Consume the engine and hand the handler back.
    pub fn into_handler(self) -> H {
        self.handler
    }

    /// Run one session until end of input on an empty line.
    ///
    /// The terminal mode is acquired first; failing that, the handler is never
    /// started. Once started, `stop` receives the final history on every exit
    /// path, and the terminal is restored before this returns. A read failure,
    /// including the input stream closing, ends the session with an error.
    pub fn run(&mut self) -> Result<(), ReplError> {
        let guard = self.input.enable_raw_mode(self.config.terminal_mode)?;
        debug!(
            "session started in {} mode on {}",
            guard.mode(),
            guard.platform_info()
        );

        let result = self.run_session();
        debug!(
            "session ended, handing {} history entries to handler",
            self.buffer.history().len()
        );
        self.handler.stop(self.buffer.history());

        let restored = guard.restore();
        result?;
        restored?;
        Ok(())
    }

    fn run_session(&mut self) -> Result<(), ReplError> {
        let seed = self.handler.start();
        if !seed.is_empty() {
            debug!("seeding history with {} entries", seed.len());
            self.buffer.set_history(seed);
        }
        self.dispatcher
            .refresh_prompt(&mut self.renderer, &self.handler)?;

        loop {
            let byte = match self.input.read_byte() {
                Ok(byte) => byte,
                Err(e) => {
                    warn!("terminal read failed: {e}");
                    return Err(e.into());
                }
            };
            let flow = self.dispatcher.dispatch(
                byte,
                &mut self.buffer,
                &mut self.renderer,
                &mut self.handler,
            )?;
            self.buffer.validate_state()?;
            if flow == Flow::Finished {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::{ConsoleResult, RawModeGuard};
    use crate::handler::{EvalError, Evaluation};
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct ScriptInput {
        bytes: Arc<Mutex<VecDeque<u8>>>,
        restores: Arc<AtomicUsize>,
        refuse_raw_mode: bool,
    }

    impl ScriptInput {
        fn with(bytes: &[u8]) -> Self {
            let input = ScriptInput::default();
            input.bytes.lock().unwrap().extend(bytes.iter().copied());
            input
        }
    }

    impl ConsoleInput for ScriptInput {
        fn enable_raw_mode(&self, mode: TerminalMode) -> ConsoleResult<RawModeGuard> {
            if self.refuse_raw_mode {
                return Err(ConsoleError::TerminalError("not a terminal".to_string()));
            }
            let restores = Arc::clone(&self.restores);
            Ok(RawModeGuard::new(
                mode,
                move || {
                    restores.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                },
                "script".to_string(),
            ))
        }

        fn read_byte(&self) -> ConsoleResult<u8> {
            self.bytes
                .lock()
                .unwrap()
                .pop_front()
                .ok_or(ConsoleError::EndOfStream)
        }
    }

    #[derive(Clone, Default)]
    struct SinkOutput(Arc<Mutex<Vec<u8>>>);

    impl ConsoleOutput for SinkOutput {
        fn write_bytes(&self, bytes: &[u8]) -> ConsoleResult<()> {
            self.0.lock().unwrap().extend_from_slice(bytes);
            Ok(())
        }

        fn flush(&self) -> ConsoleResult<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct Recorder {
        started: usize,
        stopped: Vec<Vec<String>>,
        lines: Vec<String>,
    }

    impl ReplHandler for Recorder {
        type Output = usize;

        fn start(&mut self) -> Vec<String> {
            self.started += 1;
            vec!["seed".to_string()]
        }

        fn stop(&mut self, history: &[String]) {
            self.stopped.push(history.to_vec());
        }

        fn prompt(&self) -> String {
            "$ ".to_string()
        }

        fn eval(&mut self, line: &str) -> Result<Evaluation<usize>, EvalError> {
            self.lines.push(line.to_string());
            Ok(Evaluation::Value(line.len()))
        }
    }

    fn engine(input: ScriptInput) -> ReplEngine<Recorder> {
        ReplEngine::new(
            ReplConfig::default(),
            Box::new(input),
            Box::new(SinkOutput::default()),
            Recorder::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = ReplConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.initial_capacity, 1024);
        assert_eq!(config.highlight_pause, Duration::from_millis(150));
        assert_eq!(config.terminal_mode, TerminalMode::Raw);
    }

    #[test]
    fn test_validate_config_zero_capacity() {
        let config = ReplConfig {
            initial_capacity: 0,
            ..ReplConfig::default()
        };
        match config.validate() {
            Err(ReplError::ConfigurationError(msg)) => assert!(msg.contains("capacity")),
            other => panic!("Expected ConfigurationError, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_config_escape_in_notice() {
        let config = ReplConfig {
            interrupt_notice: "\x1b[31mstop\n".to_string(),
            ..ReplConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_run_stops_handler_once_on_eof() {
        let input = ScriptInput::with(b"abc\r\x04");
        let restores = Arc::clone(&input.restores);
        let mut engine = engine(input);
        engine.run().unwrap();

        let handler = engine.into_handler();
        assert_eq!(handler.started, 1);
        assert_eq!(handler.lines, ["abc"]);
        assert_eq!(
            handler.stopped,
            [vec!["seed".to_string(), "abc".to_string()]]
        );
        assert_eq!(restores.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_run_propagates_read_failure_after_stop() {
        let input = ScriptInput::with(b"x");
        let restores = Arc::clone(&input.restores);
        let mut engine = engine(input);
        let err = engine.run().unwrap_err();
        assert!(err.is_end_of_stream());
        assert_eq!(engine.handler().stopped.len(), 1);
        assert_eq!(restores.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_run_fails_before_start_without_terminal() {
        let input = ScriptInput {
            refuse_raw_mode: true,
            ..ScriptInput::default()
        };
        let mut engine = engine(input);
        let err = engine.run().unwrap_err();
        assert!(matches!(
            err,
            ReplError::ConsoleError(ConsoleError::TerminalError(_))
        ));
        assert_eq!(engine.handler().started, 0);
        assert!(engine.handler().stopped.is_empty());
    }
}
