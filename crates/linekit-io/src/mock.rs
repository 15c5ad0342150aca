//! Mock console implementations for testing
//!
//! Both halves are cheap handles over shared state: clone one, hand the clone to
//! the engine, and keep the original to script input or inspect output.

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::{ConsoleError, ConsoleInput, ConsoleOutput, ConsoleResult, RawModeGuard, TerminalMode};

/// Mock console input for testing
#[derive(Clone, Default)]
pub struct MockConsoleInput {
    input_queue: Arc<Mutex<VecDeque<u8>>>,
    read_failure: Arc<Mutex<Option<io::ErrorKind>>>,
    refuse_raw_mode: Arc<AtomicBool>,
    raw_mode_acquired: Arc<AtomicUsize>,
    raw_mode_restored: Arc<AtomicUsize>,
    last_mode: Arc<Mutex<Option<TerminalMode>>>,
}

impl MockConsoleInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue raw bytes to be read in order.
    pub fn queue_bytes(&self, bytes: &[u8]) {
        self.input_queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(bytes.iter().copied());
    }

    /// Queue the bytes of `text`.
    pub fn queue_text(&self, text: &str) {
        self.queue_bytes(text.as_bytes());
    }

    /// Get the number of bytes not read yet
    pub fn queued_byte_count(&self) -> usize {
        self.input_queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Fail with an I/O error of `kind` once the queue is drained, instead of
    /// reporting end of stream.
    pub fn fail_reads_with(&self, kind: io::ErrorKind) {
        *self
            .read_failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(kind);
    }

    /// Make `enable_raw_mode` fail as it does when stdin is not a terminal.
    pub fn refuse_raw_mode(&self) {
        self.refuse_raw_mode.store(true, Ordering::SeqCst);
    }

    pub fn raw_mode_acquisitions(&self) -> usize {
        self.raw_mode_acquired.load(Ordering::SeqCst)
    }

    pub fn raw_mode_restorations(&self) -> usize {
        self.raw_mode_restored.load(Ordering::SeqCst)
    }

    /// Mode requested by the most recent acquisition.
    pub fn last_mode(&self) -> Option<TerminalMode> {
        *self.last_mode.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ConsoleInput for MockConsoleInput {
    fn enable_raw_mode(&self, mode: TerminalMode) -> ConsoleResult<RawModeGuard> {
        if self.refuse_raw_mode.load(Ordering::SeqCst) {
            return Err(ConsoleError::TerminalError(
                "stdin is not a TTY".to_string(),
            ));
        }
        self.raw_mode_acquired.fetch_add(1, Ordering::SeqCst);
        *self.last_mode.lock().unwrap_or_else(PoisonError::into_inner) = Some(mode);

        let restored = Arc::clone(&self.raw_mode_restored);
        let restore_fn = move || {
            restored.fetch_add(1, Ordering::SeqCst);
            Ok(())
        };
        Ok(RawModeGuard::new(mode, restore_fn, "Mock".to_string()))
    }

    fn read_byte(&self) -> ConsoleResult<u8> {
        let next = self
            .input_queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        if let Some(byte) = next {
            return Ok(byte);
        }
        match *self.read_failure.lock().unwrap_or_else(PoisonError::into_inner) {
            Some(kind) => Err(ConsoleError::IoError(io::Error::new(
                kind,
                "injected read failure",
            ))),
            None => Err(ConsoleError::EndOfStream),
        }
    }
}

/// Mock console output for testing
#[derive(Clone, Default)]
pub struct MockConsoleOutput {
    output: Arc<Mutex<Vec<u8>>>,
    flush_count: Arc<AtomicUsize>,
}

impl MockConsoleOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get everything written so far
    pub fn get_output(&self) -> Vec<u8> {
        self.output
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn get_output_string(&self) -> String {
        String::from_utf8_lossy(&self.get_output()).into_owned()
    }

    /// Clear captured output
    pub fn clear_output(&self) {
        self.output
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn flush_count(&self) -> usize {
        self.flush_count.load(Ordering::SeqCst)
    }
}

impl ConsoleOutput for MockConsoleOutput {
    fn write_bytes(&self, bytes: &[u8]) -> ConsoleResult<()> {
        self.output
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(bytes);
        Ok(())
    }

    fn flush(&self) -> ConsoleResult<()> {
        self.flush_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
