//! The capability interface an embedding application implements.
//!
//! The engine calls the handler synchronously from its dispatch loop: a slow
//! `eval` freezes input handling until it returns, but cannot corrupt the
//! editor state.

use std::error::Error;
use std::fmt::Display;

/// Error returned by [`ReplHandler::eval`]; reported to the user, never fatal.
pub type EvalError = Box<dyn Error + Send + Sync>;

/// Outcome of evaluating a submitted line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation<T> {
    /// The line was complete; the value is printed followed by a newline
    Value(T),
    /// The input is incomplete. The handler keeps what it has accumulated
    /// and the engine reads the next line without a prompt.
    NeedMore,
}

/// Answer to a completion request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completion {
    /// Text inserted verbatim at the cursor
    pub addendum: String,
    /// Full candidates; exactly one means the completion is unambiguous
    pub candidates: Vec<String>,
}

impl Completion {
    /// No addendum and no candidates.
    pub fn none() -> Self {
        Self::default()
    }

    /// A single match: the engine inserts `addendum` and a trailing space.
    pub fn unique(addendum: impl Into<String>, candidate: impl Into<String>) -> Self {
        Completion {
            addendum: addendum.into(),
            candidates: vec![candidate.into()],
        }
    }

    /// Several matches, shown when Tab is pressed a second time.
    pub fn ambiguous(addendum: impl Into<String>, candidates: Vec<String>) -> Self {
        Completion {
            addendum: addendum.into(),
            candidates,
        }
    }

    pub fn is_unambiguous(&self) -> bool {
        self.candidates.len() == 1
    }
}

/// Callbacks the line-editing loop drives.
///
/// Only `prompt` and `eval` are required.
///
/// # Examples
///
/// ```
/// use linekit_core::handler::{EvalError, Evaluation, ReplHandler};
///
/// struct Echo;
///
/// impl ReplHandler for Echo {
///     type Output = String;
///
///     fn prompt(&self) -> String {
///         "echo> ".to_string()
///     }
///
///     fn eval(&mut self, line: &str) -> Result<Evaluation<String>, EvalError> {
///         Ok(Evaluation::Value(line.to_string()))
///     }
/// }
/// ```
pub trait ReplHandler {
    type Output: Display;

    /// Called once before the loop; returns history to seed the session with.
    fn start(&mut self) -> Vec<String> {
        Vec::new()
    }

    /// Called once when the loop ends, on every exit path, with the final history.
    fn stop(&mut self, _history: &[String]) {}

    /// Prompt text for the next line.
    fn prompt(&self) -> String;

    fn eval(&mut self, line: &str) -> Result<Evaluation<Self::Output>, EvalError>;

    /// Complete `text`, the line up to the cursor.
    fn complete(&mut self, _text: &str) -> Completion {
        Completion::none()
    }

    /// Discard any partially accumulated input after an interrupt.
    fn reset(&mut self) {}
}

impl<H: ReplHandler + ?Sized> ReplHandler for Box<H> {
    type Output = H::Output;

    fn start(&mut self) -> Vec<String> {
        (**self).start()
    }

    fn stop(&mut self, history: &[String]) {
        (**self).stop(history)
    }

    fn prompt(&self) -> String {
        (**self).prompt()
    }

    fn eval(&mut self, line: &str) -> Result<Evaluation<Self::Output>, EvalError> {
        (**self).eval(line)
    }

    fn complete(&mut self, text: &str) -> Completion {
        (**self).complete(text)
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}
