//! The calculator as a line editor handler.

use crate::calc::{self, Calculator};
use linekit::history::DEFAULT_HISTORY_LIMIT;
use linekit::prelude::*;
use log::{debug, warn};
use std::path::PathBuf;

/// Feeds submitted lines to a [`Calculator`].
///
/// A line that leaves parentheses open is held back and the next line is
/// appended to it, so an expression may span several lines.
#[derive(Debug, Default)]
pub struct CalcHandler {
    calc: Calculator,
    prompt: String,
    pending: String,
    history_file: Option<PathBuf>,
}

impl CalcHandler {
    pub fn new(prompt: impl Into<String>) -> Self {
        CalcHandler {
            prompt: prompt.into(),
            ..CalcHandler::default()
        }
    }

    /// Load history from `path` on start and write it back on stop.
    pub fn with_history_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.history_file = Some(path.into());
        self
    }

    /// Input held back waiting for closing parentheses.
    pub fn pending(&self) -> &str {
        &self.pending
    }

    fn completer(&self) -> PrefixCompleter {
        let mut completer = PrefixCompleter::new(calc::KEYWORDS.iter().copied());
        completer.extend(calc::FUNCTIONS.iter().copied());
        completer.extend(self.calc.variables());
        completer
    }
}

impl ReplHandler for CalcHandler {
    type Output = String;

    fn start(&mut self) -> Vec<String> {
        let Some(path) = &self.history_file else {
            return Vec::new();
        };
        match load_history(path) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("could not read history file {}: {}", path.display(), e);
                Vec::new()
            }
        }
    }

    fn stop(&mut self, history: &[String]) {
        if let Some(path) = &self.history_file {
            if let Err(e) = save_history(path, history, DEFAULT_HISTORY_LIMIT) {
                warn!("could not write history file {}: {}", path.display(), e);
            }
        }
    }

    fn prompt(&self) -> String {
        self.prompt.clone()
    }

    fn eval(&mut self, line: &str) -> Result<Evaluation<String>, EvalError> {
        if !self.pending.is_empty() {
            self.pending.push(' ');
        }
        self.pending.push_str(line);

        if calc::open_depth(&self.pending) > 0 {
            debug!("waiting for more input: {:?}", self.pending());
            return Ok(Evaluation::NeedMore);
        }

        let input = std::mem::take(&mut self.pending);
        if input.trim().is_empty() {
            return Ok(Evaluation::Value(String::new()));
        }
        let value = self.calc.evaluate(&input)?;
        Ok(Evaluation::Value(value.to_string()))
    }

    fn complete(&mut self, text: &str) -> Completion {
        let start = text
            .char_indices()
            .rev()
            .find(|&(_, c)| !calc::is_ident_char(c))
            .map_or(0, |(index, c)| index + c.len_utf8());
        let word = &text[start..];
        if word.is_empty() {
            return Completion::none();
        }
        self.completer().complete(word)
    }

    fn reset(&mut self) {
        self.pending.clear();
    }
}
