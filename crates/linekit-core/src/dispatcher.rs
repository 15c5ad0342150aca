//! Byte-at-a-time key dispatch.
//!
//! [`KeyDispatcher`] is the editing state machine. It holds only the transient
//! session state (meta prefix, last byte, pending completion candidates and the
//! current prompt); the line itself lives in a [`LineBuffer`] and the terminal
//! behind a [`Renderer`], both passed in for every byte.

use crate::{
    buffer::LineBuffer,
    handler::{Evaluation, ReplHandler},
    key::{matching_open, Key, BACKSPACE, DELETE, SPACE, TAB},
    renderer::Renderer,
    repl::{ReplConfig, ReplError},
};
use log::{debug, trace};
use std::thread;
use std::time::Duration;

/// Where the next byte is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchState {
    #[default]
    Normal,
    /// An ESCAPE was read; the next byte selects a word command
    MetaPending,
}

/// Whether the loop keeps reading after a byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// End of input on an empty line
    Finished,
}

pub struct KeyDispatcher {
    state: DispatchState,
    /// Previous byte dispatched in the normal state, for Tab repeat detection
    last_byte: Option<u8>,
    pending_completions: Vec<String>,
    prompt: String,
    bracket_highlight: bool,
    highlight_pause: Duration,
    interrupt_notice: String,
    error_prefix: String,
}

impl KeyDispatcher {
    pub fn new(config: &ReplConfig) -> Self {
        KeyDispatcher {
            state: DispatchState::Normal,
            last_byte: None,
            pending_completions: Vec::new(),
            prompt: String::new(),
            bracket_highlight: config.bracket_highlight,
            highlight_pause: config.highlight_pause,
            interrupt_notice: config.interrupt_notice.clone(),
            error_prefix: config.error_prefix.clone(),
        }
    }

    pub fn state(&self) -> DispatchState {
        self.state
    }

    /// Prompt used for redraws; empty while the handler waits for more input.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn pending_completions(&self) -> &[String] {
        &self.pending_completions
    }

    /// Ask the handler for a new prompt and show it.
    pub fn refresh_prompt<H: ReplHandler>(
        &mut self,
        renderer: &mut Renderer,
        handler: &H,
    ) -> Result<(), ReplError> {
        self.prompt = handler.prompt();
        renderer.show_prompt(&self.prompt)
    }

    /// Interpret one input byte.
    pub fn dispatch<H: ReplHandler>(
        &mut self,
        byte: u8,
        buffer: &mut LineBuffer,
        renderer: &mut Renderer,
        handler: &mut H,
    ) -> Result<Flow, ReplError> {
        trace!("dispatch byte {byte:#04x} in {:?}", self.state);
        if byte != TAB || self.state == DispatchState::MetaPending {
            self.pending_completions.clear();
        }
        match self.state {
            DispatchState::MetaPending => {
                self.state = DispatchState::Normal;
                self.last_byte = None;
                self.dispatch_meta(byte, buffer, renderer)?;
                Ok(Flow::Continue)
            }
            DispatchState::Normal => {
                let flow = self.dispatch_key(Key::from_byte(byte), buffer, renderer, handler)?;
                self.last_byte = Some(byte);
                Ok(flow)
            }
        }
    }

    fn dispatch_meta(
        &mut self,
        byte: u8,
        buffer: &mut LineBuffer,
        renderer: &mut Renderer,
    ) -> Result<(), ReplError> {
        match byte {
            DELETE | BACKSPACE => {
                let n = buffer.word_backspace();
                renderer.draw_line(&self.prompt, buffer, n)
            }
            b'd' => {
                let n = buffer.word_delete();
                renderer.draw_line(&self.prompt, buffer, n)
            }
            b'b' => {
                buffer.word_backward();
                renderer.draw_line(&self.prompt, buffer, 0)
            }
            b'f' => {
                buffer.word_forward();
                renderer.draw_line(&self.prompt, buffer, 0)
            }
            _ => renderer.beep(),
        }
    }

    fn dispatch_key<H: ReplHandler>(
        &mut self,
        key: Key,
        buffer: &mut LineBuffer,
        renderer: &mut Renderer,
        handler: &mut H,
    ) -> Result<Flow, ReplError> {
        match key {
            Key::Escape => self.state = DispatchState::MetaPending,
            Key::EndOfInput if buffer.is_empty() => {
                debug!("end of input on empty line");
                renderer.newline()?;
                return Ok(Flow::Finished);
            }
            Key::EndOfInput => {
                if buffer.delete() {
                    renderer.draw_line(&self.prompt, buffer, 1)?;
                } else {
                    renderer.beep()?;
                }
            }
            Key::BeginningOfLine => {
                buffer.begin();
                renderer.draw_line(&self.prompt, buffer, 0)?;
            }
            Key::EndOfLine => {
                buffer.end();
                renderer.draw_line(&self.prompt, buffer, 0)?;
            }
            Key::Forward => {
                if buffer.forward() {
                    renderer.cursor_forward()?;
                    renderer.draw_line(&self.prompt, buffer, 0)?;
                } else {
                    renderer.beep()?;
                }
            }
            Key::Backward => {
                if buffer.backward() {
                    renderer.cursor_backward()?;
                    renderer.draw_line(&self.prompt, buffer, 0)?;
                } else {
                    renderer.beep()?;
                }
            }
            Key::Interrupt => {
                debug!("interrupt, discarding {} bytes", buffer.len());
                renderer.write_text(&self.interrupt_notice)?;
                buffer.clear();
                handler.reset();
                self.refresh_prompt(renderer, handler)?;
            }
            Key::KillToEnd => {
                let n = buffer.kill_to_end();
                renderer.draw_line(&self.prompt, buffer, n)?;
            }
            Key::Yank => {
                buffer.yank();
                renderer.draw_line(&self.prompt, buffer, 0)?;
            }
            Key::Redraw => {
                renderer.newline()?;
                renderer.draw_line(&self.prompt, buffer, 0)?;
            }
            Key::HistoryNext => {
                let width = buffer.next_in_history();
                renderer.draw_line(&self.prompt, buffer, width - buffer.len())?;
            }
            Key::HistoryPrev => {
                let width = buffer.prev_in_history();
                renderer.draw_line(&self.prompt, buffer, width - buffer.len())?;
            }
            Key::Tab => self.complete(buffer, renderer, handler)?,
            Key::Backspace => {
                if buffer.backward() {
                    buffer.delete();
                    renderer.draw_line(&self.prompt, buffer, 1)?;
                } else {
                    renderer.beep()?;
                }
            }
            Key::Return => self.submit(buffer, renderer, handler)?,
            Key::Printable(byte) => {
                buffer.insert(byte);
                renderer.draw_line(&self.prompt, buffer, 0)?;
                if let Some(open) = matching_open(byte) {
                    if self.bracket_highlight {
                        self.highlight_match(buffer, renderer, open, byte)?;
                    }
                }
            }
            Key::Unknown(_) => renderer.beep()?,
        }
        Ok(Flow::Continue)
    }

    /// First Tab asks the handler; a repeated Tab lists the pending candidates.
    fn complete<H: ReplHandler>(
        &mut self,
        buffer: &mut LineBuffer,
        renderer: &mut Renderer,
        handler: &mut H,
    ) -> Result<(), ReplError> {
        if self.last_byte == Some(TAB) {
            if self.pending_completions.is_empty() {
                return renderer.beep();
            }
            renderer.print_candidates(&self.pending_completions)?;
            return renderer.draw_line(&self.prompt, buffer, 0);
        }

        let completion = handler.complete(&buffer.text_before_cursor());
        trace!(
            "completion: addendum {:?}, {} candidates",
            completion.addendum,
            completion.candidates.len()
        );
        if !completion.addendum.is_empty() {
            buffer.insert_bytes(completion.addendum.as_bytes());
        }
        if completion.is_unambiguous() {
            buffer.insert(SPACE);
            self.pending_completions.clear();
        } else {
            self.pending_completions = completion.candidates;
            renderer.beep()?;
        }
        renderer.draw_line(&self.prompt, buffer, 0)
    }

    fn submit<H: ReplHandler>(
        &mut self,
        buffer: &mut LineBuffer,
        renderer: &mut Renderer,
        handler: &mut H,
    ) -> Result<(), ReplError> {
        if !buffer.is_empty() {
            renderer.newline()?;
        }
        let line = buffer.text();
        buffer.add_to_history(line.clone());
        buffer.clear();
        debug!("submitting line of {} bytes", line.len());

        match handler.eval(&line) {
            Err(err) => {
                debug!("evaluation failed: {err}");
                renderer.write_text(&format!("{}{err}\n", self.error_prefix))?;
                self.refresh_prompt(renderer, handler)
            }
            Ok(Evaluation::NeedMore) => {
                debug!("handler needs more input");
                self.prompt.clear();
                Ok(())
            }
            Ok(Evaluation::Value(value)) => {
                renderer.write_text(&format!("{value}\n"))?;
                self.refresh_prompt(renderer, handler)
            }
        }
    }

    /// Flash the cursor on the opener matching the closer just typed.
    fn highlight_match(
        &self,
        buffer: &LineBuffer,
        renderer: &mut Renderer,
        open: u8,
        close: u8,
    ) -> Result<(), ReplError> {
        let close_at = buffer.cursor().saturating_sub(1);
        match find_matching_open(buffer.as_bytes(), close_at, open, close) {
            Some(position) => {
                renderer.draw_line_at(&self.prompt, buffer, 0, position)?;
                if !self.highlight_pause.is_zero() {
                    thread::sleep(self.highlight_pause);
                }
                renderer.draw_line(&self.prompt, buffer, 0)
            }
            None => renderer.beep(),
        }
    }
}

/// Find the opener balancing the closer at `close_at`, scanning backward.
///
/// Closers of the same kind seen on the way nest; other bracket kinds are
/// ignored.
///
/// # Examples
///
/// ```
/// use linekit_core::dispatcher::find_matching_open;
///
/// assert_eq!(find_matching_open(b"(a (b) c)", 8, b'(', b')'), Some(0));
/// assert_eq!(find_matching_open(b"a)", 1, b'(', b')'), None);
/// ```
pub fn find_matching_open(text: &[u8], close_at: usize, open: u8, close: u8) -> Option<usize> {
    let end = close_at.min(text.len());
    let mut depth = 1usize;
    for (i, &byte) in text[..end].iter().enumerate().rev() {
        if byte == open {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        } else if byte == close {
            depth += 1;
        }
    }
    None
}
