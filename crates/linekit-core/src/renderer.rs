//! Display rendering for the edited line.
//!
//! Every redraw repaints the whole line: carriage return, prompt, buffer text,
//! padding over stale trailing characters, then enough cursor-left moves to put
//! the terminal cursor back on the buffer cursor. A frame is composed into one
//! byte vector and written with a single call.

use crate::{
    buffer::LineBuffer,
    console::{ConsoleOutput, CURSOR_BACKWARD},
    repl::ReplError,
};

/// Compose the bytes that redraw `text` after `prompt`.
///
/// `extra` blanks are written after the text to erase characters left over from
/// a longer previous line; `cursor` is the byte offset into `text` where the
/// terminal cursor should end up.
///
/// # Examples
///
/// ```
/// use linekit_core::renderer::compose_line;
///
/// let mut frame = Vec::new();
/// compose_line(&mut frame, "> ", b"ab", 1, 1);
/// assert_eq!(frame, b"\r> ab \x1b[1D\x1b[1D");
/// ```
pub fn compose_line(frame: &mut Vec<u8>, prompt: &str, text: &[u8], extra: usize, cursor: usize) {
    frame.push(b'\r');
    frame.extend_from_slice(prompt.as_bytes());
    frame.extend_from_slice(text);
    frame.resize(frame.len() + extra, b' ');
    let moves = (text.len() + extra).saturating_sub(cursor);
    for _ in 0..moves {
        frame.extend_from_slice(CURSOR_BACKWARD);
    }
}

/// Keeps the terminal line in step with a [`LineBuffer`].
pub struct Renderer {
    /// Console output interface for writing to terminal
    output: Box<dyn ConsoleOutput>,
    /// Scratch space reused for every frame
    frame: Vec<u8>,
}

impl Renderer {
    pub fn new(output: Box<dyn ConsoleOutput>) -> Self {
        Renderer {
            output,
            frame: Vec::new(),
        }
    }

    /// Redraw the line with the terminal cursor on the buffer cursor.
    pub fn draw_line(
        &mut self,
        prompt: &str,
        buffer: &LineBuffer,
        extra: usize,
    ) -> Result<(), ReplError> {
        self.draw_line_at(prompt, buffer, extra, buffer.cursor())
    }

    /// Redraw the line with the terminal cursor at `cursor` instead of the
    /// buffer cursor. The buffer itself is not touched.
    pub fn draw_line_at(
        &mut self,
        prompt: &str,
        buffer: &LineBuffer,
        extra: usize,
        cursor: usize,
    ) -> Result<(), ReplError> {
        self.frame.clear();
        compose_line(&mut self.frame, prompt, buffer.as_bytes(), extra, cursor);
        self.output.write_bytes(&self.frame)?;
        self.output.flush()?;
        Ok(())
    }

    /// Write the prompt at the current terminal position.
    pub fn show_prompt(&mut self, prompt: &str) -> Result<(), ReplError> {
        self.write_text(prompt)
    }

    pub fn write_text(&mut self, text: &str) -> Result<(), ReplError> {
        if text.is_empty() {
            return Ok(());
        }
        self.output.write_text(text)?;
        self.output.flush()?;
        Ok(())
    }

    pub fn newline(&mut self) -> Result<(), ReplError> {
        self.output.newline()?;
        self.output.flush()?;
        Ok(())
    }

    /// Sound the audible error signal.
    pub fn beep(&mut self) -> Result<(), ReplError> {
        self.output.beep()?;
        self.output.flush()?;
        Ok(())
    }

    pub fn cursor_forward(&mut self) -> Result<(), ReplError> {
        self.output.cursor_forward()?;
        Ok(())
    }

    pub fn cursor_backward(&mut self) -> Result<(), ReplError> {
        self.output.cursor_backward()?;
        Ok(())
    }

    /// Print completion candidates one per line, leaving the terminal on a fresh line.
    pub fn print_candidates(&mut self, candidates: &[String]) -> Result<(), ReplError> {
        self.frame.clear();
        for candidate in candidates {
            self.frame.push(b'\n');
            self.frame.extend_from_slice(candidate.as_bytes());
        }
        self.frame.push(b'\n');
        self.output.write_bytes(&self.frame)?;
        self.output.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ConsoleResult;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct RecordingOutput(Arc<Mutex<Vec<u8>>>);

    impl RecordingOutput {
        fn take(&self) -> Vec<u8> {
            std::mem::take(&mut *self.0.lock().unwrap())
        }
    }

    impl ConsoleOutput for RecordingOutput {
        fn write_bytes(&self, bytes: &[u8]) -> ConsoleResult<()> {
            self.0.lock().unwrap().extend_from_slice(bytes);
            Ok(())
        }

        fn flush(&self) -> ConsoleResult<()> {
            Ok(())
        }
    }

    fn renderer() -> (Renderer, RecordingOutput) {
        let output = RecordingOutput::default();
        (Renderer::new(Box::new(output.clone())), output)
    }

    #[test]
    fn test_compose_cursor_at_end() {
        let mut frame = Vec::new();
        compose_line(&mut frame, ">>> ", b"abc", 0, 3);
        assert_eq!(frame, b"\r>>> abc");
    }

    #[test]
    fn test_compose_cursor_inside_with_padding() {
        let mut frame = Vec::new();
        compose_line(&mut frame, "", b"abc", 2, 1);
        let mut expected = b"\rabc  ".to_vec();
        for _ in 0..4 {
            expected.extend_from_slice(b"\x1b[1D");
        }
        assert_eq!(frame, expected);
    }

    #[test]
    fn test_draw_line_follows_buffer_cursor() {
        let (mut renderer, output) = renderer();
        let mut buffer = LineBuffer::new(8);
        buffer.insert_bytes(b"2+2");
        buffer.backward();
        renderer.draw_line("> ", &buffer, 0).unwrap();
        assert_eq!(output.take(), b"\r> 2+2\x1b[1D");
    }

    #[test]
    fn test_draw_line_at_leaves_buffer_alone() {
        let (mut renderer, output) = renderer();
        let mut buffer = LineBuffer::new(8);
        buffer.insert_bytes(b"(a)");
        renderer.draw_line_at("", &buffer, 0, 0).unwrap();
        assert_eq!(buffer.cursor(), 3);
        assert_eq!(output.take(), b"\r(a)\x1b[1D\x1b[1D\x1b[1D");
    }

    #[test]
    fn test_print_candidates() {
        let (mut renderer, output) = renderer();
        renderer
            .print_candidates(&["print".to_string(), "println".to_string()])
            .unwrap();
        assert_eq!(output.take(), b"\nprint\nprintln\n");
    }

    #[test]
    fn test_empty_prompt_writes_nothing() {
        let (mut renderer, output) = renderer();
        renderer.show_prompt("").unwrap();
        assert!(output.take().is_empty());
        renderer.beep().unwrap();
        assert_eq!(output.take(), b"\x07");
    }
}
