//! Line buffer for single-line, byte-oriented editing.
//!
//! [`LineBuffer`] owns the text being edited, the cursor, a one-slot kill/yank
//! register and the session history. It performs no I/O: the dispatcher calls
//! these operations and asks the renderer to redraw afterwards.
//!
//! Kills coalesce. While the coalescing flag is set, every kill appends to the
//! yank register instead of replacing it. Kills and `yank` set the flag; any
//! other insertion or cursor motion clears it.

use crate::error::{BufferError, BufferResult};
use crate::key::SPACE;
use log::trace;

/// Default storage reserved for a new session buffer.
pub const DEFAULT_CAPACITY: usize = 1024;

/// A mutable edit buffer with cursor, yank register and history.
#[derive(Debug, Clone)]
pub struct LineBuffer {
    /// Valid bytes of the line; `content.len()` is the line length
    content: Vec<u8>,
    /// Edit position, `0..=content.len()`
    cursor: usize,
    /// Text removed by the most recent (coalesced) kill
    yanked: String,
    /// Whether the next kill appends to `yanked`
    coalescing: bool,
    /// Submitted lines, oldest first
    history: Vec<String>,
    /// Entry currently shown while browsing history
    history_cursor: Option<usize>,
}

impl LineBuffer {
    /// Create an empty buffer with room for `capacity` bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// use linekit_core::buffer::LineBuffer;
    ///
    /// let buffer = LineBuffer::new(64);
    /// assert!(buffer.is_empty());
    /// assert!(buffer.capacity() >= 64);
    /// ```
    pub fn new(capacity: usize) -> Self {
        LineBuffer {
            content: Vec::with_capacity(capacity),
            cursor: 0,
            yanked: String::new(),
            coalescing: false,
            history: Vec::new(),
            history_cursor: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Number of valid bytes.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Allocated storage; grows when an insertion finds it full, never shrinks.
    pub fn capacity(&self) -> usize {
        self.content.capacity()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.content
    }

    /// The valid prefix of the buffer as text.
    ///
    /// Bytes that do not form valid UTF-8 are replaced, which can only happen
    /// when an edit splits a multi-byte sequence inserted from a completion
    /// or history entry.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }

    /// Text between the start of the line and the cursor.
    pub fn text_before_cursor(&self) -> String {
        String::from_utf8_lossy(&self.content[..self.cursor]).into_owned()
    }

    pub fn yanked(&self) -> &str {
        &self.yanked
    }

    pub fn is_coalescing(&self) -> bool {
        self.coalescing
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Index of the history entry being browsed, `None` when not browsing.
    pub fn history_cursor(&self) -> Option<usize> {
        self.history_cursor
    }

    /// Replace the whole history, e.g. with entries persisted by an earlier session.
    pub fn set_history(&mut self, entries: Vec<String>) {
        self.history = entries;
        self.history_cursor = None;
    }

    /// Empty the line. Storage and history are kept.
    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
        self.coalescing = false;
    }

    /// Insert one byte at the cursor and advance past it.
    pub fn insert(&mut self, byte: u8) {
        self.coalescing = false;
        self.content.insert(self.cursor, byte);
        self.cursor += 1;
    }

    /// Insert bytes at the cursor, in order, leaving the cursor after them.
    pub fn insert_bytes(&mut self, bytes: &[u8]) {
        self.coalescing = false;
        self.content
            .splice(self.cursor..self.cursor, bytes.iter().copied());
        self.cursor += bytes.len();
    }

    /// Remove the byte under the cursor. Returns false at the end of the line.
    pub fn delete(&mut self) -> bool {
        self.coalescing = false;
        if self.cursor < self.content.len() {
            self.content.remove(self.cursor);
            true
        } else {
            false
        }
    }

    /// Kill from the cursor to the end of the line into the yank register.
    ///
    /// Returns the number of bytes removed.
    pub fn kill_to_end(&mut self) -> usize {
        let removed = self.content.len() - self.cursor;
        self.store_killed(self.cursor, self.content.len());
        self.content.truncate(self.cursor);
        self.coalescing = true;
        removed
    }

    /// Kill `begin..end` into the yank register and leave the cursor at `begin`.
    ///
    /// `end` is clamped to the line length. A `begin` past the end of the line,
    /// or a range that is empty after clamping, leaves the buffer untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use linekit_core::buffer::LineBuffer;
    ///
    /// let mut buffer = LineBuffer::new(16);
    /// buffer.insert_bytes(b"hello world");
    /// assert_eq!(buffer.delete_range(5, 100), 6);
    /// assert_eq!(buffer.text(), "hello");
    /// assert_eq!(buffer.yanked(), " world");
    /// assert_eq!(buffer.delete_range(9, 12), 0);
    /// ```
    pub fn delete_range(&mut self, begin: usize, end: usize) -> usize {
        if begin > self.content.len() {
            return 0;
        }
        let end = end.min(self.content.len());
        if end <= begin {
            return 0;
        }
        self.store_killed(begin, end);
        self.content.drain(begin..end);
        self.cursor = begin;
        self.coalescing = true;
        end - begin
    }

    /// Move the cursor to the start of the word before it.
    pub fn word_backward(&mut self) {
        self.coalescing = false;
        self.cursor = self.word_start_before(self.cursor);
    }

    /// Move the cursor to the end of the word after it.
    pub fn word_forward(&mut self) {
        self.coalescing = false;
        self.cursor = self.word_end_after(self.cursor);
    }

    /// Kill from the start of the previous word to the cursor.
    pub fn word_backspace(&mut self) -> usize {
        let start = self.word_start_before(self.cursor);
        self.delete_range(start, self.cursor)
    }

    /// Kill from the cursor to the end of the next word.
    pub fn word_delete(&mut self) -> usize {
        let end = self.word_end_after(self.cursor);
        self.delete_range(self.cursor, end)
    }

    /// Re-insert the yank register at the cursor.
    ///
    /// Leaves coalescing on, so a kill right after a yank extends the register.
    pub fn yank(&mut self) -> usize {
        let yanked = std::mem::take(&mut self.yanked);
        self.insert_bytes(yanked.as_bytes());
        self.yanked = yanked;
        self.coalescing = true;
        self.yanked.len()
    }

    pub fn backward(&mut self) -> bool {
        self.coalescing = false;
        if self.cursor > 0 {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    pub fn forward(&mut self) -> bool {
        self.coalescing = false;
        if self.cursor < self.content.len() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    pub fn begin(&mut self) {
        self.coalescing = false;
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.coalescing = false;
        self.cursor = self.content.len();
    }

    /// Append a submitted line and stop browsing.
    pub fn add_to_history<S: Into<String>>(&mut self, line: S) {
        self.history.push(line.into());
        self.history_cursor = None;
    }

    /// Show the next older history entry.
    ///
    /// The first call while not browsing shows the newest entry; at the oldest
    /// entry further calls change nothing. Returns the larger of the line
    /// length before and after, the width the renderer has to repaint.
    pub fn prev_in_history(&mut self) -> usize {
        let previous = self.content.len();
        if self.history.is_empty() {
            return previous;
        }
        let index = match self.history_cursor {
            None => self.history.len() - 1,
            Some(0) => return previous,
            Some(index) => index - 1,
        };
        self.load_history_entry(index);
        previous.max(self.content.len())
    }

    /// Show the next newer history entry.
    ///
    /// Only acts while browsing. Stepping past the newest entry stops browsing
    /// and leaves the line as it is. Returns the repaint width like
    /// [`prev_in_history`](Self::prev_in_history).
    pub fn next_in_history(&mut self) -> usize {
        let previous = self.content.len();
        match self.history_cursor {
            Some(index) if index + 1 < self.history.len() => {
                self.load_history_entry(index + 1);
                previous.max(self.content.len())
            }
            Some(_) => {
                trace!("left history browsing");
                self.history_cursor = None;
                previous
            }
            None => previous,
        }
    }

    /// Check the structural invariants of the buffer.
    pub fn validate_state(&self) -> BufferResult<()> {
        if self.cursor > self.content.len() {
            return Err(BufferError::invalid_cursor_position(
                self.cursor,
                self.content.len(),
            ));
        }
        if self.content.len() > self.content.capacity() {
            return Err(BufferError::LengthExceedsCapacity {
                length: self.content.len(),
                capacity: self.content.capacity(),
            });
        }
        if let Some(index) = self.history_cursor {
            if index >= self.history.len() {
                return Err(BufferError::invalid_history_cursor(
                    index,
                    self.history.len(),
                ));
            }
        }
        Ok(())
    }

    fn load_history_entry(&mut self, index: usize) {
        trace!("history entry {} of {}", index + 1, self.history.len());
        self.history_cursor = Some(index);
        self.content.clear();
        self.cursor = 0;
        let entry = std::mem::take(&mut self.history[index]);
        self.insert_bytes(entry.as_bytes());
        self.history[index] = entry;
    }

    fn store_killed(&mut self, begin: usize, end: usize) {
        let killed = String::from_utf8_lossy(&self.content[begin..end]);
        if self.coalescing {
            self.yanked.push_str(&killed);
        } else {
            self.yanked = killed.into_owned();
        }
    }

    /// Skip spaces left of `pos`, then the run of non-spaces before them.
    fn word_start_before(&self, pos: usize) -> usize {
        let mut i = pos;
        while i > 0 && self.content[i - 1] == SPACE {
            i -= 1;
        }
        while i > 0 && self.content[i - 1] != SPACE {
            i -= 1;
        }
        i
    }

    /// Skip spaces right of `pos`, then the run of non-spaces after them.
    fn word_end_after(&self, pos: usize) -> usize {
        let len = self.content.len();
        let mut i = pos;
        while i < len && self.content[i] == SPACE {
            i += 1;
        }
        while i < len && self.content[i] != SPACE {
            i += 1;
        }
        i
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
