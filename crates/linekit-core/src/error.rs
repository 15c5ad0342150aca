//! Error types for edit buffer state checks.

use thiserror::Error;

/// Errors reported when a [`LineBuffer`](crate::buffer::LineBuffer) is found
/// in an inconsistent state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    /// Cursor points past the end of the valid text.
    #[error("Invalid cursor position {position} (length: {length})")]
    InvalidCursorPosition { position: usize, length: usize },
    /// More valid bytes than allocated storage.
    #[error("Length {length} exceeds capacity {capacity}")]
    LengthExceedsCapacity { length: usize, capacity: usize },
    /// History browse cursor does not point at an entry.
    #[error("Invalid history cursor {index} (entries: {entries})")]
    InvalidHistoryCursor { index: usize, entries: usize },
}

impl BufferError {
    /// Create an invalid cursor position error.
    pub fn invalid_cursor_position(position: usize, length: usize) -> Self {
        BufferError::InvalidCursorPosition { position, length }
    }

    /// Create an invalid history cursor error.
    pub fn invalid_history_cursor(index: usize, entries: usize) -> Self {
        BufferError::InvalidHistoryCursor { index, entries }
    }
}

/// Result type for buffer operations.
pub type BufferResult<T> = Result<T, BufferError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BufferError::invalid_cursor_position(7, 3);
        assert_eq!(err.to_string(), "Invalid cursor position 7 (length: 3)");

        let err = BufferError::invalid_history_cursor(4, 2);
        assert_eq!(err.to_string(), "Invalid history cursor 4 (entries: 2)");

        let err = BufferError::LengthExceedsCapacity {
            length: 9,
            capacity: 8,
        };
        assert!(err.to_string().contains("exceeds capacity"));
    }
}
