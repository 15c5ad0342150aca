//! Control-byte assignments and byte classification.
//!
//! The dispatcher works on single bytes read from the terminal. This module
//! names the conventional control characters it reacts to and maps each raw
//! byte to a [`Key`].

pub const CTRL_A: u8 = 0x01;
pub const CTRL_B: u8 = 0x02;
pub const CTRL_C: u8 = 0x03;
pub const CTRL_D: u8 = 0x04;
pub const CTRL_E: u8 = 0x05;
pub const CTRL_F: u8 = 0x06;
pub const BEL: u8 = 0x07;
pub const BACKSPACE: u8 = 0x08;
pub const TAB: u8 = 0x09;
pub const NEWLINE: u8 = 0x0A;
pub const CTRL_K: u8 = 0x0B;
pub const CTRL_L: u8 = 0x0C;
pub const RETURN: u8 = 0x0D;
pub const CTRL_N: u8 = 0x0E;
pub const CTRL_P: u8 = 0x10;
pub const CTRL_Y: u8 = 0x19;
pub const ESCAPE: u8 = 0x1B;
pub const SPACE: u8 = 0x20;
pub const DELETE: u8 = 0x7F;

/// Key represents the logical meaning of one byte in the normal dispatch state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Ctrl+A
    BeginningOfLine,
    /// Ctrl+B
    Backward,
    /// Ctrl+C
    Interrupt,
    /// Ctrl+D
    EndOfInput,
    /// Ctrl+E
    EndOfLine,
    /// Ctrl+F
    Forward,
    Tab,
    /// Ctrl+K
    KillToEnd,
    /// Ctrl+L
    Redraw,
    Return,
    /// Ctrl+N
    HistoryNext,
    /// Ctrl+P
    HistoryPrev,
    /// Ctrl+Y
    Yank,
    Escape,
    /// DEL, or Ctrl+H on terminals that send it for the backspace key
    Backspace,
    /// Printable ASCII (0x20..=0x7E)
    Printable(u8),
    /// Any other byte; answered with an audible signal
    Unknown(u8),
}

impl Key {
    /// Classify a raw input byte.
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            CTRL_A => Key::BeginningOfLine,
            CTRL_B => Key::Backward,
            CTRL_C => Key::Interrupt,
            CTRL_D => Key::EndOfInput,
            CTRL_E => Key::EndOfLine,
            CTRL_F => Key::Forward,
            TAB => Key::Tab,
            CTRL_K => Key::KillToEnd,
            CTRL_L => Key::Redraw,
            RETURN => Key::Return,
            CTRL_N => Key::HistoryNext,
            CTRL_P => Key::HistoryPrev,
            CTRL_Y => Key::Yank,
            ESCAPE => Key::Escape,
            DELETE | BACKSPACE => Key::Backspace,
            0x20..=0x7E => Key::Printable(byte),
            _ => Key::Unknown(byte),
        }
    }
}

/// Return the opening bracket for a closing `)`, `]` or `}`.
pub fn matching_open(close: u8) -> Option<u8> {
    match close {
        b')' => Some(b'('),
        b']' => Some(b'['),
        b'}' => Some(b'{'),
        _ => None,
    }
}
