/// Ctrl-C.
pub const INTERRUPT: u8 = 0x03;
pub const BACKSPACE: u8 = 0x08;
pub const ESC: u8 = 0x1b;
pub const DEL: u8 = 0x7f;
pub const CR: u8 = b'\r';
pub const LF: u8 = b'\n';

/// Classification of one input byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// Terminates the process.
    Interrupt,
    /// Starts an escape sequence, or clears the line if nothing follows.
    Escape,
    /// Erases the byte left of the cursor.
    Delete,
    /// Completes the line (CR or LF).
    Enter,
    /// A printable ASCII byte to insert.
    Printable(u8),
    /// Anything else; rejected as invalid input.
    Other(u8),
}

impl Key {
    pub fn classify(byte: u8) -> Self {
        match byte {
            INTERRUPT => Key::Interrupt,
            ESC => Key::Escape,
            DEL => Key::Delete,
            CR | LF => Key::Enter,
            0x20..=0x7e => Key::Printable(byte),
            _ => Key::Other(byte),
        }
    }
}

/// Final byte of a `ESC [` cursor sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Arrow {
    Right,
    Left,
}

impl Arrow {
    pub(crate) fn from_final(byte: u8) -> Option<Self> {
        match byte {
            b'C' => Some(Arrow::Right),
            b'D' => Some(Arrow::Left),
            _ => None,
        }
    }
}
