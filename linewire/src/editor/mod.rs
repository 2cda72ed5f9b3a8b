//! Single-line editor driven by a byte stream.
//!
//! The editor reads one byte at a time from a [`Wire`], applies it to its
//! edit state and then redraws the whole line on the peer using only
//! `CR`, spaces and backspaces. A completed line is returned on `CR` or
//! `LF`.
//!
//! | Input          | Effect                                          |
//! |----------------|-------------------------------------------------|
//! | `0x03`         | exits the process                               |
//! | `ESC`          | `ESC [ C` / `ESC [ D` move, a lone `ESC` clears |
//! | `DEL`          | erases left of the cursor                       |
//! | `CR` / `LF`    | completes the line                              |
//! | `0x20..=0x7e`  | inserts at the cursor                           |
//! | anything else  | [`Error::InvalidInput`]                         |

mod key;
mod redraw;

pub use key::Key;

use crate::error::{Error, Result};
use crate::wire::Wire;
use key::{Arrow, INTERRUPT};

use std::time::Duration;
use tracing::{debug, warn};

/// How long a lone `ESC` waits for the rest of a sequence.
pub const ESCAPE_TIMEOUT: Duration = Duration::from_millis(100);

/// Exit status used when the interrupt byte arrives.
const INTERRUPT_EXIT_CODE: i32 = 130;

/// Edit state for one line of input.
///
/// The live line is `buffer` itself, so its length is the current width.
/// `max_width` is the widest the line has been since the last reset and
/// tells the redraw how many columns to blank.
///
/// Invariant: `cursor <= width() <= max_width`.
#[derive(Debug, Default)]
pub struct LineEditor {
    buffer: Vec<u8>,
    cursor: usize,
    max_width: usize,

    /// Columns a clear left on screen that the next redraw must blank.
    stale_columns: usize,

    /// Reusable redraw output.
    scratch: Vec<u8>,
}

impl LineEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads bytes from `wire` until a line is completed.
    ///
    /// The returned line carries no trailing `CR` / `LF`; `CR LF` is echoed
    /// to the peer instead. The editor is reset afterwards, keeping its
    /// allocation for the next line.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] for a rejected byte or escape sequence (the
    /// current line is abandoned), otherwise whatever `wire` reports.
    pub fn read_line<W: Wire>(&mut self, wire: &mut W) -> Result<Vec<u8>> {
        loop {
            let byte = wire.recv_one(None)?;
            if let Some(line) = self.feed(byte, wire)? {
                return Ok(line);
            }
        }
    }

    /// Applies one input byte.
    ///
    /// Escape sequences pull their remaining bytes from `wire`. Returns the
    /// completed line on `CR` / `LF`; otherwise the new state has been
    /// redrawn on the peer.
    ///
    /// # Errors
    ///
    /// See [`read_line`](Self::read_line).
    pub fn feed<W: Wire>(&mut self, byte: u8, wire: &mut W) -> Result<Option<Vec<u8>>> {
        match Key::classify(byte) {
            Key::Interrupt => interrupt(),
            Key::Escape => {
                if let Err(err) = self.escape(wire) {
                    return Err(self.abandon(err));
                }
            }
            Key::Delete => self.erase_left(),
            Key::Enter => {
                wire.write_all(b"\r\n")?;
                return Ok(Some(self.take_line()));
            }
            Key::Printable(b) => self.insert(b),
            Key::Other(b) => {
                return Err(self.abandon(Error::InvalidInput {
                    byte: b,
                    reason: "unsupported control byte",
                }));
            }
        }

        self.redraw(wire)?;
        Ok(None)
    }

    /// The live line.
    pub fn line(&self) -> &[u8] {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of live bytes.
    pub fn width(&self) -> usize {
        self.buffer.len()
    }

    pub fn max_width(&self) -> usize {
        self.max_width
    }

    /// Allocated capacity of the edit buffer.
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    fn insert(&mut self, byte: u8) {
        self.buffer.insert(self.cursor, byte);
        self.cursor += 1;
        self.max_width = self.max_width.max(self.buffer.len());
    }

    fn erase_left(&mut self) {
        if self.cursor == 0 || self.buffer.is_empty() {
            return;
        }

        self.cursor -= 1;
        self.buffer.remove(self.cursor);
    }

    fn move_cursor(&mut self, arrow: Arrow) {
        self.cursor = match arrow {
            Arrow::Right => (self.cursor + 1).min(self.buffer.len()),
            Arrow::Left => self.cursor.saturating_sub(1),
        };
    }

    /// Empties the line but remembers how much of it is still on screen.
    fn clear(&mut self) {
        self.stale_columns = self.stale_columns.max(self.max_width);
        self.reset();
    }

    fn reset(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
        self.max_width = 0;
    }

    fn take_line(&mut self) -> Vec<u8> {
        let line = self.buffer.clone();
        self.reset();
        self.stale_columns = 0;
        line
    }

    /// Drops the current line after a protocol violation.
    fn abandon(&mut self, err: Error) -> Error {
        if matches!(err, Error::InvalidInput { .. }) {
            debug!(%err, "abandoning line");
            self.reset();
            self.stale_columns = 0;
        }
        err
    }

    fn escape<W: Wire>(&mut self, wire: &mut W) -> Result<()> {
        let second = match wire.recv_one(Some(ESCAPE_TIMEOUT)) {
            Ok(byte) => byte,
            Err(Error::Timeout) => {
                debug!(width = self.buffer.len(), "lone escape, clearing line");
                self.clear();
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        if second == INTERRUPT {
            interrupt();
        }

        if second != b'[' {
            return Err(Error::InvalidInput {
                byte: second,
                reason: "expected `[` after escape",
            });
        }

        let last = wire.recv_one(None)?;
        if last == INTERRUPT {
            interrupt();
        }

        match Arrow::from_final(last) {
            Some(arrow) => {
                self.move_cursor(arrow);
                Ok(())
            }
            None => Err(Error::InvalidInput {
                byte: last,
                reason: "unsupported escape sequence",
            }),
        }
    }

    fn redraw<W: Wire>(&mut self, wire: &mut W) -> Result<()> {
        let erase = self.max_width.max(self.stale_columns);
        redraw::render(&mut self.scratch, &self.buffer, self.cursor, erase);
        self.stale_columns = 0;

        wire.write_all(&self.scratch)
    }
}

fn interrupt() -> ! {
    warn!("interrupt received, exiting");
    std::process::exit(INTERRUPT_EXIT_CODE);
}
