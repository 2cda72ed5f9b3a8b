//! Interactive command session.
//!
//! A [`Session`] reads one edited line with the
//! [`LineEditor`], tokenizes it and runs the matching [`Command`]. Command
//! output goes back through the same [`Wire`], one `CR LF` terminated line
//! at a time.
//!
//! A malformed line only costs that line: the error is logged, the peer's
//! cursor is moved to a fresh row and the session keeps going. The session
//! ends when the peer closes the connection or sends `exit`; any other
//! failure is returned to the caller.

mod command;
mod tokenize;

pub use command::{Command, ParseError};
pub use tokenize::tokenize;

use crate::editor::LineEditor;
use crate::error::{Error, Result};
use crate::wire::Wire;

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// What the loop does after a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// One command session over a [`Wire`].
#[derive(Debug)]
pub struct Session<W> {
    wire: W,
    editor: LineEditor,

    /// Session-local working directory used by `ls`, `pwd` and `cd`.
    cwd: PathBuf,
}

impl<W: Wire> Session<W> {
    /// Starts a session in the process working directory.
    pub fn new(wire: W) -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

        Self {
            wire,
            editor: LineEditor::new(),
            cwd,
        }
    }

    /// Overrides the starting working directory.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = dir.into();
        self
    }

    pub fn working_dir(&self) -> &Path {
        &self.cwd
    }

    /// Gives the wire back.
    pub fn into_inner(self) -> W {
        self.wire
    }

    /// Runs until the peer closes the connection or sends `exit`.
    ///
    /// # Errors
    ///
    /// Any transport failure other than the peer closing.
    pub fn run(&mut self) -> Result<()> {
        loop {
            let line = match self.editor.read_line(&mut self.wire) {
                Ok(line) => line,
                Err(Error::PeerClosed) => {
                    info!("peer closed the session");
                    return Ok(());
                }
                Err(err @ Error::InvalidInput { .. }) => {
                    warn!(%err, "discarding line");
                    self.wire.write_all(b"\r\n")?;
                    continue;
                }
                Err(err) => return Err(err),
            };

            if self.execute(&line)? == Flow::Exit {
                info!("session ended by exit");
                return Ok(());
            }
        }
    }

    fn execute(&mut self, line: &[u8]) -> Result<Flow> {
        let line = String::from_utf8_lossy(line);
        let words = tokenize(&line);

        let parsed = match Command::parse(&words) {
            None => return Ok(Flow::Continue),
            Some(Ok(parsed)) => parsed,
            Some(Err(err)) => {
                self.write_line(&err.to_string())?;
                return Ok(Flow::Continue);
            }
        };

        debug!(command = ?parsed, "executing");

        match parsed {
            Command::List(path) => {
                let dir = match &path {
                    Some(path) => self.cwd.join(path),
                    None => self.cwd.clone(),
                };

                match command::list_dir(&dir) {
                    Ok(names) => {
                        for name in names {
                            self.write_line(&name)?;
                        }
                    }
                    Err(err) => self.write_line(&format!("ls: {}: {err}", dir.display()))?,
                }
            }
            Command::Pwd => {
                let cwd = self.cwd.display().to_string();
                self.write_line(&cwd)?;
            }
            Command::Cd(target) => match command::change_dir(&self.cwd, &target) {
                Ok(dir) => self.cwd = dir,
                Err(err) => self.write_line(&format!("cd: {target}: {err}"))?,
            },
            Command::Echo(words) => self.write_line(&words.join(" "))?,
            Command::Help => {
                for line in command::HELP {
                    self.write_line(line)?;
                }
            }
            Command::Exit => return Ok(Flow::Exit),
        }

        Ok(Flow::Continue)
    }

    fn write_line(&mut self, text: &str) -> Result<()> {
        self.wire.write_all(text.as_bytes())?;
        self.wire.write_all(b"\r\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::testing::Script;

    fn output_text(script: &Script) -> String {
        String::from_utf8_lossy(&script.output).into_owned()
    }

    #[test]
    fn echo_then_peer_close() {
        let mut session = Session::new(Script::bytes(b"echo hello   world\r"));
        session.run().expect("run");

        let out = output_text(&session.into_inner());
        assert!(out.ends_with("\r\nhello world\r\n"));
    }

    #[test]
    fn exit_stops_before_remaining_input() {
        let mut session = Session::new(Script::bytes(b"exit\recho nope\r"));
        session.run().expect("run");

        let script = session.into_inner();
        assert!(!output_text(&script).contains("nope\r\n"));
        assert!(!script.input.is_empty());
    }

    #[test]
    fn invalid_input_discards_only_that_line() {
        let mut session = Session::new(Script::bytes(b"ec\x01echo ok\r"));
        session.run().expect("run");

        let out = output_text(&session.into_inner());
        assert!(out.contains("\r\nok\r\n"));
    }

    #[test]
    fn unknown_command_is_reported() {
        let mut session = Session::new(Script::bytes(b"frobnicate\r"));
        session.run().expect("run");

        let out = output_text(&session.into_inner());
        assert!(out.contains("unknown command: frobnicate\r\n"));
    }

    #[test]
    fn cd_and_pwd_track_the_session_directory() {
        let base = std::env::temp_dir().canonicalize().expect("temp dir");
        let mut session = Session::new(Script::bytes(b"cd .\rpwd\r")).with_working_dir(&base);
        session.run().expect("run");

        assert_eq!(session.working_dir(), base);
        let out = output_text(&session.into_inner());
        assert!(out.contains(&format!("{}\r\n", base.display())));
    }

    #[test]
    fn help_lists_every_command() {
        let mut session = Session::new(Script::bytes(b"help\r"));
        session.run().expect("run");

        let out = output_text(&session.into_inner());
        for name in ["ls", "pwd", "cd", "echo", "help", "exit"] {
            assert!(out.contains(&format!("\r\n{name} ")), "missing {name}");
        }
    }
}
