use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A parsed session command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// `ls [path]`
    List(Option<String>),
    /// `pwd`
    Pwd,
    /// `cd <path>`
    Cd(String),
    /// `echo [words..]`
    Echo(Vec<String>),
    /// `help`
    Help,
    /// `exit`
    Exit,
}

/// Why a line could not be turned into a [`Command`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    Unknown(String),
    Usage(&'static str),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Unknown(name) => write!(f, "unknown command: {name}"),
            ParseError::Usage(usage) => write!(f, "usage: {usage}"),
        }
    }
}

pub(crate) const HELP: &[&str] = &[
    "ls [path]   list a directory",
    "pwd         print the working directory",
    "cd <path>   change the working directory",
    "echo [..]   print the arguments",
    "help        show this help",
    "exit        end the session",
];

impl Command {
    /// Parses tokenized words. `None` for an empty line.
    pub fn parse(words: &[String]) -> Option<Result<Self, ParseError>> {
        let (name, args) = words.split_first()?;

        let command = match (name.as_str(), args) {
            ("ls", []) => Ok(Command::List(None)),
            ("ls", [path]) => Ok(Command::List(Some(path.clone()))),
            ("ls", _) => Err(ParseError::Usage("ls [path]")),
            ("pwd", []) => Ok(Command::Pwd),
            ("pwd", _) => Err(ParseError::Usage("pwd")),
            ("cd", [path]) => Ok(Command::Cd(path.clone())),
            ("cd", _) => Err(ParseError::Usage("cd <path>")),
            ("echo", args) => Ok(Command::Echo(args.to_vec())),
            ("help", _) => Ok(Command::Help),
            ("exit", _) => Ok(Command::Exit),
            (other, _) => Err(ParseError::Unknown(other.to_string())),
        };

        Some(command)
    }
}

/// Lists `dir`: names sorted, directories suffixed with `/`.
pub(crate) fn list_dir(dir: &Path) -> io::Result<Vec<String>> {
    let mut names = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let mut name = entry.file_name().to_string_lossy().into_owned();

        if entry.file_type()?.is_dir() {
            name.push('/');
        }

        names.push(name);
    }

    names.sort();
    Ok(names)
}

/// Resolves `target` against `cwd` and checks that it is a directory.
pub(crate) fn change_dir(cwd: &Path, target: &str) -> io::Result<PathBuf> {
    let path = cwd.join(target).canonicalize()?;

    if !path.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotADirectory,
            "not a directory",
        ));
    }

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::tokenize;

    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    fn parse(line: &str) -> Option<Result<Command, ParseError>> {
        Command::parse(&tokenize(line))
    }

    fn unique_temp_base() -> PathBuf {
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let seq = COUNTER.fetch_add(1, Ordering::Relaxed);

        std::env::temp_dir().join(format!(
            "linewire_command_test_{}_{}_{}",
            std::process::id(),
            nanos,
            seq
        ))
    }

    #[test]
    fn parses_known_commands() {
        assert_eq!(parse("ls"), Some(Ok(Command::List(None))));
        assert_eq!(parse("ls /tmp"), Some(Ok(Command::List(Some("/tmp".into())))));
        assert_eq!(parse("pwd"), Some(Ok(Command::Pwd)));
        assert_eq!(parse("cd .."), Some(Ok(Command::Cd("..".into()))));
        assert_eq!(
            parse(r#"echo "a b" c"#),
            Some(Ok(Command::Echo(vec!["a b".into(), "c".into()])))
        );
        assert_eq!(parse("exit"), Some(Ok(Command::Exit)));
        assert_eq!(parse("   "), None);
    }

    #[test]
    fn rejects_unknown_and_misused_commands() {
        assert_eq!(
            parse("rm -rf /"),
            Some(Err(ParseError::Unknown("rm".into())))
        );
        assert_eq!(parse("ls a b"), Some(Err(ParseError::Usage("ls [path]"))));
        assert_eq!(parse("cd"), Some(Err(ParseError::Usage("cd <path>"))));
        assert_eq!(
            ParseError::Unknown("rm".into()).to_string(),
            "unknown command: rm"
        );
    }

    #[test]
    fn listing_is_sorted_and_marks_directories() {
        let base = unique_temp_base();
        fs::create_dir_all(base.join("sub")).expect("create dir");
        fs::write(base.join("b.txt"), b"b").expect("write file");
        fs::write(base.join("a.txt"), b"a").expect("write file");

        let names = list_dir(&base).expect("list");
        assert_eq!(names, ["a.txt", "b.txt", "sub/"]);

        fs::remove_dir_all(&base).expect("cleanup");
    }

    #[test]
    fn change_dir_requires_a_directory() {
        let base = unique_temp_base();
        fs::create_dir_all(base.join("sub")).expect("create dir");
        fs::write(base.join("file"), b"x").expect("write file");

        let sub = change_dir(&base, "sub").expect("cd sub");
        assert!(sub.ends_with("sub"));

        assert!(change_dir(&base, "file").is_err());
        assert!(change_dir(&base, "missing").is_err());

        fs::remove_dir_all(&base).expect("cleanup");
    }
}
