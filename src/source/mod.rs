//! Command input sources.
//!
//! The shell reads one command per line, either from a script file or from
//! stdin. Both sources hand out raw lines with their 1-based line number;
//! parsing is left to [`crate::command`].

use crate::model::error::InputError;
use std::io::{BufReader, Stdin};
use std::path::PathBuf;

pub mod file;
pub mod stdin;

pub use file::FileSource;
pub use stdin::StdinSource;

/// A line read from a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// 1-based position in the source.
    pub number: usize,
    /// Line text without its terminator.
    pub text: String,
}

/// Anything that hands out command lines.
pub trait LineSource {
    /// Next line, or `None` once the source is exhausted.
    ///
    /// # Errors
    ///
    /// Returns `InputError::Io` if the underlying read fails.
    fn next_line(&mut self) -> Result<Option<SourceLine>, InputError>;
}

/// Unified command source. Sum type enforces exactly one variant.
#[derive(Debug)]
pub enum CommandSource {
    /// Script file, loaded on construction.
    File(FileSource),
    /// Standard input, read as lines arrive.
    Stdin(StdinSource<BufReader<Stdin>>),
}

impl LineSource for CommandSource {
    fn next_line(&mut self) -> Result<Option<SourceLine>, InputError> {
        match self {
            CommandSource::File(f) => f.next_line(),
            CommandSource::Stdin(s) => s.next_line(),
        }
    }
}

impl CommandSource {
    /// Human-readable origin for diagnostics.
    pub fn describe(&self) -> String {
        match self {
            CommandSource::File(f) => f.path().display().to_string(),
            CommandSource::Stdin(_) => "<stdin>".to_string(),
        }
    }
}

/// Pick the command source.
///
/// A script path yields a [`FileSource`]; without one, commands are read
/// from stdin.
///
/// # Errors
///
/// Returns `InputError::FileNotFound` if the script does not exist and
/// `InputError::Io` if it cannot be read.
pub fn detect_command_source(script: Option<PathBuf>) -> Result<CommandSource, InputError> {
    match script {
        Some(path) => Ok(CommandSource::File(FileSource::new(path)?)),
        None => Ok(CommandSource::Stdin(StdinSource::stdin())),
    }
}
