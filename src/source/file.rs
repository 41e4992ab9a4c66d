//! Script file source.

use super::{LineSource, SourceLine};
use crate::model::error::InputError;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// Read-once script: the whole file is loaded on construction.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    lines: VecDeque<SourceLine>,
}

impl FileSource {
    /// Load `path`.
    ///
    /// # Errors
    ///
    /// Returns `InputError::FileNotFound` if the file does not exist.
    /// Returns `InputError::Io` for other I/O errors.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(InputError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let contents = std::fs::read_to_string(path)?;
        Ok(Self::from_contents(path, &contents))
    }

    fn from_contents(path: &Path, contents: &str) -> Self {
        let lines = contents
            .lines()
            .enumerate()
            .map(|(i, text)| SourceLine {
                number: i + 1,
                text: text.trim_end_matches('\r').to_string(),
            })
            .collect();
        Self {
            path: path.to_path_buf(),
            lines,
        }
    }

    /// Script path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lines not handed out yet.
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl LineSource for FileSource {
    fn next_line(&mut self) -> Result<Option<SourceLine>, InputError> {
        Ok(self.lines.pop_front())
    }
}
