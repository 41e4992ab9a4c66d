//! Stdin source for interactive or piped commands.

use super::{LineSource, SourceLine};
use crate::model::error::InputError;
use std::io::{BufRead, BufReader, Stdin};

/// Line reader over stdin (or any buffered reader, for tests).
///
/// Reads block until a full line arrives; EOF ends the session.
#[derive(Debug)]
pub struct StdinSource<R: BufRead> {
    reader: R,
    line_number: usize,
    complete: bool,
}

impl StdinSource<BufReader<Stdin>> {
    /// Source over the process's stdin.
    pub fn stdin() -> Self {
        Self::from_reader(BufReader::new(std::io::stdin()))
    }
}

impl<R: BufRead> StdinSource<R> {
    /// Source over any buffered reader.
    pub fn from_reader(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            complete: false,
        }
    }

    /// True once EOF has been seen.
    pub fn is_complete(&self) -> bool {
        self.complete
    }
}

impl<R: BufRead> LineSource for StdinSource<R> {
    fn next_line(&mut self) -> Result<Option<SourceLine>, InputError> {
        if self.complete {
            return Ok(None);
        }
        let mut buffer = String::new();
        if self.reader.read_line(&mut buffer)? == 0 {
            self.complete = true;
            return Ok(None);
        }
        self.line_number += 1;
        let text = buffer.trim_end_matches(['\n', '\r']).to_string();
        Ok(Some(SourceLine {
            number: self.line_number,
            text,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_lines_until_eof() {
        let mut source = StdinSource::from_reader(&b"open longe\r\nback"[..]);

        let first = source.next_line().expect("read").expect("line");
        assert_eq!(first.text, "open longe");
        assert_eq!(first.number, 1);
        assert!(!source.is_complete());

        let second = source.next_line().expect("read").expect("line");
        assert_eq!(second.text, "back", "last line without newline still counts");

        assert_eq!(source.next_line().expect("read"), None);
        assert!(source.is_complete());
        assert_eq!(source.next_line().expect("read"), None);
    }
}
