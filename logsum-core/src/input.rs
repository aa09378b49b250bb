//! Line sources for log processing
//!
//! Provides a unified interface for reading log lines from files, readers
//! and in-memory text.

use crate::error::ProcessingResult;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Cursor};
use std::path::PathBuf;

/// Lazy stream of log lines
pub type LineStream = Box<dyn Iterator<Item = io::Result<String>> + Send>;

/// Unified line source
pub enum Input {
    /// File path to read from
    File(PathBuf),
    /// Buffered reader (stdin, network, etc.)
    Reader(Box<dyn BufRead + Send>),
    /// Whole log as one string
    Text(String),
    /// Already-materialized lines
    Lines(Vec<String>),
}

impl std::fmt::Debug for Input {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Input::File(path) => f.debug_tuple("File").field(path).finish(),
            Input::Reader(_) => f.debug_tuple("Reader").field(&"<Reader>").finish(),
            Input::Text(text) => f
                .debug_tuple("Text")
                .field(&format!("<{} bytes>", text.len()))
                .finish(),
            Input::Lines(lines) => f
                .debug_tuple("Lines")
                .field(&format!("<{} lines>", lines.len()))
                .finish(),
        }
    }
}

impl Input {
    /// Create input from a file path
    pub fn from_file<P: Into<PathBuf>>(path: P) -> Self {
        Input::File(path.into())
    }

    /// Create input from a reader
    pub fn from_reader<R: io::Read + Send + 'static>(reader: R) -> Self {
        Input::Reader(Box::new(BufReader::new(reader)))
    }

    /// Create input from a text string
    pub fn from_text<S: Into<String>>(text: S) -> Self {
        Input::Text(text.into())
    }

    /// Create input from materialized lines
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Input::Lines(lines.into_iter().map(Into::into).collect())
    }

    /// Open the source as a lazy stream of lines
    ///
    /// A file that cannot be opened fails here; read failures surface as
    /// `Err` items of the stream.
    pub fn lines(self) -> ProcessingResult<LineStream> {
        let stream: LineStream = match self {
            Input::File(path) => {
                let file = File::open(&path)?;
                Box::new(LineReader::new(BufReader::new(file)))
            }
            Input::Reader(reader) => Box::new(LineReader::new(reader)),
            Input::Text(text) => Box::new(LineReader::new(Cursor::new(text.into_bytes()))),
            Input::Lines(lines) => Box::new(lines.into_iter().map(Ok)),
        };
        Ok(stream)
    }

    /// Read every line into memory
    pub fn into_lines(self) -> ProcessingResult<Vec<String>> {
        match self {
            Input::Lines(lines) => Ok(lines),
            other => Ok(other.lines()?.collect::<io::Result<Vec<_>>>()?),
        }
    }

    /// Estimated size of the input in bytes, if cheaply known
    pub fn estimated_size(&self) -> Option<u64> {
        match self {
            Input::File(path) => fs::metadata(path).ok().map(|m| m.len()),
            Input::Reader(_) => None,
            Input::Text(text) => Some(text.len() as u64),
            Input::Lines(lines) => Some(lines.iter().map(|l| l.len() as u64 + 1).sum()),
        }
    }
}

impl From<PathBuf> for Input {
    fn from(path: PathBuf) -> Self {
        Input::File(path)
    }
}

impl From<Vec<String>> for Input {
    fn from(lines: Vec<String>) -> Self {
        Input::Lines(lines)
    }
}

/// Splits a reader into lines on `\n`
///
/// Unlike `BufRead::lines`, invalid UTF-8 is decoded lossily instead of
/// failing the whole run.
pub struct LineReader<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> LineReader<R> {
    /// Wrap a buffered reader
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::with_capacity(256),
        }
    }
}

impl<R: BufRead> Iterator for LineReader<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                    if self.buf.last() == Some(&b'\r') {
                        self.buf.pop();
                    }
                }
                Some(Ok(String::from_utf8_lossy(&self.buf).into_owned()))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_text_lines() {
        let lines = Input::from_text("a\nb\r\nc").into_lines().unwrap();
        assert_eq!(lines, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_trailing_newline_adds_no_line() {
        let lines = Input::from_text("a\nb\n").into_lines().unwrap();
        assert_eq!(lines, vec!["a", "b"]);

        let lines = Input::from_text("").into_lines().unwrap();
        assert!(lines.is_empty());
    }

    #[test]
    fn test_blank_lines_are_kept() {
        let lines = Input::from_text("a\n\n\nb").into_lines().unwrap();
        assert_eq!(lines, vec!["a", "", "", "b"]);
    }

    #[test]
    fn test_invalid_utf8_is_lossy() {
        let bytes: Vec<u8> = vec![b'o', b'k', 0xff, b'\n', b'x'];
        let lines = Input::from_reader(Cursor::new(bytes)).into_lines().unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("ok"));
        assert_eq!(lines[1], "x");
    }

    #[test]
    fn test_file_lines_and_size() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "first\nsecond\n").unwrap();

        let input = Input::from_file(file.path());
        assert_eq!(input.estimated_size(), Some(13));
        assert_eq!(input.into_lines().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = Input::from_file("/nonexistent/access.log").lines();
        match result {
            Err(err) => assert!(err.is_io()),
            Ok(_) => panic!("Expected I/O error"),
        }
    }

    #[test]
    fn test_materialized_lines_pass_through() {
        let input = Input::from_lines(["x", "y"]);
        assert_eq!(input.estimated_size(), Some(4));
        assert_eq!(input.into_lines().unwrap(), vec!["x", "y"]);
    }

    #[test]
    fn test_debug_format() {
        let debug = format!("{:?}", Input::from_lines(vec!["a".to_string()]));
        assert_eq!(debug, "Lines(\"<1 lines>\")");
    }
}
