//! Line-oriented input for spec ingestion.

use crate::errors::SpecResult;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Supplies spec text one line at a time.
///
/// `Ok(None)` signals end of input; a returned line never carries its terminator.
pub trait LineSource {
    fn next_line(&mut self) -> SpecResult<Option<String>>;
}

/// Lines from any buffered reader
///
/// Input is read as bytes; invalid UTF-8 is replaced with U+FFFD rather than failing the read.
pub struct ReaderSource<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }
}

impl ReaderSource<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> SpecResult<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> LineSource for ReaderSource<R> {
    fn next_line(&mut self) -> SpecResult<Option<String>> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }

        let line = self.buf.strip_suffix(b"\n").unwrap_or(&self.buf);
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        Ok(Some(String::from_utf8_lossy(line).into_owned()))
    }
}

/// Lines of in-memory spec text
pub struct TextSource<'a> {
    lines: std::str::Split<'a, char>,
    done: bool,
}

impl<'a> TextSource<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.split('\n'),
            done: text.is_empty(),
        }
    }
}

impl LineSource for TextSource<'_> {
    fn next_line(&mut self) -> SpecResult<Option<String>> {
        if self.done {
            return Ok(None);
        }

        match self.lines.next() {
            // text ending in '\n' leaves one empty trailing piece that is not a line
            Some(line) if line.is_empty() && self.lines.clone().next().is_none() => {
                self.done = true;
                Ok(None)
            }
            Some(line) => Ok(Some(strip_terminator(line).to_string())),
            None => {
                self.done = true;
                Ok(None)
            }
        }
    }
}

fn strip_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}
