//! Line-oriented I/O surfaces handed to command bodies.
//!
//! A [`LineSource`] yields lines lazily and is read once; a [`LineSink`]
//! accepts whole lines or partial text and can be cleared. The executor wires
//! in-memory buffers between stages and file-backed streams for redirections;
//! hosts plug their own surfaces (a display widget, process stdio) through the
//! same traits.

use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use crate::error::StreamError;
use crate::exec::cancel::CancellationToken;
use crate::parse::OutputMode;

/// A finite, non-restartable sequence of text lines.
pub trait LineSource {
    /// Next line without its terminator, or `None` at end of input.
    fn read_line(&mut self) -> Result<Option<String>, StreamError>;

    /// Drain every remaining line.
    fn read_all(&mut self) -> Result<Vec<String>, StreamError> {
        let mut lines = Vec::new();
        while let Some(line) = self.read_line()? {
            lines.push(line);
        }
        Ok(lines)
    }
}

/// A writable text surface.
pub trait LineSink {
    /// Write text without adding a terminator.
    fn write(&mut self, text: &str) -> Result<(), StreamError>;

    fn write_line(&mut self, line: &str) -> Result<(), StreamError> {
        self.write(line)?;
        self.write("\n")
    }

    /// Discard everything written so far, where the surface supports it.
    fn clear(&mut self) -> Result<(), StreamError> {
        Ok(())
    }

    fn flush(&mut self) -> Result<(), StreamError> {
        Ok(())
    }
}

// ── In-memory ──

/// Lines held in memory; the input of every stage after the first.
#[derive(Debug, Clone, Default)]
pub struct MemoryInput {
    lines: VecDeque<String>,
}

impl MemoryInput {
    pub fn new(lines: impl IntoIterator<Item = String>) -> Self {
        Self {
            lines: lines.into_iter().collect(),
        }
    }

    /// Split `text` on newlines; a trailing newline does not add an empty line.
    pub fn from_text(text: &str) -> Self {
        Self::new(text.lines().map(String::from))
    }

    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl LineSource for MemoryInput {
    fn read_line(&mut self) -> Result<Option<String>, StreamError> {
        Ok(self.lines.pop_front())
    }
}

/// Accumulates output lines; partial writes are joined until a newline.
#[derive(Debug, Clone, Default)]
pub struct BufferedOutput {
    lines: Vec<String>,
    partial: String,
}

impl BufferedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed lines; an unterminated trailing fragment is not included.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// All lines, with any unterminated fragment as the final line.
    pub fn into_lines(mut self) -> Vec<String> {
        if !self.partial.is_empty() {
            self.lines.push(std::mem::take(&mut self.partial));
        }
        self.lines
    }

    /// Everything written, newline-terminated per completed line.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for line in &self.lines {
            text.push_str(line);
            text.push('\n');
        }
        text.push_str(&self.partial);
        text
    }

    pub fn into_input(self) -> MemoryInput {
        MemoryInput::new(self.into_lines())
    }
}

impl LineSink for BufferedOutput {
    fn write(&mut self, text: &str) -> Result<(), StreamError> {
        let mut rest = text;
        while let Some(idx) = rest.find('\n') {
            self.partial.push_str(&rest[..idx]);
            self.lines.push(std::mem::take(&mut self.partial));
            rest = &rest[idx + 1..];
        }
        self.partial.push_str(rest);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StreamError> {
        self.lines.clear();
        self.partial.clear();
        Ok(())
    }
}

// ── Std adapters ──

/// Lines from any buffered reader; `\n` and `\r\n` terminators are stripped.
pub struct ReaderSource<R> {
    reader: R,
}

impl<R: BufRead> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineSource for ReaderSource<R> {
    fn read_line(&mut self) -> Result<Option<String>, StreamError> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }
}

/// Input redirected from a file (`< path`).
pub type FileInput = ReaderSource<BufReader<File>>;

impl ReaderSource<BufReader<File>> {
    pub fn open(path: &Path) -> std::io::Result<Self> {
        Ok(Self::new(BufReader::new(File::open(path)?)))
    }
}

/// Text written to any `Write` implementation, e.g. process stdout.
///
/// `clear` is a no-op: a byte stream cannot take back what it emitted.
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> LineSink for WriterSink<W> {
    fn write(&mut self, text: &str) -> Result<(), StreamError> {
        self.writer.write_all(text.as_bytes())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), StreamError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Output redirected to a file (`> path` truncates, `>> path` appends).
///
/// The handle is closed when the value is dropped; call [`FileOutput::finish`]
/// first to observe flush errors.
pub struct FileOutput {
    writer: BufWriter<File>,
}

impl FileOutput {
    pub fn open(path: &Path, mode: OutputMode) -> std::io::Result<Self> {
        let mut options = OpenOptions::new();
        options.create(true);
        if mode == OutputMode::Append {
            options.append(true);
        } else {
            options.write(true).truncate(true);
        }
        Ok(Self {
            writer: BufWriter::new(options.open(path)?),
        })
    }

    pub fn finish(mut self) -> Result<(), StreamError> {
        self.writer.flush()?;
        Ok(())
    }
}

impl LineSink for FileOutput {
    fn write(&mut self, text: &str) -> Result<(), StreamError> {
        self.writer.write_all(text.as_bytes())?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StreamError> {
        self.writer.flush()?;
        let file = self.writer.get_mut();
        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), StreamError> {
        self.writer.flush()?;
        Ok(())
    }
}

// ── Cancellation guards ──

/// Checks the token before every read.
pub(crate) struct GuardedSource<'a> {
    inner: &'a mut dyn LineSource,
    cancel: &'a CancellationToken,
}

impl<'a> GuardedSource<'a> {
    pub(crate) fn new(inner: &'a mut dyn LineSource, cancel: &'a CancellationToken) -> Self {
        Self { inner, cancel }
    }
}

impl LineSource for GuardedSource<'_> {
    fn read_line(&mut self) -> Result<Option<String>, StreamError> {
        self.cancel.check()?;
        self.inner.read_line()
    }
}

/// Checks the token before every write.
pub(crate) struct GuardedSink<'a> {
    inner: &'a mut dyn LineSink,
    cancel: &'a CancellationToken,
}

impl<'a> GuardedSink<'a> {
    pub(crate) fn new(inner: &'a mut dyn LineSink, cancel: &'a CancellationToken) -> Self {
        Self { inner, cancel }
    }
}

impl LineSink for GuardedSink<'_> {
    fn write(&mut self, text: &str) -> Result<(), StreamError> {
        self.cancel.check()?;
        self.inner.write(text)
    }

    fn write_line(&mut self, line: &str) -> Result<(), StreamError> {
        self.cancel.check()?;
        self.inner.write_line(line)
    }

    fn clear(&mut self) -> Result<(), StreamError> {
        self.cancel.check()?;
        self.inner.clear()
    }

    fn flush(&mut self) -> Result<(), StreamError> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffered_output_joins_partial_writes() {
        let mut out = BufferedOutput::new();
        out.write("hel").unwrap();
        out.write("lo\nwor").unwrap();
        out.write_line("ld").unwrap();
        out.write("tail").unwrap();
        assert_eq!(out.lines(), ["hello", "world"]);
        assert_eq!(out.text(), "hello\nworld\ntail");
        assert_eq!(out.into_lines(), vec!["hello", "world", "tail"]);
    }

    #[test]
    fn buffered_output_clear() {
        let mut out = BufferedOutput::new();
        out.write_line("gone").unwrap();
        out.write("also").unwrap();
        out.clear().unwrap();
        assert!(out.into_lines().is_empty());
    }

    #[test]
    fn memory_input_drains_in_order() {
        let mut input = MemoryInput::from_text("a\nb\n");
        assert_eq!(input.remaining(), 2);
        assert_eq!(input.read_all().unwrap(), vec!["a", "b"]);
        assert_eq!(input.read_line().unwrap(), None);
    }

    #[test]
    fn reader_source_strips_terminators() {
        let mut src = ReaderSource::new("one\r\ntwo\nthree".as_bytes());
        assert_eq!(src.read_all().unwrap(), vec!["one", "two", "three"]);
    }

    #[test]
    fn writer_sink_writes_bytes() {
        let mut sink = WriterSink::new(Vec::new());
        sink.write_line("x").unwrap();
        sink.write("y").unwrap();
        assert_eq!(sink.into_inner(), b"x\ny");
    }

    #[test]
    fn file_output_clear_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let mut out = FileOutput::open(&path, OutputMode::Overwrite).unwrap();
        out.write_line("first").unwrap();
        out.clear().unwrap();
        out.write_line("second").unwrap();
        out.finish().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second\n");
    }

    #[test]
    fn guarded_source_stops_when_cancelled() {
        let cancel = CancellationToken::new();
        let mut inner = MemoryInput::from_text("a\nb");
        let mut guarded = GuardedSource::new(&mut inner, &cancel);
        assert_eq!(guarded.read_line().unwrap().as_deref(), Some("a"));
        cancel.cancel();
        assert!(matches!(guarded.read_line(), Err(StreamError::Cancelled)));
    }
}
