//! Line sinks receiving the topology text: console, in-memory buffer or file.
//! Anything that can append a line of text (a GUI text widget, a logger) can implement
//! `TextSink` and be passed to the emitter directly.
use super::error::OdeTopoError;
use enum_dispatch::enum_dispatch;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[enum_dispatch]
pub trait TextSink {
    fn insert_line(&mut self, line: &str) -> Result<(), OdeTopoError>;
    fn flush(&mut self) -> Result<(), OdeTopoError> {
        Ok(())
    }
}

/// prints every line to stdout
#[derive(Debug, Clone, Default)]
pub struct ConsoleSink;

impl TextSink for ConsoleSink {
    fn insert_line(&mut self, line: &str) -> Result<(), OdeTopoError> {
        println!("{}", line);
        Ok(())
    }
}

/// collects lines in memory
#[derive(Debug, Clone, Default)]
pub struct BufferSink {
    pub lines: Vec<String>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }
}

impl TextSink for BufferSink {
    fn insert_line(&mut self, line: &str) -> Result<(), OdeTopoError> {
        self.lines.push(line.to_string());
        Ok(())
    }
}

/// writes lines into a file
#[derive(Debug)]
pub struct FileSink {
    writer: BufWriter<File>,
}

impl FileSink {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, OdeTopoError> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl TextSink for FileSink {
    fn insert_line(&mut self, line: &str) -> Result<(), OdeTopoError> {
        writeln!(self.writer, "{}", line)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), OdeTopoError> {
        self.writer.flush()?;
        Ok(())
    }
}

#[derive(Debug)]
#[enum_dispatch(TextSink)]
pub enum OutputSink {
    Console(ConsoleSink),
    Buffer(BufferSink),
    File(FileSink),
}

impl OutputSink {
    /// file sink if a path is given, console otherwise
    pub fn from_path(path: Option<&str>) -> Result<Self, OdeTopoError> {
        match path {
            Some(p) if !p.trim().is_empty() => Ok(OutputSink::File(FileSink::create(p.trim())?)),
            _ => Ok(OutputSink::Console(ConsoleSink)),
        }
    }
}
