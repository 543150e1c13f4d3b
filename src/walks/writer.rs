//! The shared walk sink.
//!
//! All workers append to one logical file. Physical writes are mutually
//! exclusive so lines from different batches never interleave; the relative
//! order of batches is unspecified. The sink is opened once before
//! dispatch and finished once after every task has completed.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

use flate2::Compression;
use flate2::write::GzEncoder;

use crate::error::OutputError;

enum Sink {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
}

impl Sink {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        match self {
            Sink::Plain(writer) => {
                writer.write_all(line.as_bytes())?;
                writer.write_all(b"\n")
            }
            Sink::Gzip(writer) => {
                writer.write_all(line.as_bytes())?;
                writer.write_all(b"\n")
            }
        }
    }

    fn finish(self) -> io::Result<()> {
        match self {
            Sink::Plain(mut writer) => writer.flush(),
            Sink::Gzip(writer) => writer.finish()?.flush(),
        }
    }
}

/// Thread-safe, line-oriented walk sink.
///
/// The sink is gzip-compressed when the target path ends in `.gz`.
pub struct WalkWriter {
    sink: Mutex<Sink>,
}

impl WalkWriter {
    /// Create the sink, truncating any existing file at `path`.
    ///
    /// Missing parent directories are created.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, OutputError> {
        let path = path.as_ref();
        let create_err = |source| OutputError::Create {
            path: path.display().to_string(),
            source,
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(create_err)?;
            }
        }
        let file = BufWriter::new(File::create(path).map_err(create_err)?);
        let gzip = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));
        let sink = if gzip {
            Sink::Gzip(GzEncoder::new(file, Compression::default()))
        } else {
            Sink::Plain(file)
        };
        Ok(Self {
            sink: Mutex::new(sink),
        })
    }

    /// Append a batch of walks, one per line.
    ///
    /// The sink lock is held only for the duration of the physical write
    /// and released on every exit path.
    pub fn write_batch(&self, walks: &[String]) -> Result<(), OutputError> {
        if walks.is_empty() {
            return Ok(());
        }
        let mut sink = self.sink.lock().map_err(|_| OutputError::SinkPoisoned)?;
        for walk in walks {
            sink.write_line(walk)
                .map_err(|source| OutputError::Write { source })?;
        }
        Ok(())
    }

    /// Flush buffered data and close the sink (terminating the gzip stream
    /// for compressed targets).
    pub fn finish(self) -> Result<(), OutputError> {
        let sink = self
            .sink
            .into_inner()
            .map_err(|_| OutputError::SinkPoisoned)?;
        sink.finish().map_err(|source| OutputError::Write { source })
    }
}

impl std::fmt::Debug for WalkWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalkWriter").finish_non_exhaustive()
    }
}
