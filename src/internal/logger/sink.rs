// src/internal/logger/sink.rs

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;

/// Where encoded entries are written
#[derive(Clone, Default)]
pub enum Sink {
    #[default]
    Stdout,
    Stderr,
    Writer(SharedWriter),
}

impl Sink {
    /// Opens (or creates) a log file; see [`SharedWriter::file`]
    pub fn file(path: impl AsRef<Path>, append: bool) -> io::Result<Self> {
        SharedWriter::file(path, append).map(Sink::Writer)
    }

    pub(crate) fn make_writer(&self) -> BoxMakeWriter {
        match self {
            Sink::Stdout => BoxMakeWriter::new(io::stdout),
            Sink::Stderr => BoxMakeWriter::new(io::stderr),
            Sink::Writer(writer) => BoxMakeWriter::new(writer.clone()),
        }
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sink::Stdout => f.write_str("Stdout"),
            Sink::Stderr => f.write_str("Stderr"),
            Sink::Writer(_) => f.write_str("Writer(..)"),
        }
    }
}

/// Thread-safe handle over any `Write`, shared by every logger using it
#[derive(Clone)]
pub struct SharedWriter {
    inner: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl SharedWriter {
    pub fn new<W>(writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            inner: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// Log file writer. Parent directories are created; without `append`
    /// an existing file is replaced.
    pub fn file(path: impl AsRef<Path>, append: bool) -> io::Result<Self> {
        create_log_file(path.as_ref(), append).map(Self::new)
    }

    /// A writer that panicked mid-record leaves the lock poisoned; the
    /// writer itself is still usable, so later records go through.
    fn lock(&self) -> MutexGuard<'_, Box<dyn Write + Send>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn create_log_file(path: &Path, append: bool) -> io::Result<fs::File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    if !append && path.exists() {
        fs::remove_file(path)?;
    }

    OpenOptions::new()
        .create(true)
        .append(append)
        .write(true)
        .open(path)
}

impl Write for SharedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock().write(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        // One lock per record keeps concurrent lines from interleaving.
        self.lock().write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.lock().flush()
    }
}

impl<'a> MakeWriter<'a> for SharedWriter {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
