//! Shared helpers for logger tests
#![allow(dead_code)]

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use logctx::{Entry, FatalAction, Hook, Level, Settings, SharedWriter, Sink};
use serde_json::Value;

/// In-memory sink that can be read back after logging
#[derive(Clone, Default)]
pub struct CaptureWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl CaptureWriter {
    pub fn contents(&self) -> String {
        String::from_utf8(self.buf.lock().unwrap().clone()).expect("log output is not UTF-8")
    }

    /// Every written line, parsed as JSON
    pub fn lines(&self) -> Vec<Value> {
        self.contents()
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).expect("log line is not JSON"))
            .collect()
    }
}

impl Write for CaptureWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Settings writing into a [`CaptureWriter`]; fatal entries panic instead of exiting
pub fn capture_settings() -> (Settings, CaptureWriter) {
    let capture = CaptureWriter::default();
    let settings = Settings::new();
    settings.set_sink(Sink::Writer(SharedWriter::new(capture.clone())));
    settings.set_fatal_action(FatalAction::Panic);
    (settings, capture)
}

/// Hook target collecting every entry it sees
#[derive(Clone, Default)]
pub struct EntryRecorder {
    entries: Arc<Mutex<Vec<Entry>>>,
}

impl EntryRecorder {
    pub fn hook(&self) -> Hook {
        let entries = Arc::clone(&self.entries);
        Hook::new(move |entry| {
            entries.lock().unwrap().push(entry.clone());
            Ok(())
        })
    }

    pub fn entries(&self) -> Vec<Entry> {
        self.entries.lock().unwrap().clone()
    }

    pub fn count(&self, level: Level) -> usize {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|entry| entry.level == level)
            .count()
    }
}
