//! Shared test utilities for logscope integration harnesses.
//!
//! Import everything via `mod common; use common::*;` at the top of each
//! harness file.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;
use tempfile::TempDir;

use logscope_logs::LogStore;
use logscope_types::parse_timestamp;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Activity of four users over several years, every event and status present.
pub const CORPUS: &[&str] = &[
    "127.0.0.1\tAmigo\t30.08.2012 16:08:13\tLOGIN\tOK",
    "127.0.0.1\tAmigo\t30.08.2012 16:08:40\tDONE_TASK 15\tOK",
    "192.168.100.2\tVasya\t19.03.2016 00:00:00\tSOLVE_TASK 18\tOK",
    "146.34.15.5\tEduard\t13.09.2013 05:04:50\tDOWNLOAD\tOK",
    "127.0.0.1\tIvan\t11.12.2013 10:11:12\tWRITE_MESSAGE\tFAILED",
    "146.34.15.5\tEduard\t12.12.2013 21:56:30\tWRITE_MESSAGE\tOK",
    "127.0.0.1\tIvan\t14.10.2021 11:38:21\tSOLVE_TASK 18\tOK",
    "127.0.0.1\tIvan\t14.10.2021 11:38:25\tSOLVE_TASK 18\tERROR",
    "12.12.12.12\tAmigo\t21.10.2021 19:45:25\tSOLVE_TASK 15\tOK",
    "192.168.100.2\tVasya\t30.01.2014 12:56:22\tDONE_TASK 18\tERROR",
    "127.0.0.1\tAmigo\t29.2.2028 5:4:7\tLOGIN\tOK",
];

pub fn ts(s: &str) -> NaiveDateTime {
    parse_timestamp(s).unwrap()
}

// ---------------------------------------------------------------------------
// LogDir
// ---------------------------------------------------------------------------

/// Temporary log directory, removed on drop.
///
/// ```rust
/// let dir = LogDir::new()
///     .file("a.log", &["1.1.1.1\talice\t01.01.2020 10:00:00\tLOGIN\tOK"])
///     .file("notes.txt", &["ignored"]);
/// let store = dir.open();
/// ```
pub struct LogDir {
    dir: TempDir,
}

impl LogDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// The shared corpus split over two `.log` files
    pub fn corpus() -> Self {
        let (first, second) = CORPUS.split_at(5);
        Self::new().file("first.log", first).file("second.log", second)
    }

    pub fn file(self, name: &str, lines: &[&str]) -> Self {
        let mut text = lines.join("\n");
        text.push('\n');
        fs::write(self.dir.path().join(name), text).unwrap();
        self
    }

    pub fn bytes(self, name: &str, bytes: &[u8]) -> Self {
        fs::write(self.dir.path().join(name), bytes).unwrap();
        self
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn open(&self) -> LogStore {
        LogStore::open(self.path()).unwrap()
    }
}
