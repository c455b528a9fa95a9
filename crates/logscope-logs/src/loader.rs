use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use logscope_types::LogEntry;

use crate::parser::{LineError, LogParser};

/// Default log file extension
pub const DEFAULT_EXTENSION: &str = ".log";

/// Construction-time failures; individual bad lines never end up here
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),

    #[error("cannot read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no files ending in {extension:?} found in {dir}")]
    NoLogFiles { dir: PathBuf, extension: String },
}

/// A line that was dropped during ingestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedLine {
    pub file: PathBuf,
    /// 1-based line number within `file`
    pub line_number: usize,
    pub error: LineError,
}

/// What happened while loading a directory
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    /// Files that were read, in read order
    pub files: Vec<PathBuf>,
    /// Files that matched but could not be read
    pub unreadable: Vec<PathBuf>,
    pub accepted: usize,
    pub rejected: Vec<RejectedLine>,
}

/// Reads every log file in a directory and parses its lines
#[derive(Clone, Debug)]
pub struct LogLoader {
    dir: PathBuf,
    extension: String,
}

impl LogLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Only files whose name ends with `extension` are read
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// List matching files in directory enumeration order
    pub fn discover(&self) -> Result<Vec<PathBuf>, LoadError> {
        if !self.dir.is_dir() {
            return Err(LoadError::NotADirectory(self.dir.clone()));
        }

        let io_err = |source| LoadError::Io {
            path: self.dir.clone(),
            source,
        };

        let mut files = Vec::new();
        for dir_entry in fs::read_dir(&self.dir).map_err(io_err)? {
            let path = dir_entry.map_err(io_err)?.path();
            let matches = path
                .file_name()
                .is_some_and(|name| {
                    name.as_encoded_bytes()
                        .ends_with(self.extension.as_bytes())
                });
            if matches && path.is_file() {
                files.push(path);
            }
        }

        if files.is_empty() {
            return Err(LoadError::NoLogFiles {
                dir: self.dir.clone(),
                extension: self.extension.clone(),
            });
        }

        debug!(dir = %self.dir.display(), count = files.len(), "discovered log files");
        Ok(files)
    }

    /// Read and parse every matching file
    pub fn load(&self) -> Result<(Vec<LogEntry>, IngestReport), LoadError> {
        let files = self.discover()?;
        let mut entries = Vec::new();
        let mut report = IngestReport::default();

        for path in files {
            let content = match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "skipping unreadable log file");
                    report.unreadable.push(path);
                    continue;
                }
            };

            for (idx, line) in content.lines().enumerate() {
                if line.trim().is_empty() {
                    continue;
                }
                match LogParser::parse_line(line) {
                    Ok(entry) => entries.push(entry),
                    Err(error) => {
                        warn!(
                            file = %path.display(),
                            line = idx + 1,
                            %error,
                            "dropping malformed log line"
                        );
                        report.rejected.push(RejectedLine {
                            file: path.clone(),
                            line_number: idx + 1,
                            error,
                        });
                    }
                }
            }
            report.files.push(path);
        }

        report.accepted = entries.len();
        info!(
            files = report.files.len(),
            accepted = report.accepted,
            rejected = report.rejected.len(),
            "log directory loaded"
        );
        Ok((entries, report))
    }
}
