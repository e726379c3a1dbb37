use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;

/// One line of a metadata file. Field order is preserved on write.
pub type Record = Map<String, Value>;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Failed to read {path}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse {path} line {line}")]
    Parse {
        path: PathBuf,
        line: usize,
        source: serde_json::Error,
    },
    #[error("{path} line {line} is not a JSON object")]
    NotAnObject { path: PathBuf, line: usize },
    #[error("Failed to back up {from} to {to}")]
    Backup {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {path}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Which metadata file is being rewritten, and therefore which field changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetFile {
    /// `episodes.jsonl`: `tasks` receives the whole sequence.
    Episodes,
    /// `tasks.jsonl`: `task` receives the first description, or `""`.
    Tasks,
}

impl TargetFile {
    pub fn file_name(self) -> &'static str {
        match self {
            TargetFile::Episodes => "episodes.jsonl",
            TargetFile::Tasks => "tasks.jsonl",
        }
    }

    pub fn field(self) -> &'static str {
        match self {
            TargetFile::Episodes => "tasks",
            TargetFile::Tasks => "task",
        }
    }

    /// Noun used in progress messages ("Updated 3 episodes").
    pub fn noun(self) -> &'static str {
        match self {
            TargetFile::Episodes => "episodes",
            TargetFile::Tasks => "tasks",
        }
    }

    pub fn apply(self, record: &mut Record, tasks: &[String]) {
        let value = match self {
            TargetFile::Episodes => Value::Array(
                tasks
                    .iter()
                    .map(|task| Value::String(task.clone()))
                    .collect(),
            ),
            TargetFile::Tasks => Value::String(tasks.first().cloned().unwrap_or_default()),
        };
        if record.insert(self.field().to_string(), value).is_none() {
            tracing::warn!(field = self.field(), "record had no such field; inserted it");
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RewriteOptions {
    pub backup: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteSummary {
    pub path: PathBuf,
    pub records: usize,
    pub backup: Option<PathBuf>,
}

pub fn read_records(path: &Path) -> Result<Vec<Record>, RecordError> {
    let file = File::open(path).map_err(|source| RecordError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| RecordError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(trimmed).map_err(|source| RecordError::Parse {
            path: path.to_path_buf(),
            line: idx + 1,
            source,
        })?;
        match value {
            Value::Object(record) => records.push(record),
            _ => {
                return Err(RecordError::NotAnObject {
                    path: path.to_path_buf(),
                    line: idx + 1,
                })
            }
        }
    }
    Ok(records)
}

pub fn write_records(path: &Path, records: &[Record]) -> Result<(), RecordError> {
    let write_err = |source: std::io::Error| RecordError::Write {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    for record in records {
        serde_json::to_writer(&mut writer, record).map_err(|err| write_err(err.into()))?;
        writer.write_all(b"\n").map_err(write_err)?;
    }
    writer.flush().map_err(write_err)?;
    Ok(())
}

/// `meta/episodes.jsonl` -> `meta/episodes.jsonl.backup`
pub fn backup_path(path: &Path) -> PathBuf {
    path.with_extension("jsonl.backup")
}

/// Copy `path` next to itself, keeping permissions and modification time.
pub fn backup_file(path: &Path) -> Result<PathBuf, RecordError> {
    let target = backup_path(path);
    let backup_err = |source: std::io::Error| RecordError::Backup {
        from: path.to_path_buf(),
        to: target.clone(),
        source,
    };

    fs::copy(path, &target).map_err(backup_err)?;
    let modified = fs::metadata(path)
        .and_then(|metadata| metadata.modified())
        .map_err(backup_err)?;
    File::options()
        .write(true)
        .open(&target)
        .and_then(|file| file.set_modified(modified))
        .map_err(backup_err)?;

    Ok(target)
}

/// Read every record, apply the target's mutation, optionally back up the
/// original, then overwrite the file. Nothing is written if any line fails
/// to parse.
pub fn rewrite_records(
    path: &Path,
    target: TargetFile,
    tasks: &[String],
    options: RewriteOptions,
) -> Result<RewriteSummary, RecordError> {
    let mut records = read_records(path)?;
    for record in records.iter_mut() {
        target.apply(record, tasks);
    }

    let backup = if options.backup {
        let backup = backup_file(path)?;
        tracing::info!(from = %path.display(), to = %backup.display(), "created backup");
        Some(backup)
    } else {
        None
    };

    write_records(path, &records)?;
    tracing::info!(
        path = %path.display(),
        records = records.len(),
        field = target.field(),
        "rewrote records"
    );

    Ok(RewriteSummary {
        path: path.to_path_buf(),
        records: records.len(),
        backup,
    })
}
