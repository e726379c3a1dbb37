use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::records::{rewrite_records, RecordError, RewriteOptions, RewriteSummary, TargetFile};
use crate::task_input::TaskInput;

pub const META_DIR: &str = "meta";

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Dataset directory not found: {}", .0.display())]
    DatasetNotFound(PathBuf),
    #[error("Meta directory not found: {}", .0.display())]
    MetaNotFound(PathBuf),
    #[error("Episodes file not found: {}", .0.display())]
    EpisodesNotFound(PathBuf),
    #[error("Tasks file not found: {}", .0.display())]
    TasksNotFound(PathBuf),
    #[error(transparent)]
    Rewrite(#[from] RecordError),
    #[error("Failed to write progress output")]
    Report(#[source] std::io::Error),
}

/// Validated on-disk layout of a dataset's metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetLayout {
    pub root: PathBuf,
    pub meta_dir: PathBuf,
    pub episodes: PathBuf,
    pub tasks: PathBuf,
}

impl DatasetLayout {
    /// Checks, in order: dataset dir, `meta/`, `episodes.jsonl`, `tasks.jsonl`.
    pub fn locate(dataset_dir: &Path) -> Result<Self, DatasetError> {
        let root = dataset_dir.to_path_buf();
        if !root.exists() {
            return Err(DatasetError::DatasetNotFound(root));
        }
        let meta_dir = root.join(META_DIR);
        if !meta_dir.exists() {
            return Err(DatasetError::MetaNotFound(meta_dir));
        }
        let episodes = meta_dir.join(TargetFile::Episodes.file_name());
        if !episodes.exists() {
            return Err(DatasetError::EpisodesNotFound(episodes));
        }
        let tasks = meta_dir.join(TargetFile::Tasks.file_name());
        if !tasks.exists() {
            return Err(DatasetError::TasksNotFound(tasks));
        }
        Ok(Self {
            root,
            meta_dir,
            episodes,
            tasks,
        })
    }

    pub fn path_for(&self, target: TargetFile) -> &Path {
        match target {
            TargetFile::Episodes => &self.episodes,
            TargetFile::Tasks => &self.tasks,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ChangeOptions {
    pub backup: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeReport {
    pub dataset: PathBuf,
    pub tasks: Vec<String>,
    pub episodes: RewriteSummary,
    pub task_records: RewriteSummary,
}

/// Relabel every episode and task record of one dataset.
///
/// Episodes are rewritten before tasks. If the tasks file then fails, the
/// episodes file keeps its new contents.
pub fn change_task_description<W: Write>(
    dataset_dir: &Path,
    input: TaskInput,
    options: ChangeOptions,
    out: &mut W,
) -> Result<ChangeReport, DatasetError> {
    let layout = DatasetLayout::locate(dataset_dir)?;
    let tasks = input.resolve();

    report(out, format_args!("Dataset directory: {}", layout.root.display()))?;
    report(out, format_args!("New task descriptions: {:?}", tasks))?;
    if options.backup {
        report(out, format_args!("Backup files will be created"))?;
    } else {
        report(out, format_args!("No backup files will be created"))?;
    }
    report(out, format_args!(""))?;

    let rewrite_options = RewriteOptions {
        backup: options.backup,
    };
    let episodes = rewrite_target(&layout, TargetFile::Episodes, &tasks, rewrite_options, out)?;
    let task_records = rewrite_target(&layout, TargetFile::Tasks, &tasks, rewrite_options, out)?;

    report(out, format_args!(""))?;
    report(out, format_args!("✅ Task descriptions updated successfully!"))?;
    if options.backup {
        report(out, format_args!("Backup files created with .backup extension"))?;
    }

    Ok(ChangeReport {
        dataset: layout.root,
        tasks,
        episodes,
        task_records,
    })
}

fn rewrite_target<W: Write>(
    layout: &DatasetLayout,
    target: TargetFile,
    tasks: &[String],
    options: RewriteOptions,
    out: &mut W,
) -> Result<RewriteSummary, DatasetError> {
    let summary = rewrite_records(layout.path_for(target), target, tasks, options)?;
    if let Some(backup) = summary.backup.as_ref() {
        report(out, format_args!("Created backup: {}", backup.display()))?;
    }
    report(
        out,
        format_args!(
            "Updated {} {} in {}",
            summary.records,
            target.noun(),
            summary.path.display()
        ),
    )?;
    Ok(summary)
}

fn report<W: Write>(out: &mut W, line: std::fmt::Arguments<'_>) -> Result<(), DatasetError> {
    writeln!(out, "{}", line).map_err(DatasetError::Report)
}
