//! Relabelling of task descriptions in robotics dataset metadata.

pub mod config;
pub mod dataset;
pub mod records;
pub mod task_input;

pub use dataset::{change_task_description, ChangeOptions, ChangeReport, DatasetError};
pub use task_input::{parse_task_input, TaskInput};
