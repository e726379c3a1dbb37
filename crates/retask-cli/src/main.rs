use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use retask_core::config::resolve_backup_default_with_source;
use retask_core::{change_task_description, ChangeOptions, TaskInput};

const EXAMPLES: &str = r#"Examples:
  # Single task
  retask ~/.cache/huggingface/lerobot/user/dataset "Pick up the red cube"

  # Multiple tasks as a list
  retask /path/to/dataset '["Pick up the cube", "Place the cube", "Push button"]' --backup

  # Multiple tasks as comma-separated text
  retask /path/to/dataset "Pick up cube,Place cube,Push button" --backup"#;

#[derive(Parser)]
#[command(
    name = "retask",
    version,
    about = "Change task descriptions in a LeRobot dataset",
    after_help = EXAMPLES
)]
struct Cli {
    /// Path to the dataset directory
    dataset_dir: PathBuf,
    /// New task description(s): a single task, a list like '["task1", "task2"]',
    /// or a comma-separated list like 'task1,task2'
    new_tasks: String,
    /// Create .jsonl.backup copies before rewriting
    #[arg(long, conflicts_with = "no_backup")]
    backup: bool,
    /// Never create backups, even when a config file enables them
    #[arg(long)]
    no_backup: bool,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            println!("❌ Error: {err:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let backup = if cli.backup {
        true
    } else if cli.no_backup {
        false
    } else {
        let (value, source) = resolve_backup_default_with_source(&cli.dataset_dir);
        tracing::debug!(backup = value, source, "resolved backup default");
        value
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    change_task_description(
        &cli.dataset_dir,
        TaskInput::RawText(cli.new_tasks),
        ChangeOptions { backup },
        &mut out,
    )?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("RETASK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}
