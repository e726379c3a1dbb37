use std::ffi::OsString;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use tempfile::TempDir;

use retask_core::config::{
    config_path, read_config, resolve_backup_default_with_source, RetaskConfig,
};

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn lock_env() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct HomeGuard {
    previous: Option<OsString>,
}

impl HomeGuard {
    fn set(home: &Path) -> Self {
        let previous = std::env::var_os("RETASK_HOME");
        std::env::set_var("RETASK_HOME", home);
        Self { previous }
    }
}

impl Drop for HomeGuard {
    fn drop(&mut self) {
        match self.previous.as_ref() {
            Some(value) => std::env::set_var("RETASK_HOME", value),
            None => std::env::remove_var("RETASK_HOME"),
        }
    }
}

fn write_global(home: &Path, text: &str) {
    fs::create_dir_all(home).expect("home dir");
    fs::write(home.join("config.toml"), text).expect("write global config");
}

#[test]
fn project_config_sets_backup_default() {
    let _lock = lock_env();
    let temp = TempDir::new().expect("tempdir");
    let _home = HomeGuard::set(&temp.path().join("home"));
    fs::write(config_path(temp.path()), "backup = true\n").expect("write config");

    assert_eq!(
        read_config(&config_path(temp.path())).expect("read"),
        RetaskConfig { backup: Some(true) }
    );
    assert_eq!(
        resolve_backup_default_with_source(temp.path()),
        (true, "project")
    );
}

#[test]
fn global_config_applies_without_project_config() {
    let _lock = lock_env();
    let temp = TempDir::new().expect("tempdir");
    let home = temp.path().join("home");
    let dataset = temp.path().join("dataset");
    fs::create_dir_all(&dataset).expect("dataset dir");
    write_global(&home, "backup = true\n");
    let _home = HomeGuard::set(&home);

    assert_eq!(
        resolve_backup_default_with_source(&dataset),
        (true, "global")
    );
}

#[test]
fn project_config_wins_over_global() {
    let _lock = lock_env();
    let temp = TempDir::new().expect("tempdir");
    let home = temp.path().join("home");
    let dataset = temp.path().join("dataset");
    fs::create_dir_all(&dataset).expect("dataset dir");
    write_global(&home, "backup = true\n");
    fs::write(config_path(&dataset), "backup = false\n").expect("write config");
    let _home = HomeGuard::set(&home);

    assert_eq!(
        resolve_backup_default_with_source(&dataset),
        (false, "project")
    );
}

#[test]
fn malformed_config_falls_back_to_default() {
    let _lock = lock_env();
    let temp = TempDir::new().expect("tempdir");
    let home = temp.path().join("home");
    let dataset = temp.path().join("dataset");
    fs::create_dir_all(&dataset).expect("dataset dir");
    fs::write(config_path(&dataset), "backup = \"maybe\"\n").expect("write config");
    let _home = HomeGuard::set(&home);

    assert!(read_config(&config_path(&dataset)).is_err());
    assert_eq!(
        resolve_backup_default_with_source(&dataset),
        (false, "default")
    );
}

#[test]
fn malformed_global_config_is_ignored() {
    let _lock = lock_env();
    let temp = TempDir::new().expect("tempdir");
    let home = temp.path().join("home");
    let dataset = temp.path().join("dataset");
    fs::create_dir_all(&dataset).expect("dataset dir");
    write_global(&home, "backup = [\n");
    let _home = HomeGuard::set(&home);

    assert_eq!(
        resolve_backup_default_with_source(&dataset),
        (false, "default")
    );
}
