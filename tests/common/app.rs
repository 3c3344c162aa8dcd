//! Runs the ditherbooth binary inside a scratch directory.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Scratch directory plus a handle on the built binary.
pub struct TestApp {
    dir: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Run the binary with `args`; CONFIG_FILE is cleared
    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_ditherbooth"))
            .args(args)
            .current_dir(self.dir.path())
            .env_remove("CONFIG_FILE")
            .env("RUST_LOG", "off")
            .output()
            .unwrap()
    }
}
