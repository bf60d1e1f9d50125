//! Test harness for fls integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

pub struct TestDir {
    dir: TempDir,
}

impl TestDir {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn add_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }

    /// A file of `size` bytes, for size-ordering tests.
    pub fn add_sized(&self, path: &str, size: usize) -> PathBuf {
        self.add_file(path, &"x".repeat(size))
    }

    pub fn add_dir(&self, path: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        fs::create_dir_all(&full_path).expect("Failed to create dir");
        full_path
    }
}

/// Run fls with the tree root as working directory, so paths come out relative
/// when `.` is passed as the target.
pub fn run_fls(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = fls_command(dir, args).output().expect("Failed to run fls");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();

    (stdout, stderr, success)
}

pub fn fls_command(dir: &Path, args: &[&str]) -> Command {
    let binary = env!("CARGO_BIN_EXE_fls");
    let mut cmd = Command::new(binary);
    cmd.args(args)
        .current_dir(dir)
        .env_remove("FLS_FORMAT")
        .env_remove("FLS_LOG")
        .env("NO_COLOR", "1");
    cmd
}

/// Output lines, in order.
pub fn lines(stdout: &str) -> Vec<&str> {
    stdout.lines().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_harness_creates_temp_dir() {
        let tree = TestDir::new();
        assert!(tree.path().exists());
    }

    #[test]
    fn test_harness_add_file() {
        let tree = TestDir::new();
        let file_path = tree.add_file("sub/test.txt", "hello");
        assert!(file_path.exists());
    }

    #[test]
    fn test_harness_add_sized() {
        let tree = TestDir::new();
        let file_path = tree.add_sized("big.bin", 123);
        assert_eq!(fs::metadata(file_path).unwrap().len(), 123);
    }
}
