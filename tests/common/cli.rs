use assert_cmd::Command;
use std::ffi::OsStr;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tempfile::TempDir;

#[derive(Debug)]
pub struct CompareRun {
    pub stdout: String,
    pub stderr: String,
    pub status: std::process::ExitStatus,
    pub duration: Duration,
}

impl CompareRun {
    pub fn code(&self) -> Option<i32> {
        self.status.code()
    }
}

/// Scratch directory used as both cwd and `HOME` for one run.
pub struct Workspace {
    pub temp_dir: TempDir,
    pub root: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir");
        let root = temp_dir.path().to_path_buf();
        Self { temp_dir, root }
    }

    /// Write a file relative to the workspace root and return its path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.root.join(name);
        fs::write(&path, contents).expect("write fixture");
        path
    }
}

pub fn run_compare<I, S>(workspace: &Workspace, args: I) -> CompareRun
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    run_compare_with_env(workspace, args, std::iter::empty::<(String, String)>())
}

pub fn run_compare_with_env<I, S, E, K, V>(workspace: &Workspace, args: I, env_vars: E) -> CompareRun
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
    E: IntoIterator<Item = (K, V)>,
    K: AsRef<OsStr>,
    V: AsRef<OsStr>,
{
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("pprof-compare"));
    cmd.current_dir(&workspace.root);
    cmd.args(args);
    cmd.env_remove("RUST_LOG");
    for (key, _) in std::env::vars() {
        if key.starts_with("PPROF_COMPARE_") {
            cmd.env_remove(key);
        }
    }
    cmd.envs(env_vars);
    cmd.env("NO_COLOR", "1");
    cmd.env("HOME", &workspace.root);

    let start = Instant::now();
    let output = cmd.output().expect("run pprof-compare");
    let duration = start.elapsed();

    CompareRun {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        status: output.status,
        duration,
    }
}
