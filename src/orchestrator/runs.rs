//! Run directory — per-run artifacts on disk.
//!
//! Each run gets `runs/<task-slug>_<timestamp>/` holding `metadata.json`
//! (the resolved invocation), `lab.log` (structured log output), and
//! `paper.md` once a paper is published.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use thiserror::Error;

use super::{ExperimentConfig, ExperimentMode};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("metadata serialization failed: {0}")]
    Metadata(#[from] serde_json::Error),
}

/// The resolved invocation, persisted as `metadata.json`.
#[derive(Debug, Clone, Serialize)]
pub struct RunMetadata {
    pub mode: ExperimentMode,
    #[serde(flatten)]
    pub config: ExperimentConfig,
}

/// A created run directory.
#[derive(Debug, Clone)]
pub struct RunDir {
    path: PathBuf,
}

impl RunDir {
    /// Create `runs/<slug>_<timestamp>/` under `base`.
    pub fn create(base: &Path, task: &str) -> Result<Self, RunError> {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let path = base.join(format!("{}_{secs}", task_slug(task)));
        fs::create_dir_all(&path)?;
        Ok(Self { path })
    }

    /// Use an explicit directory (e.g. passed by a parent process),
    /// creating it if needed.
    pub fn at(path: PathBuf) -> Result<Self, RunError> {
        fs::create_dir_all(&path)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where structured logs for this run go.
    pub fn log_path(&self) -> PathBuf {
        self.path.join("lab.log")
    }

    /// Write `metadata.json`.
    pub fn write_metadata(&self, meta: &RunMetadata) -> Result<(), RunError> {
        let json = serde_json::to_string_pretty(meta)?;
        fs::write(self.path.join("metadata.json"), json)?;
        Ok(())
    }
}

/// Write the finished paper to `paper.md`, returning its path.
pub fn write_paper(dir: &Path, markdown: &str) -> Result<PathBuf, RunError> {
    let path = dir.join("paper.md");
    fs::write(&path, markdown)?;
    Ok(path)
}

/// Filesystem-safe slug of a task description: alphanumerics, space, `-`,
/// `_` kept; spaces collapsed to `_`; capped at 50 chars.
pub fn task_slug(task: &str) -> String {
    let kept: String = task
        .chars()
        .filter(|c| c.is_alphanumeric() || " -_".contains(*c))
        .collect();
    kept.trim().replace(' ', "_").chars().take(50).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::Gpu;
    use tempfile::TempDir;

    #[test]
    fn slug_strips_punctuation_and_caps_length() {
        assert_eq!(task_slug("Scaling laws?!"), "Scaling_laws");
        assert_eq!(task_slug("  padded  "), "padded");
        let long = "x".repeat(80);
        assert_eq!(task_slug(&long).len(), 50);
    }

    #[test]
    fn create_makes_directory_with_slug_prefix() {
        let base = TempDir::new().unwrap();
        let run = RunDir::create(base.path(), "sparse attention").unwrap();
        assert!(run.path().is_dir());
        let name = run.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("sparse_attention_"), "got {name}");
    }

    #[test]
    fn metadata_json_round_trips_fields() {
        let base = TempDir::new().unwrap();
        let run = RunDir::at(base.path().join("run1")).unwrap();

        let mut config = ExperimentConfig::for_task("quantization error");
        config.gpu = Gpu::A100;
        config.test_mode = true;
        run.write_metadata(&RunMetadata {
            mode: ExperimentMode::Orchestrator,
            config,
        })
        .unwrap();

        let raw = std::fs::read_to_string(run.path().join("metadata.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["mode"], "orchestrator");
        assert_eq!(value["task"], "quantization error");
        assert_eq!(value["gpu"], "a100");
        assert_eq!(value["test_mode"], true);
    }

    #[test]
    fn paper_artifact_is_written() {
        let base = TempDir::new().unwrap();
        let path = write_paper(base.path(), "# Findings\n\nNothing replicated.").unwrap();
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.starts_with("# Findings"));
    }
}
