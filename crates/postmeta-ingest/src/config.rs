//! Ingestion configuration
//!
//! Paths are resolved once at startup and passed explicitly into the
//! pipeline. The project root is the directory holding the nearest `.env`
//! file, searched from the current directory upwards.

use crate::error::{IngestError, Result};
use std::path::{Path, PathBuf};

// ============================================================================
// Layout Constants
// ============================================================================

/// Data directory below the project root
pub const DATA_DIR: &str = "data";

/// Scraped `*.json.xz` files, below [`DATA_DIR`]
pub const RAW_DATA_DIR: &str = "raw";

/// Generated tables, below [`DATA_DIR`]
pub const PROCESSED_DATA_DIR: &str = "processed";

pub const DEFAULT_OUTPUT_FILENAME: &str = "cattownposts.csv";

/// File name suffix of Instaloader metadata files
pub const DEFAULT_INPUT_SUFFIX: &str = ".json.xz";

/// What to do when an input file cannot be decoded or extracted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedInputPolicy {
    /// Stop the batch; no output is written
    #[default]
    Abort,
    /// Log a warning, count the file and continue
    Skip,
}

#[derive(Debug, Clone)]
pub struct IngestConfig {
    pub project_dir: PathBuf,

    /// Directory scanned for input files (non-recursive)
    pub input_dir: PathBuf,

    /// Directory the CSV is written to; created when missing
    pub output_dir: PathBuf,

    pub output_filename: String,

    pub input_suffix: String,

    /// Process inputs in file name order instead of directory order
    pub sort_inputs: bool,

    pub on_malformed: MalformedInputPolicy,

    /// `.env` file the project root was found through, when discovered
    pub env_file: Option<PathBuf>,
}

impl IngestConfig {
    /// Standard `data/raw` -> `data/processed` layout under `project_dir`
    pub fn for_project(project_dir: impl Into<PathBuf>) -> Self {
        let project_dir = project_dir.into();
        let data_dir = project_dir.join(DATA_DIR);

        Self {
            input_dir: data_dir.join(RAW_DATA_DIR),
            output_dir: data_dir.join(PROCESSED_DATA_DIR),
            output_filename: DEFAULT_OUTPUT_FILENAME.to_string(),
            input_suffix: DEFAULT_INPUT_SUFFIX.to_string(),
            sort_inputs: false,
            on_malformed: MalformedInputPolicy::default(),
            env_file: None,
            project_dir,
        }
    }

    /// Locate the project root through its `.env` file
    ///
    /// The variables in that file are loaded into the process environment
    /// (existing variables win).
    pub fn discover() -> Result<Self> {
        let env_file = dotenvy::dotenv().map_err(|e| {
            IngestError::Config(format!("Could not load a .env file marking the project root: {}", e))
        })?;

        let project_dir = project_root_of(&env_file)?;
        Ok(Self {
            env_file: Some(env_file),
            ..Self::for_project(project_dir)
        })
    }

    pub fn with_input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.input_dir = dir.into();
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_output_filename(mut self, filename: impl Into<String>) -> Self {
        self.output_filename = filename.into();
        self
    }

    pub fn with_input_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.input_suffix = suffix.into();
        self
    }

    pub fn with_sorted_inputs(mut self, sort: bool) -> Self {
        self.sort_inputs = sort;
        self
    }

    pub fn with_malformed_policy(mut self, policy: MalformedInputPolicy) -> Self {
        self.on_malformed = policy;
        self
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_filename)
    }
}

fn project_root_of(env_file: &Path) -> Result<PathBuf> {
    env_file
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| {
            IngestError::Config(format!("{} has no parent directory", env_file.display()))
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_for_project_layout() {
        let config = IngestConfig::for_project("/srv/cattown");

        assert_eq!(config.input_dir, PathBuf::from("/srv/cattown/data/raw"));
        assert_eq!(config.output_dir, PathBuf::from("/srv/cattown/data/processed"));
        assert_eq!(
            config.output_path(),
            PathBuf::from("/srv/cattown/data/processed/cattownposts.csv")
        );
        assert_eq!(config.input_suffix, ".json.xz");
        assert!(!config.sort_inputs);
        assert_eq!(config.on_malformed, MalformedInputPolicy::Abort);
        assert_eq!(config.env_file, None);
    }

    #[test]
    fn test_overrides() {
        let config = IngestConfig::for_project("/srv/cattown")
            .with_input_dir("/mnt/scrape")
            .with_output_dir("/tmp/out")
            .with_output_filename("posts.csv")
            .with_sorted_inputs(true)
            .with_malformed_policy(MalformedInputPolicy::Skip);

        assert_eq!(config.input_dir, PathBuf::from("/mnt/scrape"));
        assert_eq!(config.output_path(), PathBuf::from("/tmp/out/posts.csv"));
        assert!(config.sort_inputs);
        assert_eq!(config.on_malformed, MalformedInputPolicy::Skip);
        assert_eq!(config.project_dir, PathBuf::from("/srv/cattown"));
    }

    #[test]
    fn test_project_root_is_env_file_parent() {
        let root = project_root_of(Path::new("/home/me/cattown/.env")).unwrap();
        assert_eq!(root, PathBuf::from("/home/me/cattown"));
    }
}
