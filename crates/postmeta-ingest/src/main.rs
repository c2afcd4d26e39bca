//! Postmeta Ingest - combine Instaloader post metadata into one CSV
//!
//! Takes no arguments. The project root is found through its `.env` file;
//! input is read from `data/raw` and the table written to
//! `data/processed/cattownposts.csv`.

use anyhow::Result;
use postmeta_common::logging::{init_logging, LogConfig, LogLevel};
use postmeta_ingest::config::IngestConfig;
use postmeta_ingest::pipeline;
use tracing::info;

fn main() -> Result<()> {
    // Discovery loads the project .env, so LOG_* variables set there apply below.
    let config = IngestConfig::discover()?;

    let log_config = LogConfig::builder()
        .level(LogLevel::Debug)
        .log_file_prefix("postmeta-ingest")
        .build()
        .with_env_overrides()?;
    let _guard = init_logging(&log_config)?;

    if let Some(env_file) = &config.env_file {
        info!(env_file = %env_file.display(), "Loaded project .env");
    }

    info!(
        project_dir = %config.project_dir.display(),
        input_dir = %config.input_dir.display(),
        "Converting post metadata"
    );

    let report = pipeline::json_files_to_csv(&config)?;

    info!(
        files = report.files_seen,
        posts = report.posts_written,
        output = %report.output_path.display(),
        "Conversion complete"
    );
    Ok(())
}
