//! Postmeta Ingest Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Converts a directory of Instaloader `*.json.xz` post metadata files into a
//! single CSV table.
//!
//! # Stages
//!
//! - **Decoder** ([`decoder`]): xz decompression and JSON parsing
//! - **Record extraction** ([`post`]): `Post` documents lifted into [`post::Post`]
//! - **Aggregation** ([`table`], [`pipeline`]): rows collected and written as CSV
//!
//! # Example
//!
//! ```no_run
//! use postmeta_ingest::config::IngestConfig;
//! use postmeta_ingest::pipeline;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = IngestConfig::for_project("/srv/cattown");
//!     let report = pipeline::json_files_to_csv(&config)?;
//!     println!("{} posts written to {}", report.posts_written, report.output_path.display());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod decoder;
pub mod error;
pub mod pipeline;
pub mod post;
pub mod table;

pub use error::{IngestError, Result};
