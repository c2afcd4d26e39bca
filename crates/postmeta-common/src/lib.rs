//! Postmeta Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared functionality for the postmeta workspace members.
//!
//! - **Logging**: tracing subscriber setup with local-time line prefixes
//!
//! # Example
//!
//! ```no_run
//! use postmeta_common::logging::{init_logging, LogConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = LogConfig::default().with_env_overrides()?;
//!     let _guard = init_logging(&config)?;
//!     tracing::info!("Ready");
//!     Ok(())
//! }
//! ```

pub mod logging;

pub use logging::{init_logging, LogConfig};
