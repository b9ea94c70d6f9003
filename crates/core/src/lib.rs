//! Core utilities for the autodiag tools
//!
//! This crate provides shared functionality used by the CLI:
//!
//! - **Error handling**: Coded errors with context and recovery suggestions
//! - **Configuration**: TOML-based configuration with defaults
//! - **Database discovery**: Locating and loading the diagnostic store
//!
//! # Example
//!
//! ```rust,no_run
//! use autodiag_core::config::{open_database, Config};
//! use std::path::Path;
//!
//! let config = Config::load(None)?;
//! let (path, store) = open_database(Path::new("."), None, &config.schema.database)?;
//! println!("{} diagnostics from {}", store.len(), path.display());
//! # Ok::<(), autodiag_core::Error>(())
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;

pub use error::{Error, ErrorCode, Result, ResultExt};

