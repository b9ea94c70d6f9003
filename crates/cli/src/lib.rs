//! CLI utilities for the autodiag tools
//!
//! Provides shared CLI functionality:
//! - Terminal output formatting
//! - Status messages and error reports
//! - Text rendering of diagnosis outcomes

#![warn(missing_docs)]

pub mod output;
pub mod render;
