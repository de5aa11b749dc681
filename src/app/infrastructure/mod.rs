//! Infrastructure layer - external integrations and utilities.
//!
//! This module contains code that interfaces with external systems:
//! - The host services seam
//! - The file-backed host
//! - Error types

pub mod error;
pub mod file_host;
pub mod host;

#[cfg(test)]
pub(crate) mod fake_host;
