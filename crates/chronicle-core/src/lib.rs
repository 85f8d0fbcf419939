//! Chronicle Core - shared foundation for the changelog engine
//!
//! This crate provides the error taxonomy, the category and semver impact
//! enumerations, and configuration loading and validation used by the
//! other Chronicle crates.

pub mod config;
pub mod error;
pub mod types;

pub use error::{ChronicleError, Result};
pub use types::{Category, SemverImpact, Stage};
