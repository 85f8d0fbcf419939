//! Chronicle Git - commit sources for the changelog engine
//!
//! This crate defines the raw commit record handed to the engine, the
//! [`CommitSource`] trait it reads from, and a git2-backed source that walks
//! history from HEAD and annotates tagged commits.

mod commits;
mod repository;
pub mod source;
mod tags;
pub mod types;

pub use commits::GitHistory;
pub use repository::{GitRepo, Result};
pub use source::{CommitSource, VecSource};
pub use types::{CommitInfo, TagInfo};
