//! Shared test utilities for the dataset-sync workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`folder`]: [`TestFolder`](folder::TestFolder), a temporary source folder with CSV writers
//! - [`git`]: git fixtures for folders that must already carry history

pub mod folder;
pub mod git;

pub use folder::TestFolder;
