//! Filesystem primitives for dataset-sync
//!
//! Path normalization, atomic writes guarded by advisory locks, content
//! checksums and format-agnostic config loading. Everything above this crate
//! touches the disk through these helpers.

pub mod checksum;
pub mod config;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use path::NormalizedPath;
