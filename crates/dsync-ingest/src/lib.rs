//! Folder ingestion for dataset-sync
//!
//! Turns the tabular files of one source folder into a single logical table.
//! Files are read in lexical filename order and rows keep their in-file
//! order, so reading unchanged content twice yields identical snapshots.

pub mod error;
pub mod format;
pub mod reader;
pub mod snapshot;
pub mod value;

pub use error::{Error, Result};
pub use format::TabularFormat;
pub use reader::FolderReader;
pub use snapshot::FolderSnapshot;
pub use value::Value;
