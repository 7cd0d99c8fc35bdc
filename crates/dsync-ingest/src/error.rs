//! Error types for dsync-ingest

use std::path::PathBuf;

/// Result type for dsync-ingest operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while validating or reading a source folder
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Folder does not exist: {path}")]
    FolderNotFound { path: PathBuf },

    #[error("Path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("Folder contains no tabular files ({extensions}): {path}")]
    NoTabularFiles { path: PathBuf, extensions: String },

    #[error("Unsupported tabular file extension: {extension}")]
    UnsupportedExtension { extension: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{file}: file is empty")]
    EmptyFile { file: String },

    #[error("{file}, line {line}: {message}")]
    InvalidHeader {
        file: String,
        line: u64,
        message: String,
    },

    #[error("{file}, line {line}: expected {expected} fields, found {found}")]
    RaggedRow {
        file: String,
        line: u64,
        expected: u64,
        found: u64,
    },

    #[error("{file}, line {line}: content is not valid UTF-8")]
    Encoding { file: String, line: u64 },

    #[error("{file}, line {line}: {message}")]
    Parse {
        file: String,
        line: u64,
        message: String,
    },

    #[error(
        "Column mismatch in {file}: expected [{}], found [{}]",
        .expected.join(", "),
        .found.join(", ")
    )]
    ColumnMismatch {
        file: String,
        expected: Vec<String>,
        found: Vec<String>,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The offending file and, when known, line.
    ///
    /// `None` for folder-level failures that do not point into a file.
    pub fn location(&self) -> Option<(&str, Option<u64>)> {
        match self {
            Self::EmptyFile { file } => Some((file, None)),
            Self::ColumnMismatch { file, .. } => Some((file, Some(1))),
            Self::InvalidHeader { file, line, .. }
            | Self::RaggedRow { file, line, .. }
            | Self::Encoding { file, line }
            | Self::Parse { file, line, .. } => Some((file, Some(*line))),
            _ => None,
        }
    }
}
