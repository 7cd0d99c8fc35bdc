//! Folder reader
//!
//! Reads every recognized tabular file directly inside a folder and
//! concatenates them into one [`FolderSnapshot`]. The first file (by name)
//! fixes the column list; every later file must repeat it exactly.

use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use dsync_fs::NormalizedPath;

use crate::{Error, FolderSnapshot, Result, TabularFormat, Value};

/// A source file selected for reading.
#[derive(Debug, Clone)]
struct SourceFile {
    name: String,
    path: PathBuf,
    format: TabularFormat,
}

/// Reads a source folder into a snapshot.
#[derive(Debug, Clone)]
pub struct FolderReader {
    formats: Vec<TabularFormat>,
}

impl Default for FolderReader {
    fn default() -> Self {
        Self::new()
    }
}

impl FolderReader {
    /// Reader recognizing every supported format.
    pub fn new() -> Self {
        Self {
            formats: TabularFormat::ALL.to_vec(),
        }
    }

    /// Reader restricted to the given extensions (`"csv"`, `".tsv"`, ...).
    pub fn with_extensions<S: AsRef<str>>(extensions: &[S]) -> Result<Self> {
        let mut formats = Vec::new();
        for ext in extensions {
            let format: TabularFormat = ext.as_ref().parse()?;
            if !formats.contains(&format) {
                formats.push(format);
            }
        }
        if formats.is_empty() {
            return Err(Error::UnsupportedExtension {
                extension: String::new(),
            });
        }
        Ok(Self { formats })
    }

    pub fn formats(&self) -> &[TabularFormat] {
        &self.formats
    }

    /// Check that the folder exists, is a directory, and holds at least one
    /// recognized file. Nothing is parsed.
    pub fn validate_folder(&self, folder: &NormalizedPath) -> Result<()> {
        let files = self.list_files(folder)?;
        if files.is_empty() {
            return Err(self.no_tabular_files(folder));
        }
        Ok(())
    }

    /// Names of the recognized files in read order.
    pub fn source_files(&self, folder: &NormalizedPath) -> Result<Vec<String>> {
        Ok(self
            .list_files(folder)?
            .into_iter()
            .map(|file| file.name)
            .collect())
    }

    /// Read the folder into a single snapshot.
    pub fn read_folder(&self, folder: &NormalizedPath) -> Result<FolderSnapshot> {
        let files = self.list_files(folder)?;
        if files.is_empty() {
            return Err(self.no_tabular_files(folder));
        }

        let mut snapshot = FolderSnapshot::default();
        for (index, file) in files.into_iter().enumerate() {
            let (columns, rows) = read_file(&file)?;
            if index == 0 {
                snapshot.columns = columns;
            } else if columns != snapshot.columns {
                return Err(Error::ColumnMismatch {
                    file: file.name,
                    expected: snapshot.columns,
                    found: columns,
                });
            }
            tracing::trace!(file = %file.name, rows = rows.len(), "Read source file");
            snapshot.rows.extend(rows);
            snapshot.files.push(file.name);
        }

        tracing::debug!(
            folder = %folder,
            files = snapshot.files.len(),
            columns = snapshot.column_count(),
            rows = snapshot.row_count(),
            "Read folder snapshot"
        );
        Ok(snapshot)
    }

    fn list_files(&self, folder: &NormalizedPath) -> Result<Vec<SourceFile>> {
        let root = folder.to_native();
        let metadata = match std::fs::metadata(&root) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::FolderNotFound { path: root });
            }
            Err(e) => return Err(Error::io(&root, e)),
        };
        if !metadata.is_dir() {
            return Err(Error::NotADirectory { path: root });
        }

        let entries = std::fs::read_dir(&root).map_err(|e| Error::io(&root, e))?;
        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::io(&root, e))?;
            let path = entry.path();
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                tracing::warn!(path = %path.display(), "Skipping file with non UTF-8 name");
                continue;
            };
            if name.starts_with('.') || !path.is_file() {
                continue;
            }
            let Some(format) = self.format_of(&path) else {
                continue;
            };
            files.push(SourceFile { name, path, format });
        }

        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }

    fn format_of(&self, path: &Path) -> Option<TabularFormat> {
        let ext = path.extension()?.to_str()?;
        TabularFormat::from_extension(ext).filter(|format| self.formats.contains(format))
    }

    fn no_tabular_files(&self, folder: &NormalizedPath) -> Error {
        let extensions = self
            .formats
            .iter()
            .map(|format| format!(".{format}"))
            .collect::<Vec<_>>()
            .join(", ");
        Error::NoTabularFiles {
            path: folder.to_native(),
            extensions,
        }
    }
}

fn read_file(file: &SourceFile) -> Result<(Vec<String>, Vec<Vec<Value>>)> {
    let handle = File::open(&file.path).map_err(|e| Error::io(&file.path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(file.format.delimiter())
        .has_headers(true)
        .flexible(false)
        .from_reader(BufReader::new(handle));

    let headers = reader
        .headers()
        .map_err(|e| csv_error(file, e))?
        .clone();
    if headers.is_empty() {
        return Err(Error::EmptyFile {
            file: file.name.clone(),
        });
    }
    let header_line = headers.position().map(|pos| pos.line()).unwrap_or(1);

    let mut columns = Vec::with_capacity(headers.len());
    let mut seen = HashSet::new();
    for (position, name) in headers.iter().enumerate() {
        let name = if position == 0 {
            name.trim_start_matches('\u{feff}')
        } else {
            name
        };
        if name.is_empty() {
            return Err(Error::InvalidHeader {
                file: file.name.clone(),
                line: header_line,
                message: format!("empty column name at position {}", position + 1),
            });
        }
        if !seen.insert(name.to_string()) {
            return Err(Error::InvalidHeader {
                file: file.name.clone(),
                line: header_line,
                message: format!("duplicate column '{name}'"),
            });
        }
        columns.push(name.to_string());
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| csv_error(file, e))?;
        rows.push(record.iter().map(Value::from_field).collect());
    }
    Ok((columns, rows))
}

fn csv_error(file: &SourceFile, err: csv::Error) -> Error {
    let line = err.position().map(|pos| pos.line()).unwrap_or(0);
    match err.into_kind() {
        csv::ErrorKind::Io(source) => Error::io(&file.path, source),
        csv::ErrorKind::Utf8 { pos, .. } => Error::Encoding {
            file: file.name.clone(),
            line: pos.map(|p| p.line()).unwrap_or(line),
        },
        csv::ErrorKind::UnequalLengths {
            pos,
            expected_len,
            len,
        } => Error::RaggedRow {
            file: file.name.clone(),
            line: pos.map(|p| p.line()).unwrap_or(line),
            expected: expected_len,
            found: len,
        },
        other => Error::Parse {
            file: file.name.clone(),
            line,
            message: format!("{other:?}"),
        },
    }
}
