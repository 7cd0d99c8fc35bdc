//! [`TestFolder`] builder for dataset source folders.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary dataset source folder.
///
/// The folder lives at `<tempdir>/data`, so tests can also place siblings
/// (state directories, registries) next to it under [`TestFolder::root`].
///
/// # Example
///
/// ```rust,no_run
/// use dsync_test_utils::TestFolder;
///
/// let folder = TestFolder::new();
/// folder.write_csv("sales.csv", &["date", "amount"], &[&["2024-01-01", "100.00"]]);
/// folder.append_row("sales.csv", &["2024-01-02", "250.00"]);
/// ```
pub struct TestFolder {
    temp_dir: TempDir,
    data: PathBuf,
}

impl Default for TestFolder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFolder {
    /// Create an empty source folder.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let data = temp_dir.path().join("data");
        fs::create_dir_all(&data).unwrap();
        Self { temp_dir, data }
    }

    /// Scratch root that contains the source folder.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The source folder itself.
    pub fn path(&self) -> &Path {
        &self.data
    }

    /// Path of the source folder as an owned `String`.
    pub fn path_string(&self) -> String {
        self.data.to_string_lossy().into_owned()
    }

    /// Write a comma separated file with a header line and rows.
    pub fn write_csv(&self, name: &str, header: &[&str], rows: &[&[&str]]) {
        let mut content = header.join(",");
        content.push('\n');
        for row in rows {
            content.push_str(&row.join(","));
            content.push('\n');
        }
        self.write_file(name, &content);
    }

    /// Write raw file content, creating parent directories.
    pub fn write_file(&self, name: &str, content: &str) {
        let path = self.data.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("write_file: failed to write {}: {e}", path.display()));
    }

    /// Append one comma separated row to an existing file.
    pub fn append_row(&self, name: &str, row: &[&str]) {
        let path = self.data.join(name);
        let mut file = OpenOptions::new()
            .append(true)
            .open(&path)
            .unwrap_or_else(|e| panic!("append_row: failed to open {}: {e}", path.display()));
        writeln!(file, "{}", row.join(",")).unwrap();
    }

    pub fn remove_file(&self, name: &str) {
        fs::remove_file(self.data.join(name)).unwrap();
    }

    /// Read a file from the source folder.
    pub fn read_file(&self, name: &str) -> String {
        fs::read_to_string(self.data.join(name)).unwrap()
    }
}
