//! Property-based tests for snapshot reading

use dsync_fs::NormalizedPath;
use dsync_ingest::FolderReader;
use dsync_test_utils::TestFolder;
use proptest::prelude::*;

fn cell() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ._-]{1,12}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn rows_survive_reading_in_order(
        rows in prop::collection::vec(prop::collection::vec(cell(), 3), 0..20)
    ) {
        let folder = TestFolder::new();
        let borrowed: Vec<Vec<&str>> = rows
            .iter()
            .map(|row| row.iter().map(String::as_str).collect())
            .collect();
        let slices: Vec<&[&str]> = borrowed.iter().map(Vec::as_slice).collect();
        folder.write_csv("data.csv", &["a", "b", "c"], &slices);

        let snapshot = FolderReader::new()
            .read_folder(&NormalizedPath::new(folder.path()))
            .unwrap();

        prop_assert_eq!(snapshot.row_count(), rows.len());
        for (read, written) in snapshot.rows.iter().zip(rows.iter()) {
            let read: Vec<&str> = read.iter().map(|v| v.as_str().unwrap()).collect();
            let written: Vec<&str> = written.iter().map(String::as_str).collect();
            prop_assert_eq!(read, written);
        }
    }

    #[test]
    fn split_files_equal_one_file(split in 0usize..10, total in 1usize..10) {
        let split = split.min(total);
        let all: Vec<String> = (0..total).map(|i| i.to_string()).collect();
        let rows: Vec<[&str; 1]> = all.iter().map(|s| [s.as_str()]).collect();
        let slices: Vec<&[&str]> = rows.iter().map(|r| r.as_slice()).collect();

        let whole = TestFolder::new();
        whole.write_csv("all.csv", &["n"], &slices);

        let parts = TestFolder::new();
        parts.write_csv("part1.csv", &["n"], &slices[..split]);
        parts.write_csv("part2.csv", &["n"], &slices[split..]);

        let reader = FolderReader::new();
        let a = reader.read_folder(&NormalizedPath::new(whole.path())).unwrap();
        let b = reader.read_folder(&NormalizedPath::new(parts.path())).unwrap();

        prop_assert_eq!(a.columns, b.columns);
        prop_assert_eq!(a.rows, b.rows);
    }
}
