//! Git fixtures for source folders.
//!
//! Prefer letting the code under test initialize history. These helpers are
//! for tests that need a folder which is *already* tracked, or need to look
//! at the history independently of the code under test.

use std::path::Path;

/// Initialises a real git repository using `git2` (no commits).
///
/// Realism level: **REAL**: valid git object store, unborn HEAD.
///
/// # Panics
/// Panics if `git2::Repository::init` fails.
pub fn real_git_repo(path: &Path) -> git2::Repository {
    git2::Repository::init(path).unwrap_or_else(|e| {
        panic!(
            "real_git_repo: failed to init repository at {}: {e}",
            path.display()
        )
    })
}

/// Number of commits reachable from HEAD, 0 for an unborn HEAD.
///
/// # Panics
/// Panics if `path` is not a git repository.
pub fn commit_count(path: &Path) -> usize {
    let repo = git2::Repository::open(path)
        .unwrap_or_else(|e| panic!("commit_count: {} is not a repo: {e}", path.display()));
    let Ok(head) = repo.head() else {
        return 0;
    };
    let mut revwalk = repo.revwalk().unwrap();
    revwalk.push(head.target().unwrap()).unwrap();
    revwalk.count()
}

/// Full hash of HEAD, if any.
pub fn head_hash(path: &Path) -> Option<String> {
    let repo = git2::Repository::open(path).ok()?;
    let head = repo.head().ok()?;
    head.target().map(|oid| oid.to_string())
}
