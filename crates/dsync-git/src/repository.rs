//! git2 implementation of [`HistoryBackend`]

use std::path::PathBuf;

use git2::{Commit, DiffOptions, ErrorCode, IndexAddOption, Oid, Repository, Signature};

use crate::commits::{CommitInfo, list_recent_commits};
use crate::history::HistoryBackend;
use crate::{Error, Result};
use dsync_fs::NormalizedPath;

/// Message of the commit written by [`GitHistory::init_repo`].
pub const INITIAL_COMMIT_MESSAGE: &str = "Initial dataset commit";

const DEFAULT_AUTHOR_NAME: &str = "dataset-sync";
const DEFAULT_AUTHOR_EMAIL: &str = "dataset-sync@localhost";

/// Folder history backed by a git repository living inside the folder.
///
/// Commits are authored with a fixed identity so that syncing never depends
/// on the host's git configuration. A repository handle is opened per call;
/// nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct GitHistory {
    author_name: String,
    author_email: String,
}

impl Default for GitHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl GitHistory {
    pub fn new() -> Self {
        Self::with_author(DEFAULT_AUTHOR_NAME, DEFAULT_AUTHOR_EMAIL)
    }

    /// Create a backend that authors commits as `name <email>`.
    pub fn with_author(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            author_name: name.into(),
            author_email: email.into(),
        }
    }

    pub fn author_name(&self) -> &str {
        &self.author_name
    }

    pub fn author_email(&self) -> &str {
        &self.author_email
    }

    /// Hash of the current head commit, or `None` for a tracked folder with
    /// no commits yet.
    pub fn head_commit(&self, folder: &NormalizedPath) -> Result<Option<String>> {
        let repo = self.open_tracked(folder)?;
        Ok(head_of(&repo)?.map(|commit| commit.id().to_string()))
    }

    /// The last `max_count` commits of the folder, most recent first.
    pub fn recent_commits(
        &self,
        folder: &NormalizedPath,
        max_count: usize,
    ) -> Result<Vec<CommitInfo>> {
        let repo = self.open_tracked(folder)?;
        list_recent_commits(&repo, max_count)
    }

    /// Whether the folder already has history.
    pub fn is_tracked(&self, folder: &NormalizedPath) -> Result<bool> {
        let native = ensure_folder(folder)?;
        match Repository::open(&native) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn open_tracked(&self, folder: &NormalizedPath) -> Result<Repository> {
        let native = ensure_folder(folder)?;
        match Repository::open(&native) {
            Ok(repo) => Ok(repo),
            Err(e) if e.code() == ErrorCode::NotFound => Err(Error::NotTracked { path: native }),
            Err(e) => Err(e.into()),
        }
    }

    fn signature(&self) -> Result<Signature<'static>> {
        Ok(Signature::now(&self.author_name, &self.author_email)?)
    }

    fn write_commit(
        &self,
        repo: &Repository,
        tree_id: Oid,
        message: &str,
        parent: Option<&Commit<'_>>,
    ) -> Result<String> {
        let tree = repo.find_tree(tree_id)?;
        let signature = self.signature()?;
        let parents: Vec<&Commit<'_>> = parent.into_iter().collect();
        let oid = repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )?;
        Ok(oid.to_string())
    }
}

impl HistoryBackend for GitHistory {
    fn has_changes_since(&self, folder: &NormalizedPath, commit_hash: &str) -> Result<bool> {
        let repo = self.open_tracked(folder)?;
        let unknown = || Error::UnknownCommit {
            hash: commit_hash.to_string(),
            path: folder.to_native(),
        };

        let oid = Oid::from_str(commit_hash).map_err(|_| unknown())?;
        let commit = repo.find_commit(oid).map_err(|_| unknown())?;
        let tree = commit.tree()?;

        let mut opts = DiffOptions::new();
        opts.include_untracked(true).recurse_untracked_dirs(true);
        let diff = repo.diff_tree_to_workdir_with_index(Some(&tree), Some(&mut opts))?;

        let changed = diff.deltas().next().is_some();
        tracing::debug!(folder = %folder, commit = %commit_hash, changed, "Checked folder for changes");
        Ok(changed)
    }

    fn commit_all(&self, folder: &NormalizedPath, message: &str) -> Result<String> {
        let repo = self.open_tracked(folder)?;
        let tree_id = stage_all(&repo)?;
        let head = head_of(&repo)?;

        if let Some(head) = &head
            && head.tree_id() == tree_id
        {
            tracing::debug!(folder = %folder, commit = %head.id(), "Folder unchanged, keeping head commit");
            return Ok(head.id().to_string());
        }

        let hash = self.write_commit(&repo, tree_id, message, head.as_ref())?;
        tracing::info!(folder = %folder, commit = %hash, "Committed folder snapshot");
        Ok(hash)
    }

    fn init_repo(&self, folder: &NormalizedPath) -> Result<String> {
        let native = ensure_folder(folder)?;
        match Repository::open(&native) {
            Ok(_) => return Err(Error::AlreadyTracked { path: native }),
            Err(e) if e.code() == ErrorCode::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        let repo = Repository::init(&native)?;
        let tree_id = stage_all(&repo)?;
        let hash = self.write_commit(&repo, tree_id, INITIAL_COMMIT_MESSAGE, None)?;
        tracing::info!(folder = %folder, commit = %hash, "Initialized folder history");
        Ok(hash)
    }
}

fn ensure_folder(folder: &NormalizedPath) -> Result<PathBuf> {
    let native = folder.to_native();
    if !native.is_dir() {
        return Err(Error::FolderInaccessible { path: native });
    }
    Ok(native)
}

/// Stage every addition, modification and deletion in the work tree and
/// return the resulting tree id.
fn stage_all(repo: &Repository) -> Result<Oid> {
    let mut index = repo.index()?;
    index.add_all(["*"], IndexAddOption::DEFAULT, None)?;
    index.update_all(["*"], None)?;
    index.write()?;
    Ok(index.write_tree()?)
}

fn head_of(repo: &Repository) -> Result<Option<Commit<'_>>> {
    match repo.head() {
        Ok(head) => Ok(Some(head.peel_to_commit()?)),
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}
