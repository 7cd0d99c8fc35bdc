//! Recent commit history extraction from a tracked folder.

use chrono::{DateTime, TimeZone, Utc};
use git2::Repository;

use crate::Result;

/// Information about a single commit.
#[derive(Debug, Clone)]
pub struct CommitInfo {
    /// Full commit hash, as stored on the dataset record
    pub hash: String,

    /// Short commit hash (7 characters)
    pub short_hash: String,

    /// First line of the commit message
    pub message: String,

    pub author: String,

    pub timestamp: DateTime<Utc>,
}

/// Extract the last `max_count` commits reachable from HEAD.
///
/// Returns commits most recent first. An unborn HEAD yields an empty list.
pub fn list_recent_commits(repo: &Repository, max_count: usize) -> Result<Vec<CommitInfo>> {
    let head = match repo.head() {
        Ok(head) => head,
        Err(e)
            if e.code() == git2::ErrorCode::UnbornBranch
                || e.code() == git2::ErrorCode::NotFound =>
        {
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };
    let commit = head.peel_to_commit()?;

    let mut revwalk = repo.revwalk()?;
    revwalk.push(commit.id())?;
    // Syncs can land within the same second; topological order breaks the tie
    revwalk.set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::TIME)?;

    let mut commits = Vec::with_capacity(max_count);

    for oid_result in revwalk.take(max_count) {
        let oid = oid_result?;
        let commit = repo.find_commit(oid)?;

        let timestamp: DateTime<Utc> = Utc
            .timestamp_opt(commit.time().seconds(), 0)
            .single()
            .unwrap_or_default();

        let message = commit
            .message()
            .unwrap_or("")
            .lines()
            .next()
            .unwrap_or("")
            .to_string();

        let author = commit.author().name().unwrap_or("Unknown").to_string();

        commits.push(CommitInfo {
            hash: oid.to_string(),
            short_hash: format!("{:.7}", oid),
            message,
            author,
            timestamp,
        });
    }

    Ok(commits)
}
