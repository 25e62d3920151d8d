//! Git history for the catalog
//!
//! When history is enabled the database directory is a git repository and
//! every write to the products collection becomes one commit, so the
//! catalog's evolution can be inspected, diffed and reverted with plain git.

use git2::{IndexAddOption, Repository as Git2Repo, Signature};
use std::path::Path;

use crate::error::Result;

const AUTHOR_NAME: &str = "mdcatalog";
const AUTHOR_EMAIL: &str = "mdcatalog@local";

/// Git repository wrapper
pub struct Repository {
    inner: Git2Repo,
}

impl Repository {
    /// Open an existing repository or initialize a new one
    pub fn open_or_init(path: &Path) -> Result<Self> {
        let inner = match Git2Repo::open(path) {
            Ok(repo) => repo,
            Err(_) => {
                let repo = Git2Repo::init(path)?;
                Self::create_initial_commit(&repo)?;
                repo
            }
        };

        Ok(Self { inner })
    }

    fn create_initial_commit(repo: &Git2Repo) -> Result<()> {
        let sig = Signature::now(AUTHOR_NAME, AUTHOR_EMAIL)?;
        let tree_id = repo.index()?.write_tree()?;
        let tree = repo.find_tree(tree_id)?;

        repo.commit(Some("HEAD"), &sig, &sig, "Initialize catalog database", &tree, &[])?;

        Ok(())
    }

    /// Commit all current changes, including deletions
    pub fn commit(&self, message: &str) -> Result<git2::Oid> {
        let sig = self.signature()?;
        let mut index = self.inner.index()?;

        index.add_all(["*"].iter(), IndexAddOption::DEFAULT, None)?;
        index.update_all(["*"].iter(), None)?;
        index.write()?;

        let tree_id = index.write_tree()?;
        let tree = self.inner.find_tree(tree_id)?;
        let parent = self.inner.head()?.peel_to_commit()?;

        let oid = self
            .inner
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &[&parent])?;

        Ok(oid)
    }

    /// Get the current HEAD commit hash
    pub fn head_hash(&self) -> Result<String> {
        let commit = self.inner.head()?.peel_to_commit()?;
        Ok(commit.id().to_string())
    }

    /// Summary lines of the most recent commits, newest first
    pub fn log(&self, limit: usize) -> Result<Vec<String>> {
        let mut walk = self.inner.revwalk()?;
        walk.push_head()?;

        let mut lines = Vec::new();
        for oid in walk.take(limit) {
            let commit = self.inner.find_commit(oid?)?;
            lines.push(commit.summary().unwrap_or_default().to_string());
        }
        Ok(lines)
    }

    /// Check if there are uncommitted changes
    pub fn has_changes(&self) -> Result<bool> {
        let statuses = self.inner.statuses(None)?;
        Ok(!statuses.is_empty())
    }

    fn signature(&self) -> Result<Signature<'_>> {
        // Try to get from git config, fall back to defaults
        self.inner
            .signature()
            .or_else(|_| Signature::now(AUTHOR_NAME, AUTHOR_EMAIL))
            .map_err(Into::into)
    }
}
