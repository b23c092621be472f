use std::path::Path;

use git2::{
    Commit, Cred, CredentialType, ErrorCode, FetchOptions, PushOptions, RemoteCallbacks,
    Repository as Git2Repo, StashFlags, Status, StatusOptions,
};

use crate::error::{GuardedPushError, Result};
use crate::git::{CommitInfo, VersionControl};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    /// Access the underlying git2 repository
    pub fn inner(&self) -> &Git2Repo {
        &self.repo
    }

    /// HEAD's commit, or `None` when the branch has no commits yet
    fn head_commit(&self) -> Result<Option<Commit<'_>>> {
        match self.repo.head() {
            Ok(head) => Ok(Some(head.peel_to_commit()?)),
            Err(e) if is_unborn(&e) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn statuses(&self, include_untracked: bool) -> Result<git2::Statuses<'_>> {
        let mut options = StatusOptions::new();
        options
            .include_untracked(include_untracked)
            .recurse_untracked_dirs(include_untracked)
            .include_ignored(false);

        Ok(self.repo.statuses(Some(&mut options))?)
    }
}

fn is_unborn(error: &git2::Error) -> bool {
    matches!(error.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound)
}

/// Credential callbacks shared by fetch and push.
///
/// Tries SSH keys from ~/.ssh/, then the SSH agent, then default credentials.
fn remote_callbacks<'a>() -> RemoteCallbacks<'a> {
    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(|_url, username_from_url, allowed_types| {
        let username = username_from_url.unwrap_or("git");

        if allowed_types.contains(CredentialType::SSH_KEY) {
            if let Some(home) = dirs::home_dir() {
                for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                    let path = home.join(".ssh").join(key);
                    if path.exists() {
                        if let Ok(cred) = Cred::ssh_key(username, None, &path, None) {
                            return Ok(cred);
                        }
                    }
                }
            }

            if let Ok(cred) = Cred::ssh_key_from_agent(username) {
                return Ok(cred);
            }
        }

        Cred::default()
    });
    callbacks
}

impl VersionControl for Git2Repository {
    fn head_history(&self) -> Result<Vec<CommitInfo>> {
        if self.head_commit()?.is_none() {
            return Ok(Vec::new());
        }

        let mut revwalk = self.repo.revwalk()?;
        revwalk.push_head()?;

        let mut commits = Vec::new();
        for oid_result in revwalk {
            let oid = oid_result?;
            let commit = self.repo.find_commit(oid)?;

            commits.push(CommitInfo {
                hash: oid.to_string(),
                message: String::from_utf8_lossy(commit.message_bytes()).into_owned(),
                author: commit.author().name().unwrap_or("unknown").to_string(),
            });
        }

        Ok(commits)
    }

    fn active_branch(&self) -> Result<String> {
        let head = self
            .repo
            .head()
            .map_err(|e| GuardedPushError::branch(format!("Could not determine HEAD: {}", e)))?;

        if !head.is_branch() {
            return Err(GuardedPushError::branch("HEAD is detached"));
        }

        head.shorthand()
            .map(String::from)
            .ok_or_else(|| GuardedPushError::branch("Branch name is not valid UTF-8"))
    }

    fn is_dirty(&self, include_untracked: bool) -> Result<bool> {
        let statuses = self.statuses(include_untracked)?;

        Ok(statuses.iter().any(|entry| {
            let status = entry.status();
            status != Status::CURRENT && !status.contains(Status::IGNORED)
        }))
    }

    fn deleted_files(&self) -> Result<Vec<String>> {
        let statuses = self.statuses(false)?;

        Ok(statuses
            .iter()
            .filter(|entry| entry.status().contains(Status::WT_DELETED))
            .filter_map(|entry| entry.path().map(String::from))
            .collect())
    }

    fn stage(&mut self, path: &str) -> Result<()> {
        let relative = Path::new(path);
        let on_disk = self
            .repo
            .workdir()
            .map(|workdir| workdir.join(relative).exists())
            .unwrap_or(false);

        let mut index = self.repo.index()?;
        if on_disk {
            index.add_path(relative)?;
        } else {
            index.remove_path(relative)?;
        }
        index.write()?;

        Ok(())
    }

    fn commit(&mut self, message: &str) -> Result<()> {
        let mut index = self.repo.index()?;
        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;
        let signature = self.repo.signature()?;

        let parent = self.head_commit()?;
        let parents: Vec<&Commit<'_>> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)?;

        Ok(())
    }

    fn fetch(&mut self, remote_name: &str, branch: &str) -> Result<()> {
        let mut remote = self.repo.find_remote(remote_name).map_err(|e| {
            GuardedPushError::remote(format!("Cannot find remote '{}': {}", remote_name, e))
        })?;

        let mut fetch_options = FetchOptions::new();
        fetch_options.remote_callbacks(remote_callbacks());

        let refspec = format!("+refs/heads/{0}:refs/remotes/{1}/{0}", branch, remote_name);
        remote
            .fetch(&[refspec.as_str()], Some(&mut fetch_options), None)
            .map_err(|e| {
                GuardedPushError::remote(format!(
                    "Failed to fetch '{}' from '{}': {}",
                    branch, remote_name, e
                ))
            })?;

        Ok(())
    }

    fn stash_save(&mut self, message: &str, include_untracked: bool) -> Result<()> {
        let signature = self.repo.signature()?;
        let flags = if include_untracked {
            StashFlags::INCLUDE_UNTRACKED
        } else {
            StashFlags::DEFAULT
        };

        self.repo
            .stash_save(&signature, message, Some(flags))
            .map_err(|e| GuardedPushError::stash(format!("Cannot save stash: {}", e)))?;

        Ok(())
    }

    fn rebase(&mut self, upstream: &str) -> Result<()> {
        let upstream_ref = self
            .repo
            .find_reference(&format!("refs/remotes/{}", upstream))
            .map_err(|e| {
                GuardedPushError::rebase(format!("Cannot find upstream '{}': {}", upstream, e))
            })?;
        let upstream_oid = upstream_ref.target().ok_or_else(|| {
            GuardedPushError::rebase(format!("Upstream '{}' has no target", upstream))
        })?;

        let head_oid = self
            .head_commit()?
            .map(|commit| commit.id())
            .ok_or_else(|| GuardedPushError::rebase("Cannot rebase a branch with no commits"))?;

        // Already contains upstream: nothing to replay
        if head_oid == upstream_oid || self.repo.graph_descendant_of(head_oid, upstream_oid)? {
            return Ok(());
        }

        let annotated = self.repo.reference_to_annotated_commit(&upstream_ref)?;
        let signature = self.repo.signature()?;
        let mut rebase = self.repo.rebase(None, Some(&annotated), None, None)?;

        while let Some(operation) = rebase.next() {
            let commit_id = operation?.id();

            if self.repo.index()?.has_conflicts() {
                return Err(GuardedPushError::rebase(format!(
                    "Conflict while applying {} onto {}",
                    commit_id, upstream
                )));
            }

            match rebase.commit(None, &signature, None) {
                Ok(_) => {}
                // Patch already present upstream
                Err(e) if e.code() == ErrorCode::Applied => {}
                Err(e) => {
                    return Err(GuardedPushError::rebase(format!(
                        "Cannot commit {} onto {}: {}",
                        commit_id, upstream, e
                    )))
                }
            }
        }

        rebase.finish(Some(&signature))?;

        Ok(())
    }

    fn push(&mut self, remote_name: &str, branch: &str) -> Result<()> {
        let mut remote = self.repo.find_remote(remote_name).map_err(|e| {
            GuardedPushError::remote(format!("Cannot find remote '{}': {}", remote_name, e))
        })?;

        let mut callbacks = remote_callbacks();
        callbacks.push_update_reference(|refname, status| match status {
            Some(status) => Err(git2::Error::from_str(&format!(
                "{} was rejected: {}",
                refname, status
            ))),
            None => Ok(()),
        });

        let mut push_options = PushOptions::new();
        push_options.remote_callbacks(callbacks);

        let refspec = format!("refs/heads/{0}:refs/heads/{0}", branch);
        match remote.push(&[refspec.as_str()], Some(&mut push_options)) {
            Ok(()) => Ok(()),
            Err(e) if e.class() == git2::ErrorClass::Net => Err(GuardedPushError::remote(
                format!("Network error during push: {}", e),
            )),
            Err(e) => Err(GuardedPushError::remote(format!(
                "Failed to push '{}' to '{}': {}",
                branch, remote_name, e
            ))),
        }
    }

    fn stash_pop(&mut self) -> Result<()> {
        self.repo
            .stash_apply(0, None)
            .map_err(|e| GuardedPushError::stash(format!("Cannot apply stash: {}", e)))?;

        // libgit2 reports a conflicting apply as success; keep the entry like `git stash pop`
        if self.repo.index()?.has_conflicts() {
            return Err(GuardedPushError::stash(
                "Stashed changes conflict with the rebased branch; stash entry kept",
            ));
        }

        self.repo
            .stash_drop(0)
            .map_err(|e| GuardedPushError::stash(format!("Cannot drop applied stash: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_unborn_head_has_empty_history() {
        let dir = TempDir::new().unwrap();
        let repo = Git2Repository::from_git2(Git2Repo::init(dir.path()).unwrap());
        assert!(repo.head_history().unwrap().is_empty());
    }
}
