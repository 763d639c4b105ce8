use std::path::{Path, PathBuf};
use std::process::Stdio;

use router_core::{Result, RouterError};
use tempfile::TempDir;
use tracing::{debug, info, warn};

use crate::reference::GitHubReference;

/// Shallow-clones repositories with the `git` binary.
#[derive(Debug, Clone)]
pub struct GitFetcher {
    git_binary: String,
    depth: u32,
}

impl Default for GitFetcher {
    fn default() -> Self {
        Self::new("git", 1)
    }
}

/// A temporary checkout. The directory is deleted when this is dropped.
#[derive(Debug)]
pub struct Checkout {
    root: PathBuf,
    dir: TempDir,
}

impl Checkout {
    /// Root of the working tree (`<tmp>/<repo>`).
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Delete the checkout now, reporting any failure.
    pub fn cleanup(self) -> Result<()> {
        let path = self.dir.path().to_path_buf();
        self.dir.close().map_err(|e| RouterError::access(path, e))
    }
}

impl GitFetcher {
    pub fn new(git_binary: impl Into<String>, depth: u32) -> Self {
        Self {
            git_binary: git_binary.into(),
            depth: depth.max(1),
        }
    }

    /// Clone the repository a reference points to.
    ///
    /// Pinned branches are passed to `git clone --branch`; otherwise the
    /// remote's default branch is checked out.
    pub async fn fetch(&self, reference: &GitHubReference) -> Result<Checkout> {
        self.clone_url(&reference.clone_url(), reference.clone_branch(), &reference.repo)
            .await
    }

    /// Clone `url` into a fresh temporary directory named after `name`.
    pub async fn clone_url(&self, url: &str, branch: Option<&str>, name: &str) -> Result<Checkout> {
        let dir = tempfile::Builder::new()
            .prefix("skills-router-")
            .tempdir()?;
        let root = dir.path().join(name);

        let mut cmd = tokio::process::Command::new(&self.git_binary);
        cmd.arg("clone")
            .arg("--depth")
            .arg(self.depth.to_string())
            .arg("--quiet");
        if let Some(branch) = branch {
            cmd.arg("--branch").arg(branch);
        }
        cmd.arg(url).arg(&root);
        // Never block on a credential prompt for private or missing repos.
        cmd.env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        debug!(%url, ?branch, dest = ?root, "cloning repository");
        let output = cmd.output().await.map_err(|e| RouterError::CloneFailure {
            url: url.to_string(),
            reason: format!("cannot run {}: {e}", self.git_binary),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(%url, status = ?output.status.code(), "git clone failed");
            return Err(RouterError::CloneFailure {
                url: url.to_string(),
                reason: if stderr.is_empty() {
                    format!("git exited with {}", output.status)
                } else {
                    stderr
                },
            });
        }

        info!(%url, dest = ?root, "repository cloned");
        Ok(Checkout { root, dir })
    }
}
