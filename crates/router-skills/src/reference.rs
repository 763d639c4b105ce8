//! Parsing of user-supplied GitHub references.
//!
//! Accepted forms, tried in order:
//!
//! 1. `https://github.com/<owner>/<repo>/tree/<branch>[/<path>]`: a directory
//! 2. `https://github.com/<owner>/<repo>/blob/<branch>/<path>`: a file
//! 3. `https://github.com/<owner>/<repo>`: the repository root
//! 4. `<owner>/<repo>[/<path>...]`: shorthand, no branch

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use router_core::{Result, RouterError};

/// Branch assumed when the input does not name one.
pub const DEFAULT_BRANCH: &str = "main";

static TREE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"github\.com/([^/?#]+)/([^/?#]+)/tree/([^/?#]+)(?:/([^?#]+))?")
        .expect("static regex")
});

static BLOB_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"github\.com/([^/?#]+)/([^/?#]+)/blob/([^/?#]+)/([^?#]+)")
        .expect("static regex")
});

static REPO_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"github\.com/([^/?#]+)/([^/?#]+)")
        .expect("static regex")
});

/// Whether a reference points at a directory or a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    Dir,
    File,
}

/// A resolved GitHub location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubReference {
    pub owner: String,
    pub repo: String,
    /// Branch named by the input, or [`DEFAULT_BRANCH`].
    pub branch: String,
    /// True only when the branch came from a `/tree/` or `/blob/` URL.
    /// Unpinned references clone the repository's default branch.
    pub branch_pinned: bool,
    /// Path inside the repository, `""` for the root.
    pub path: String,
    pub kind: RefKind,
}

impl GitHubReference {
    /// Resolve a GitHub URL or `owner/repo/path` shorthand.
    pub fn resolve(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(RouterError::invalid_reference(input, "empty input"));
        }

        if input.contains("github.com") {
            return Self::resolve_url(input);
        }
        Self::resolve_shorthand(input)
    }

    fn resolve_url(input: &str) -> Result<Self> {
        for (pattern, kind) in [(&*TREE_URL, RefKind::Dir), (&*BLOB_URL, RefKind::File)] {
            if let Some(caps) = pattern.captures(input) {
                let path = caps.get(4).map(|m| m.as_str()).unwrap_or_default();
                return Self::build(
                    input,
                    &caps[1],
                    &caps[2],
                    Some(&caps[3]),
                    normalize_path(input, path)?,
                    kind,
                );
            }
        }

        if let Some(caps) = REPO_URL.captures(input) {
            return Self::build(input, &caps[1], &caps[2], None, String::new(), RefKind::Dir);
        }

        Err(RouterError::invalid_reference(
            input,
            "expected https://github.com/<owner>/<repo>[/tree/<branch>/<path>]",
        ))
    }

    fn resolve_shorthand(input: &str) -> Result<Self> {
        let parts: Vec<&str> = input.split('/').collect();
        if parts.len() < 2 {
            return Err(RouterError::invalid_reference(
                input,
                "use owner/repo/path or a full GitHub URL",
            ));
        }
        let path = normalize_path(input, &parts[2..].join("/"))?;
        Self::build(input, parts[0], parts[1], None, path, RefKind::Dir)
    }

    fn build(
        input: &str,
        owner: &str,
        repo: &str,
        branch: Option<&str>,
        path: String,
        kind: RefKind,
    ) -> Result<Self> {
        let owner = owner.trim();
        let repo = repo.trim().trim_end_matches(".git");
        if owner.is_empty() || repo.is_empty() {
            return Err(RouterError::invalid_reference(
                input,
                "owner and repository must not be empty",
            ));
        }
        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            branch: branch.unwrap_or(DEFAULT_BRANCH).to_string(),
            branch_pinned: branch.is_some(),
            path,
            kind,
        })
    }

    /// HTTPS clone URL of the repository.
    pub fn clone_url(&self) -> String {
        format!("https://github.com/{}/{}.git", self.owner, self.repo)
    }

    /// Branch to request from `git clone`, if the input pinned one.
    pub fn clone_branch(&self) -> Option<&str> {
        self.branch_pinned.then_some(self.branch.as_str())
    }

    /// Path inside the repository, or `None` for the root.
    pub fn subpath(&self) -> Option<&str> {
        (!self.path.is_empty()).then_some(self.path.as_str())
    }

    /// Directory inside a checkout at which skill lookup should start.
    ///
    /// File references start from the file's parent directory, so a link to
    /// `.../blob/main/skills/fmt/SKILL.md` installs `skills/fmt`.
    pub fn lookup_root(&self, checkout: &Path) -> PathBuf {
        let target = checkout.join(&self.path);
        match self.kind {
            RefKind::File => target
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| checkout.to_path_buf()),
            RefKind::Dir => target,
        }
    }
}

impl FromStr for GitHubReference {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self> {
        Self::resolve(s)
    }
}

impl fmt::Display for GitHubReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)?;
        if self.branch_pinned {
            write!(f, "@{}", self.branch)?;
        }
        if !self.path.is_empty() {
            write!(f, ":{}", self.path)?;
        }
        Ok(())
    }
}

/// Drop empty segments so `a//b/` and `a/b` name the same path.
///
/// `.` and `..` are rejected: the path is joined onto the checkout and must
/// stay inside it.
fn normalize_path(input: &str, path: &str) -> Result<String> {
    let mut segments = Vec::new();
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        if segment == "." || segment == ".." {
            return Err(RouterError::invalid_reference(
                input,
                format!("path segment '{segment}' is not allowed"),
            ));
        }
        segments.push(segment);
    }
    Ok(segments.join("/"))
}
