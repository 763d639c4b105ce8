use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Result, RouterError};

/// An AI assistant CLI whose skills directory we install into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CliTarget {
    Claude,
    Codex,
    Gemini,
}

impl CliTarget {
    /// Every target, in prompt order.
    pub const ALL: [CliTarget; 3] = [CliTarget::Claude, CliTarget::Codex, CliTarget::Gemini];

    pub fn as_str(&self) -> &'static str {
        match self {
            CliTarget::Claude => "claude",
            CliTarget::Codex => "codex",
            CliTarget::Gemini => "gemini",
        }
    }

    /// Human-readable product name used in prompts.
    pub fn label(&self) -> &'static str {
        match self {
            CliTarget::Claude => "Claude Code",
            CliTarget::Codex => "Codex CLI",
            CliTarget::Gemini => "Gemini CLI",
        }
    }

    /// Position in [`CliTarget::ALL`].
    const fn index(self) -> usize {
        match self {
            CliTarget::Claude => 0,
            CliTarget::Codex => 1,
            CliTarget::Gemini => 2,
        }
    }

    /// Dot-directory under `$HOME` owned by the tool.
    fn config_dir_name(&self) -> &'static str {
        match self {
            CliTarget::Claude => ".claude",
            CliTarget::Codex => ".codex",
            CliTarget::Gemini => ".gemini",
        }
    }

    /// Skills directory for this target relative to `home`.
    pub fn skills_dir_in(&self, home: &Path) -> PathBuf {
        home.join(self.config_dir_name()).join("skills")
    }
}

impl fmt::Display for CliTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CliTarget {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "claude" => Ok(CliTarget::Claude),
            "codex" => Ok(CliTarget::Codex),
            "gemini" => Ok(CliTarget::Gemini),
            _ => Err(RouterError::InvalidTarget(s.to_string())),
        }
    }
}

/// Lookup table from target to destination directory.
///
/// Built once per invocation from the user's home directory; individual
/// entries may be overridden (config file, tests).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDirs {
    dirs: [PathBuf; 3],
}

impl TargetDirs {
    /// Standard layout under the given home directory.
    pub fn from_home(home: &Path) -> Self {
        Self {
            dirs: CliTarget::ALL.map(|t| t.skills_dir_in(home)),
        }
    }

    /// Standard layout under the invoking user's home directory.
    pub fn from_user_home() -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| RouterError::Config("cannot determine home directory".into()))?;
        Ok(Self::from_home(&home))
    }

    /// Replace the directory for one target.
    pub fn with_override(mut self, target: CliTarget, dir: PathBuf) -> Self {
        self.dirs[target.index()] = dir;
        self
    }

    pub fn get(&self, target: CliTarget) -> &Path {
        &self.dirs[target.index()]
    }

    /// All (target, directory) pairs in prompt order.
    pub fn iter(&self) -> impl Iterator<Item = (CliTarget, &Path)> {
        CliTarget::ALL.into_iter().zip(self.dirs.iter().map(PathBuf::as_path))
    }
}
