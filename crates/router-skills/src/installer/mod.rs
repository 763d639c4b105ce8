//! Installer backends.
//!
//! [`SkillInstaller`] is the capability the CLI drives for `add`, `list` and
//! `remove`. [`FsInstaller`] does the work in-process; [`ScriptInstaller`]
//! hands each request to an external program over the JSON dispatch
//! protocol (`<program> <action> '<params json>'` → `{success, data?, error?,
//! message?}` on stdout).

mod fs;
mod script;

use async_trait::async_trait;
use router_core::{CliTarget, InstalledSkill, Result, RouterError};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};

pub use fs::FsInstaller;
pub use script::{ScriptInstaller, parse_response};

/// Install, list and remove skills for a target CLI.
#[async_trait]
pub trait SkillInstaller: Send + Sync {
    /// Copy the skill directory at `source` into `target`'s skills directory.
    /// Returns a human-readable confirmation.
    async fn install(&self, source: &Path, target: CliTarget) -> Result<String>;

    /// Skills currently installed for `target`.
    async fn list(&self, target: CliTarget) -> Result<Vec<InstalledSkill>>;

    /// Delete the skill called `name` from `target`.
    async fn remove(&self, target: CliTarget, name: &str) -> Result<String>;
}

/// One request of the dispatch protocol.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchRequest {
    Install {
        source_path: PathBuf,
        target_cli: CliTarget,
        skill_name: String,
    },
    List {
        cli_type: CliTarget,
    },
    Remove {
        cli_type: CliTarget,
        skill_name: String,
    },
}

impl DispatchRequest {
    /// Action name passed as the first argument.
    pub fn action(&self) -> &'static str {
        match self {
            DispatchRequest::Install { .. } => "install",
            DispatchRequest::List { .. } => "list",
            DispatchRequest::Remove { .. } => "remove",
        }
    }

    /// Parameter object passed as the second argument.
    pub fn params(&self) -> Value {
        match self {
            DispatchRequest::Install {
                source_path,
                target_cli,
                skill_name,
            } => json!({
                "sourcePath": source_path.to_string_lossy(),
                "targetCli": target_cli.as_str(),
                "skillName": skill_name,
            }),
            DispatchRequest::List { cli_type } => json!({ "cliType": cli_type.as_str() }),
            DispatchRequest::Remove {
                cli_type,
                skill_name,
            } => json!({
                "cliType": cli_type.as_str(),
                "skillName": skill_name,
            }),
        }
    }
}

/// Reject names that would escape the target directory.
pub(crate) fn validate_skill_name(name: &str) -> Result<()> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\');
    if bad {
        return Err(RouterError::DispatchFailure(format!(
            "Invalid skill name: '{name}'"
        )));
    }
    Ok(())
}
