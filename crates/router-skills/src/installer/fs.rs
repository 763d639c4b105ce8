use std::path::{Path, PathBuf};

use async_trait::async_trait;
use router_core::{CliTarget, InstalledSkill, Result, RouterError, TargetDirs};
use tracing::{debug, info, warn};

use super::{SkillInstaller, validate_skill_name};
use crate::descriptor::dir_name;
use crate::locator::is_skill_dir;

/// Installs skills by copying directories on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsInstaller {
    dirs: TargetDirs,
}

impl FsInstaller {
    pub fn new(dirs: TargetDirs) -> Self {
        Self { dirs }
    }

    pub fn target_dir(&self, target: CliTarget) -> &Path {
        self.dirs.get(target)
    }
}

#[async_trait]
impl SkillInstaller for FsInstaller {
    async fn install(&self, source: &Path, target: CliTarget) -> Result<String> {
        if !source.exists() {
            return Err(RouterError::DispatchFailure(format!(
                "Source path does not exist: {}",
                source.display()
            )));
        }
        if !is_skill_dir(source) {
            return Err(RouterError::DispatchFailure(
                "Not a valid skill directory (missing SKILL.md)".into(),
            ));
        }

        let name = dir_name(source);
        validate_skill_name(&name)?;

        let target_dir = self.dirs.get(target);
        std::fs::create_dir_all(target_dir)?;
        let dest = target_dir.join(&name);
        if dest.exists() {
            return Err(RouterError::DispatchFailure(format!(
                "Skill already exists: {name}"
            )));
        }

        if let Err(e) = copy_dir(source, &dest, &mut Vec::new()) {
            // Leave no half-copied skill behind to block the next attempt.
            if let Err(cleanup) = std::fs::remove_dir_all(&dest) {
                warn!(dest = ?dest, error = %cleanup, "failed to remove partial install");
            }
            return Err(e);
        }
        info!(skill = %name, %target, dest = ?dest, "skill installed");
        Ok(format!("Successfully installed skill \"{name}\" to {target}"))
    }

    async fn list(&self, target: CliTarget) -> Result<Vec<InstalledSkill>> {
        let dir = self.dirs.get(target);
        if !dir.exists() {
            debug!(?dir, "skills directory does not exist");
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(dir).map_err(|e| RouterError::access(dir, e))?;
        let mut skills = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| RouterError::access(dir, e))?.path();
            if path.is_dir() && is_skill_dir(&path) {
                skills.push(InstalledSkill {
                    name: dir_name(&path),
                    path,
                });
            }
        }
        skills.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(skills)
    }

    async fn remove(&self, target: CliTarget, name: &str) -> Result<String> {
        validate_skill_name(name)?;

        let path = self.dirs.get(target).join(name);
        if !path.exists() {
            return Err(RouterError::DispatchFailure(format!(
                "Skill not found: {name}"
            )));
        }

        std::fs::remove_dir_all(&path)?;
        info!(skill = %name, %target, "skill removed");
        Ok(format!("Successfully removed skill \"{name}\" from {target}"))
    }
}

/// Recursively copy `src` into a new directory `dest`.
///
/// Symlinks are followed and their targets' contents copied; `.git` is
/// skipped. `ancestors` holds the canonical paths of the directories being
/// copied so a link back into one of them is reported instead of recursing
/// forever.
fn copy_dir(src: &Path, dest: &Path, ancestors: &mut Vec<PathBuf>) -> Result<()> {
    let canonical = src.canonicalize().map_err(|e| RouterError::access(src, e))?;
    if ancestors.contains(&canonical) {
        return Err(RouterError::DispatchFailure(format!(
            "Symlink loop at {}",
            src.display()
        )));
    }
    ancestors.push(canonical);

    std::fs::create_dir_all(dest)?;
    let entries = std::fs::read_dir(src).map_err(|e| RouterError::access(src, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| RouterError::access(src, e))?;
        let from = entry.path();
        let to = dest.join(entry.file_name());
        // `metadata` follows links; a dangling link fails here.
        let meta = std::fs::metadata(&from).map_err(|e| RouterError::access(&from, e))?;

        if meta.is_dir() {
            if entry.file_name() == ".git" {
                continue;
            }
            copy_dir(&from, &to, ancestors)?;
        } else if meta.is_file() {
            std::fs::copy(&from, &to).map_err(|e| RouterError::access(&from, e))?;
        } else {
            debug!(path = ?from, "skipping special file");
        }
    }

    ancestors.pop();
    Ok(())
}
