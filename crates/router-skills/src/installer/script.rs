use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use router_core::{CliTarget, DispatchResponse, InstalledSkill, Result, RouterError};
use tracing::debug;

use super::{DispatchRequest, SkillInstaller, validate_skill_name};
use crate::descriptor::dir_name;

/// Delegates every operation to an external installer script.
#[derive(Debug, Clone)]
pub struct ScriptInstaller {
    interpreter: String,
    script: PathBuf,
}

impl ScriptInstaller {
    pub fn new(interpreter: impl Into<String>, script: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
            script: script.into(),
        }
    }

    /// Run one request and return the successful response envelope.
    ///
    /// Waits for the script to exit, then parses its complete stdout.
    pub async fn dispatch(&self, request: &DispatchRequest) -> Result<DispatchResponse> {
        if !self.script.exists() {
            return Err(RouterError::DispatchFailure(format!(
                "Installer script not found at: {}",
                self.script.display()
            )));
        }

        let params = serde_json::to_string(&request.params())?;
        debug!(action = request.action(), %params, script = ?self.script, "dispatching");

        let output = tokio::process::Command::new(&self.interpreter)
            .arg(&self.script)
            .arg(request.action())
            .arg(&params)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                RouterError::DispatchFailure(format!(
                    "Installer process error ({}): {e}",
                    self.interpreter
                ))
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!(status = ?output.status.code(), "installer exited");

        parse_response(&stdout, &stderr)?.into_result()
    }
}

/// Parse an installer's stdout as a [`DispatchResponse`].
///
/// Anything that is not a single JSON envelope is a
/// [`RouterError::ResponseParse`] carrying both output streams.
pub fn parse_response(stdout: &str, stderr: &str) -> Result<DispatchResponse> {
    serde_json::from_str::<DispatchResponse>(stdout.trim()).map_err(|_| {
        RouterError::ResponseParse {
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        }
    })
}

#[async_trait]
impl SkillInstaller for ScriptInstaller {
    async fn install(&self, source: &Path, target: CliTarget) -> Result<String> {
        let request = DispatchRequest::Install {
            source_path: source.to_path_buf(),
            target_cli: target,
            skill_name: dir_name(source),
        };
        let resp = self.dispatch(&request).await?;
        Ok(resp
            .message
            .unwrap_or_else(|| format!("Installed to {target}")))
    }

    async fn list(&self, target: CliTarget) -> Result<Vec<InstalledSkill>> {
        let resp = self
            .dispatch(&DispatchRequest::List { cli_type: target })
            .await?;
        match resp.data {
            Some(data) => serde_json::from_value(data).map_err(|e| RouterError::ResponseParse {
                stdout: format!("unexpected list payload: {e}"),
                stderr: String::new(),
            }),
            None => Ok(Vec::new()),
        }
    }

    async fn remove(&self, target: CliTarget, name: &str) -> Result<String> {
        validate_skill_name(name)?;
        let resp = self
            .dispatch(&DispatchRequest::Remove {
                cli_type: target,
                skill_name: name.to_string(),
            })
            .await?;
        Ok(resp
            .message
            .unwrap_or_else(|| "Skill removed successfully".into()))
    }
}
