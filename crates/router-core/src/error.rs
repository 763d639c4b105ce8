use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for skills-router.
#[derive(Error, Debug)]
pub enum RouterError {
    // ── Input errors ───────────────────────────────────────────
    #[error("invalid GitHub reference '{input}': {reason}")]
    InvalidReference { input: String, reason: String },

    #[error("unknown CLI target '{0}' (expected one of: claude, codex, gemini)")]
    InvalidTarget(String),

    // ── Repository errors ──────────────────────────────────────
    #[error("failed to clone {url}: {reason}")]
    CloneFailure { url: String, reason: String },

    #[error("path '{0}' does not exist in repository")]
    PathNotFound(String),

    #[error("no skill found in {0}")]
    NoSkillFound(String),

    #[error("cannot read {}: {source}", path.display())]
    Access {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Dispatch errors ────────────────────────────────────────
    #[error("failed to parse installer output. stdout: \"{stdout}\", stderr: \"{stderr}\"")]
    ResponseParse { stdout: String, stderr: String },

    #[error("{0}")]
    DispatchFailure(String),

    // ── Search errors ──────────────────────────────────────────
    #[error("network error: could not reach the API ({0})")]
    Network(String),

    #[error("API error: {status} - {reason}")]
    Api { status: u16, reason: String },

    // ── Interaction errors ─────────────────────────────────────
    #[error("cannot show prompt ({0}); pass --yes or --cli to run non-interactively")]
    Prompt(String),

    // ── Config errors ──────────────────────────────────────────
    #[error("config error: {0}")]
    Config(String),

    // ── Generic wrappers ───────────────────────────────────────
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl RouterError {
    pub fn invalid_reference(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidReference {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub fn access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Access {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, RouterError>;
