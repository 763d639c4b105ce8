use router_core::{CliTarget, TargetDirs};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default endpoint of the hosted skills search API.
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://www.skills-router.com/api/skills";

/// Root configuration, read from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    pub targets: TargetsConfig,
    pub clone: CloneConfig,
    pub installer: InstallerConfig,
    pub search: SearchConfig,
    pub add: AddConfig,
    pub logging: LoggingConfig,
}

// ── Targets ────────────────────────────────────────────────────

/// Per-target overrides of the skills directory. Unset entries use
/// `~/.<tool>/skills`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetsConfig {
    pub claude: Option<PathBuf>,
    pub codex: Option<PathBuf>,
    pub gemini: Option<PathBuf>,
}

impl TargetsConfig {
    fn override_for(&self, target: CliTarget) -> Option<&PathBuf> {
        match target {
            CliTarget::Claude => self.claude.as_ref(),
            CliTarget::Codex => self.codex.as_ref(),
            CliTarget::Gemini => self.gemini.as_ref(),
        }
    }

    /// Build the destination lookup table relative to `home`.
    pub fn resolve(&self, home: &Path) -> TargetDirs {
        CliTarget::ALL
            .into_iter()
            .fold(TargetDirs::from_home(home), |dirs, target| {
                match self.override_for(target) {
                    Some(dir) => dirs.with_override(target, dir.clone()),
                    None => dirs,
                }
            })
    }
}

// ── Clone ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CloneConfig {
    /// Git executable used for shallow clones.
    pub git_binary: String,
    /// `--depth` passed to `git clone`.
    pub depth: u32,
    /// Refuse `owner/repo/path` shorthands (no branch in the input) instead
    /// of cloning the repository's default branch.
    pub require_branch_for_subpath: bool,
}

impl Default for CloneConfig {
    fn default() -> Self {
        Self {
            git_binary: "git".into(),
            depth: 1,
            require_branch_for_subpath: false,
        }
    }
}

// ── Installer ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallerBackend {
    /// Copy and delete files in-process.
    #[default]
    Fs,
    /// Delegate to an external script speaking the JSON dispatch protocol.
    Script,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallerConfig {
    pub backend: InstallerBackend,
    /// Script path for the `script` backend.
    pub script: Option<PathBuf>,
    /// Program that runs the script.
    pub interpreter: String,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            backend: InstallerBackend::Fs,
            script: None,
            interpreter: "python3".into(),
        }
    }
}

// ── Search ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub endpoint: String,
    pub page_size: u32,
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SEARCH_ENDPOINT.into(),
            page_size: 12,
            timeout_secs: 15,
        }
    }
}

// ── Add ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AddConfig {
    /// Target used by `list`/`remove` without `--cli`, and by `add --yes`.
    pub default_target: CliTarget,
    /// Exit non-zero when any (skill, target) install fails.
    pub fail_on_partial: bool,
}

impl Default for AddConfig {
    fn default() -> Self {
        Self {
            default_target: CliTarget::Claude,
            fail_on_partial: false,
        }
    }
}

// ── Logging ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
    /// Output format: "pretty" or "json".
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            format: "pretty".into(),
        }
    }
}

// ── Validation ─────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub field: String,
    pub message: String,
    pub severity: WarningSeverity,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningSeverity {
    Error,
    Warning,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let icon = match self.severity {
            WarningSeverity::Error => "✖",
            WarningSeverity::Warning => "⚠",
        };
        write!(f, "{} {}: {}", icon, self.field, self.message)?;
        if let Some(ref h) = self.hint {
            write!(f, "\n   ↳ {h}")?;
        }
        Ok(())
    }
}

impl RouterConfig {
    /// Validate the config and return a list of warnings.
    /// Returns `Err` with all messages joined if any severity is Error.
    pub fn validate(&self) -> Result<Vec<ConfigWarning>, String> {
        let mut warnings = Vec::new();

        if self.clone.git_binary.trim().is_empty() {
            warnings.push(ConfigWarning {
                field: "clone.git_binary".into(),
                message: "git binary is empty".into(),
                severity: WarningSeverity::Error,
                hint: Some("Set to 'git' or an absolute path".into()),
            });
        }

        if self.clone.depth == 0 {
            warnings.push(ConfigWarning {
                field: "clone.depth".into(),
                message: "depth 0 is not a valid shallow clone depth".into(),
                severity: WarningSeverity::Error,
                hint: Some("Use 1 for the fastest clone".into()),
            });
        }

        if self.installer.backend == InstallerBackend::Script {
            match &self.installer.script {
                None => warnings.push(ConfigWarning {
                    field: "installer.script".into(),
                    message: "script backend selected but no script configured".into(),
                    severity: WarningSeverity::Error,
                    hint: Some("Set installer.script or use backend = \"fs\"".into()),
                }),
                Some(p) if !p.exists() => warnings.push(ConfigWarning {
                    field: "installer.script".into(),
                    message: format!("script {} does not exist", p.display()),
                    severity: WarningSeverity::Warning,
                    hint: None,
                }),
                Some(_) => {}
            }
        }

        if let Err(e) = url::Url::parse(&self.search.endpoint) {
            warnings.push(ConfigWarning {
                field: "search.endpoint".into(),
                message: format!("'{}' is not a valid URL ({e})", self.search.endpoint),
                severity: WarningSeverity::Error,
                hint: None,
            });
        }

        if self.search.page_size == 0 {
            warnings.push(ConfigWarning {
                field: "search.page_size".into(),
                message: "page_size is 0".into(),
                severity: WarningSeverity::Error,
                hint: Some("Set to e.g. 12".into()),
            });
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            warnings.push(ConfigWarning {
                field: "logging.level".into(),
                message: format!("unknown log level '{}'", self.logging.level),
                severity: WarningSeverity::Warning,
                hint: Some(format!("Use one of: {}", valid_levels.join(", "))),
            });
        }

        if !["pretty", "json"].contains(&self.logging.format.as_str()) {
            warnings.push(ConfigWarning {
                field: "logging.format".into(),
                message: format!("unknown log format '{}'", self.logging.format),
                severity: WarningSeverity::Warning,
                hint: Some("Use 'pretty' or 'json'".into()),
            });
        }

        let errors: Vec<String> = warnings
            .iter()
            .filter(|w| w.severity == WarningSeverity::Error)
            .map(|w| format!("{}: {}", w.field, w.message))
            .collect();

        if !errors.is_empty() {
            return Err(format!("Configuration errors:\n  • {}", errors.join("\n  • ")));
        }

        Ok(warnings)
    }
}
