use std::path::{Path, PathBuf};
use tracing::{debug, info};

use router_core::{Result, RouterError, TargetDirs};

use crate::schema::{ConfigWarning, InstallerBackend, RouterConfig, WarningSeverity};

/// Loads the skills-router configuration.
///
/// Loading happens before logging is set up, so validation and override
/// warnings are kept on the loader for the caller to report.
pub struct ConfigLoader {
    config: RouterConfig,
    config_path: PathBuf,
    warnings: Vec<ConfigWarning>,
}

impl ConfigLoader {
    /// Resolve the config path: explicit path > SKILLS_ROUTER_CONFIG env > ~/.skills-router/config.toml
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        if let Some(p) = explicit {
            return p.to_path_buf();
        }
        if let Ok(p) = std::env::var("SKILLS_ROUTER_CONFIG") {
            return PathBuf::from(p);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".skills-router")
            .join("config.toml")
    }

    /// Load the config from disk, falling back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = Self::resolve_path(path);
        let config = if config_path.exists() {
            info!(?config_path, "loading configuration");
            let raw = std::fs::read_to_string(&config_path)?;
            Self::parse(&raw).map_err(|e| {
                RouterError::Config(format!("failed to parse {}: {}", config_path.display(), e))
            })?
        } else if path.is_some() {
            // An explicitly requested file must exist.
            return Err(RouterError::Config(format!(
                "config file not found: {}",
                config_path.display()
            )));
        } else {
            debug!(?config_path, "config file not found, using defaults");
            RouterConfig::default()
        };

        let (config, mut warnings) =
            Self::apply_overrides(config, |key| std::env::var(key).ok());
        warnings.extend(config.validate().map_err(RouterError::Config)?);

        Ok(Self {
            config,
            config_path,
            warnings,
        })
    }

    /// Parse TOML text into a config (no env overrides, no validation).
    pub fn parse(raw: &str) -> std::result::Result<RouterConfig, toml::de::Error> {
        toml::from_str::<RouterConfig>(raw)
    }

    pub fn get(&self) -> &RouterConfig {
        &self.config
    }

    pub fn into_config(self) -> RouterConfig {
        self.config
    }

    /// Non-fatal problems found while loading, such as an unknown log level
    /// or an unrecognised installer override.
    pub fn warnings(&self) -> &[ConfigWarning] {
        &self.warnings
    }

    /// Path the config was (or would have been) read from.
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Destination directories for this invocation.
    pub fn target_dirs(&self) -> Result<TargetDirs> {
        let home = dirs::home_dir()
            .ok_or_else(|| RouterError::Config("cannot determine home directory".into()))?;
        Ok(self.config.targets.resolve(&home))
    }

    /// Apply overrides (SKILLS_ROUTER_SEARCH_ENDPOINT, SKILLS_ROUTER_INSTALLER,
    /// SKILLS_ROUTER_SCRIPT, SKILLS_ROUTER_LOG_LEVEL) read through `lookup`.
    pub fn apply_overrides(
        mut config: RouterConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> (RouterConfig, Vec<ConfigWarning>) {
        let mut warnings = Vec::new();

        if let Some(v) = lookup("SKILLS_ROUTER_SEARCH_ENDPOINT") {
            config.search.endpoint = v;
        }
        if let Some(v) = lookup("SKILLS_ROUTER_INSTALLER") {
            match v.to_ascii_lowercase().as_str() {
                "fs" => config.installer.backend = InstallerBackend::Fs,
                "script" => config.installer.backend = InstallerBackend::Script,
                _ => warnings.push(ConfigWarning {
                    field: "SKILLS_ROUTER_INSTALLER".into(),
                    message: format!("ignoring unknown installer backend '{v}'"),
                    severity: WarningSeverity::Warning,
                    hint: Some("Use 'fs' or 'script'".into()),
                }),
            }
        }
        if let Some(v) = lookup("SKILLS_ROUTER_SCRIPT") {
            config.installer.script = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup("SKILLS_ROUTER_LOG_LEVEL") {
            config.logging.level = v;
        }
        debug!(warnings = warnings.len(), "applied environment overrides");
        (config, warnings)
    }
}
