//! # router-config
//!
//! Configuration for skills-router. Reads `~/.skills-router/config.toml`
//! (or an explicit path), then applies environment variable overrides.
//! Every setting has a default, so running without a config file is normal.

pub mod loader;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::{
    AddConfig, CloneConfig, ConfigWarning, InstallerBackend, InstallerConfig, LoggingConfig,
    RouterConfig, SearchConfig, TargetsConfig, WarningSeverity,
};
