//! # router-cli
//!
//! Command-line interface for skills-router.
//!
//! ## Commands
//!
//! - `skills-router add <path>`: Install skills from a GitHub URL or `owner/repo/path`
//! - `skills-router search <keyword>`: Search the hosted skills index
//! - `skills-router list`: List skills installed for a CLI
//! - `skills-router remove <name>`: Remove an installed skill
//! - `skills-router targets`: Show where each CLI's skills live
//! - `skills-router config`: Show the effective configuration

pub mod commands;
mod progress;

pub use commands::Cli;
