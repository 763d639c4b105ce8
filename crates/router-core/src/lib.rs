//! # router-core
//!
//! Shared types for skills-router: the CLI target enumeration, installer
//! result envelopes, and the error type every crate returns.

pub mod error;
pub mod target;
pub mod types;

pub use error::{Result, RouterError};
pub use target::{CliTarget, TargetDirs};
pub use types::{DispatchResponse, InstalledSkill};
