//! # router-skills
//!
//! Everything between a user's `add` argument and files landing in a
//! target's skills directory:
//!
//! - [`reference`] turns a GitHub URL or `owner/repo/path` into a
//!   [`GitHubReference`]
//! - [`fetch`] shallow-clones it into a temporary [`Checkout`]
//! - [`locator`] finds directories containing `SKILL.md`
//! - [`installer`] copies, lists and removes skills per [`CliTarget`]
//!   (in-process or through an external script)
//! - [`batch`] runs one install per (skill, target) pair and collects the
//!   outcomes
//!
//! [`CliTarget`]: router_core::CliTarget

pub mod batch;
pub mod descriptor;
pub mod fetch;
pub mod installer;
pub mod locator;
pub mod reference;

pub use batch::{FailurePolicy, InstallObserver, InstallOutcome, InstallSummary, install_all};
pub use descriptor::SkillDescriptor;
pub use fetch::{Checkout, GitFetcher};
pub use installer::{DispatchRequest, FsInstaller, ScriptInstaller, SkillInstaller};
pub use locator::{SKILL_MARKER, find_all, find_first, is_skill_dir};
pub use reference::{GitHubReference, RefKind};
