use std::path::PathBuf;

use router_core::{CliTarget, RouterError};
use tracing::warn;

use crate::descriptor::dir_name;
use crate::installer::SkillInstaller;

/// What a partially failed `add` should do with the exit status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Report failures per target; the run still succeeds.
    #[default]
    ReportOnly,
    /// Any failed (skill, target) pair fails the run.
    FailOnAny,
}

/// Result of installing one skill into one target.
#[derive(Debug)]
pub struct InstallOutcome {
    pub skill: String,
    pub source: PathBuf,
    pub target: CliTarget,
    pub result: Result<String, RouterError>,
}

impl InstallOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Progress callbacks for [`install_all`].
pub trait InstallObserver {
    fn skill_started(&mut self, _skill: &str) {}
    fn target_started(&mut self, _skill: &str, _target: CliTarget) {}
    fn target_finished(&mut self, _outcome: &InstallOutcome) {}
}

/// Observer that ignores every event.
pub struct Silent;

impl InstallObserver for Silent {}

/// Every outcome of a batch, in dispatch order.
#[derive(Debug, Default)]
pub struct InstallSummary {
    pub outcomes: Vec<InstallOutcome>,
}

impl InstallSummary {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = &InstallOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    /// Whether the batch counts as a success under `policy`.
    pub fn is_ok(&self, policy: FailurePolicy) -> bool {
        match policy {
            FailurePolicy::ReportOnly => true,
            FailurePolicy::FailOnAny => self.failed() == 0,
        }
    }
}

/// Install each skill into each target, one dispatch at a time.
///
/// Skills are processed in the given order and, for each skill, targets in
/// the given order. A failed dispatch is recorded and the batch continues.
pub async fn install_all(
    installer: &dyn SkillInstaller,
    skills: &[PathBuf],
    targets: &[CliTarget],
    observer: &mut dyn InstallObserver,
) -> InstallSummary {
    let mut summary = InstallSummary::default();

    for source in skills {
        let skill = dir_name(source);
        observer.skill_started(&skill);

        for &target in targets {
            observer.target_started(&skill, target);
            let result = installer.install(source, target).await;
            if let Err(ref e) = result {
                warn!(%skill, %target, error = %e, "install failed");
            }
            let outcome = InstallOutcome {
                skill: skill.clone(),
                source: source.clone(),
                target,
                result,
            };
            observer.target_finished(&outcome);
            summary.outcomes.push(outcome);
        }
    }

    summary
}
