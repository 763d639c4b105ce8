use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use router_core::CliTarget;
use router_skills::{InstallObserver, InstallOutcome};

/// Spinner for a single long-running step. Hidden when stderr is not a
/// terminal.
pub(crate) fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✔"])
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Prints one line per (skill, target) while a batch install runs.
#[derive(Default)]
pub(crate) struct InstallProgress {
    spinner: Option<ProgressBar>,
}

impl InstallObserver for InstallProgress {
    fn skill_started(&mut self, skill: &str) {
        println!("\n{} {skill}", style("Installing:").bold());
    }

    fn target_started(&mut self, _skill: &str, target: CliTarget) {
        self.spinner = Some(create_spinner(&format!("Installing to {target}...")));
    }

    fn target_finished(&mut self, outcome: &InstallOutcome) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
        match &outcome.result {
            Ok(_) => println!("  {} Installed to {}", style("✔").green(), outcome.target),
            Err(e) => println!(
                "  {} Failed to install to {}: {e}",
                style("✖").red(),
                outcome.target
            ),
        }
    }
}
