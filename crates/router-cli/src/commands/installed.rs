use console::style;
use dialoguer::{Confirm, theme::ColorfulTheme};
use router_core::{CliTarget, Result};
use router_skills::SkillInstaller;

use crate::progress::create_spinner;

pub(super) async fn cmd_list(installer: &dyn SkillInstaller, target: CliTarget) -> Result<()> {
    let spinner = create_spinner(&format!("Loading skills for {target}..."));
    let listed = installer.list(target).await;
    spinner.finish_and_clear();
    let skills = listed?;

    println!(
        "\n{}\n",
        style(format!("Installed Skills ({target}):")).bold()
    );
    if skills.is_empty() {
        println!("{}", style("  No skills installed.").yellow());
    } else {
        for (i, skill) in skills.iter().enumerate() {
            println!("  {}. {}", i + 1, style(&skill.name).cyan());
            println!("     {}", style(skill.path.display()).dim());
        }
    }
    println!("\nTotal: {} skill(s)", skills.len());
    Ok(())
}

pub(super) async fn cmd_remove(
    installer: &dyn SkillInstaller,
    target: CliTarget,
    name: &str,
    yes: bool,
) -> Result<()> {
    if !yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Remove skill \"{name}\" from {target}?"))
            .default(false)
            .interact()
            .unwrap_or(false);
        if !confirmed {
            println!("{}", style("Operation cancelled").yellow());
            return Ok(());
        }
    }

    let spinner = create_spinner(&format!("Removing skill \"{name}\" from {target}..."));
    let removed = installer.remove(target, name).await;
    spinner.finish_and_clear();
    let message = removed?;

    println!("{} {message}", style("✔").green());
    Ok(())
}
