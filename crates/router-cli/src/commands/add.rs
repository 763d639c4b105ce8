use std::path::{Path, PathBuf};

use console::style;
use dialoguer::{MultiSelect, theme::ColorfulTheme};
use router_config::RouterConfig;
use router_core::{CliTarget, Result, RouterError};
use router_skills::{
    FailurePolicy, GitFetcher, GitHubReference, InstallSummary, SkillDescriptor, SkillInstaller,
    find_all, find_first, install_all,
};
use tracing::{debug, warn};

use crate::progress::{InstallProgress, create_spinner};

pub(super) struct AddArgs {
    pub path: String,
    pub cli: Option<CliTarget>,
    pub yes: bool,
    pub strict: bool,
}

/// Skills located in a checkout, before any prompt.
#[derive(Debug, PartialEq)]
enum Discovered {
    /// Exactly one candidate; installed without asking.
    Single(PathBuf),
    /// Several candidates; the user picks.
    Several(Vec<PathBuf>),
}

pub(super) async fn cmd_add(
    config: &RouterConfig,
    installer: &dyn SkillInstaller,
    args: AddArgs,
) -> Result<()> {
    let reference = GitHubReference::resolve(&args.path)?;
    check_branch_policy(&reference, config.clone.require_branch_for_subpath)?;
    debug!(%reference, "resolved reference");

    let fetcher = GitFetcher::new(&config.clone.git_binary, config.clone.depth);
    let spinner = create_spinner("Cloning repository...");
    let fetched = fetcher.fetch(&reference).await;
    spinner.finish_and_clear();
    let checkout = fetched?;
    println!("{} Repository cloned", style("✔").green());

    let result = install_from(checkout.root(), &reference, config, installer, &args).await;

    // The checkout goes away whether or not the installs succeeded.
    if let Err(e) = checkout.cleanup() {
        warn!(error = %e, "failed to remove temporary checkout");
    }
    result
}

async fn install_from(
    root: &Path,
    reference: &GitHubReference,
    config: &RouterConfig,
    installer: &dyn SkillInstaller,
    args: &AddArgs,
) -> Result<()> {
    let skills = match discover(root, reference)? {
        Discovered::Single(dir) => vec![dir],
        Discovered::Several(dirs) => select_skills(dirs, args.yes)?,
    };
    if skills.is_empty() {
        println!("{}", style("No skills selected").yellow());
        return Ok(());
    }
    println!("{} Found {} skill(s)", style("✔").green(), skills.len());

    let targets = select_targets(args.cli, args.yes, config.add.default_target)?;
    if targets.is_empty() {
        println!("{}", style("No CLI selected").yellow());
        return Ok(());
    }

    let mut progress = InstallProgress::default();
    let summary = install_all(installer, &skills, &targets, &mut progress).await;

    let policy = if args.strict || config.add.fail_on_partial {
        FailurePolicy::FailOnAny
    } else {
        FailurePolicy::ReportOnly
    };
    finish(&summary, policy)
}

/// Refuse unpinned subpaths when the config asks for it.
fn check_branch_policy(reference: &GitHubReference, require_branch: bool) -> Result<()> {
    if require_branch && reference.subpath().is_some() && !reference.branch_pinned {
        return Err(RouterError::invalid_reference(
            &reference.to_string(),
            "a subpath needs an explicit branch; use https://github.com/<owner>/<repo>/tree/<branch>/<path>",
        ));
    }
    Ok(())
}

/// Locate the skill(s) a reference names inside a checkout.
///
/// With a subpath, the first skill reachable from it is used. Without one,
/// every skill in the repository is a candidate.
fn discover(root: &Path, reference: &GitHubReference) -> Result<Discovered> {
    match reference.subpath() {
        Some(sub) => {
            if !root.join(sub).exists() {
                return Err(RouterError::PathNotFound(sub.to_string()));
            }
            let start = reference.lookup_root(root);
            if !start.is_dir() {
                return Err(RouterError::NoSkillFound(sub.to_string()));
            }
            find_first(&start)?
                .map(Discovered::Single)
                .ok_or_else(|| RouterError::NoSkillFound(sub.to_string()))
        }
        None => {
            let mut found = find_all(root)?;
            match found.len() {
                0 => Err(RouterError::NoSkillFound(reference.to_string())),
                1 => Ok(Discovered::Single(found.remove(0))),
                _ => Ok(Discovered::Several(found)),
            }
        }
    }
}

fn select_skills(dirs: Vec<PathBuf>, yes: bool) -> Result<Vec<PathBuf>> {
    if yes {
        return Ok(dirs);
    }

    let items: Vec<String> = dirs
        .iter()
        .map(|dir| skill_label(&SkillDescriptor::load(dir)))
        .collect();

    let picked = prompt_answer(
        MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt("Select skills to install (Space to select, Enter to confirm)")
            .items(items.as_slice())
            .interact(),
    )?;

    Ok(picked.into_iter().map(|i| dirs[i].clone()).collect())
}

/// Prompt line for one skill: install name, then the declared name when it
/// differs, then the description.
fn skill_label(skill: &SkillDescriptor) -> String {
    let dir_name = skill.dir_name();
    let mut label = dir_name.clone();
    if skill.name != dir_name {
        label.push_str(&format!(" ({})", skill.name));
    }
    if !skill.description.is_empty() {
        label.push_str(&format!("  {}", style(&skill.description).dim()));
    }
    label
}

/// Targets fixed by flags, or `None` when the user has to be asked.
fn preset_targets(cli: Option<CliTarget>, yes: bool, default: CliTarget) -> Option<Vec<CliTarget>> {
    match (cli, yes) {
        (Some(target), _) => Some(vec![target]),
        (None, true) => Some(vec![default]),
        (None, false) => None,
    }
}

fn select_targets(cli: Option<CliTarget>, yes: bool, default: CliTarget) -> Result<Vec<CliTarget>> {
    if let Some(targets) = preset_targets(cli, yes, default) {
        return Ok(targets);
    }

    let labels: Vec<&str> = CliTarget::ALL.iter().map(|t| t.label()).collect();
    let defaults: Vec<bool> = CliTarget::ALL.iter().map(|t| *t == default).collect();

    let picked = prompt_answer(
        MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt("Select target CLI(s)")
            .items(labels.as_slice())
            .defaults(&defaults)
            .interact(),
    )?;
    Ok(picked.into_iter().map(|i| CliTarget::ALL[i]).collect())
}

/// A prompt that could not be shown (no terminal) aborts the command rather
/// than guessing an answer.
fn prompt_answer<T>(answer: dialoguer::Result<T>) -> Result<T> {
    answer.map_err(|e| RouterError::Prompt(e.to_string()))
}

fn finish(summary: &InstallSummary, policy: FailurePolicy) -> Result<()> {
    let total = summary.outcomes.len();
    let failed = summary.failed();

    if failed == 0 {
        println!(
            "\n{}",
            style("✓ All operations completed successfully!").green()
        );
    } else {
        println!(
            "\n{}",
            style(format!(
                "⚠ {} of {total} install(s) succeeded, {failed} failed",
                summary.succeeded()
            ))
            .yellow()
        );
    }

    if summary.is_ok(policy) {
        Ok(())
    } else {
        Err(RouterError::DispatchFailure(format!(
            "{failed} of {total} install(s) failed"
        )))
    }
}
