use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use console::style;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::LevelFilter;

use router_config::{ConfigLoader, ConfigWarning, InstallerBackend, RouterConfig};
use router_core::{CliTarget, Result, RouterError, TargetDirs};
use router_skills::{FsInstaller, ScriptInstaller, SkillInstaller};

mod add;
mod installed;
mod search;

/// Install agent skills from GitHub into Claude Code, Codex CLI and Gemini CLI
#[derive(Parser)]
#[command(name = "skills-router", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config.toml (default: ~/.skills-router/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level override (e.g. debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all log output (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a skill from GitHub
    Add {
        /// GitHub URL or owner/repo/path
        path: String,
        /// Target CLI (claude, codex, gemini)
        #[arg(short, long)]
        cli: Option<CliTarget>,
        /// Skip prompts: install every skill found into the default target
        #[arg(short, long)]
        yes: bool,
        /// Exit with an error if any install fails
        #[arg(long)]
        strict: bool,
    },
    /// Search for skills
    Search {
        /// Search keyword
        keyword: String,
        /// Result page to show
        #[arg(short, long, default_value_t = 1)]
        page: u32,
        /// Results per page (default from config)
        #[arg(long)]
        page_size: Option<u32>,
    },
    /// List installed skills
    List {
        /// CLI type (claude, codex, gemini)
        #[arg(short, long)]
        cli: Option<CliTarget>,
    },
    /// Remove a skill
    Remove {
        /// Skill name to remove
        name: String,
        /// CLI type (claude, codex, gemini)
        #[arg(short, long)]
        cli: Option<CliTarget>,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Show the skills directory of each supported CLI
    Targets,
    /// Show current configuration
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completions for bash, zsh, or fish
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        // Load config first so we can use it for log format
        let config_loader = ConfigLoader::load(self.config.as_deref())?;
        let config = config_loader.get();

        // Resolve log level: --verbose > --quiet > --log-level > config default
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            self.log_level
                .as_deref()
                .unwrap_or(config.logging.level.as_str())
        };
        let filter_level = sanitize_level(log_level);
        init_tracing(filter_level, &config.logging.format);

        if !self.quiet {
            let mut stderr = std::io::stderr();
            let _ = write_config_warnings(&mut stderr, config_loader.warnings());
            // Config and env levels are already covered by validate().
            if filter_level != log_level && self.log_level.is_some() {
                let _ = writeln!(
                    stderr,
                    "{} unknown log level '{log_level}', using '{filter_level}'",
                    style("⚠").yellow()
                );
            }
        }

        match self.command {
            Commands::Add {
                path,
                cli,
                yes,
                strict,
            } => {
                let installer = build_installer(config, config_loader.target_dirs()?)?;
                let args = add::AddArgs {
                    path,
                    cli,
                    yes,
                    strict,
                };
                add::cmd_add(config, installer.as_ref(), args).await
            }
            Commands::Search {
                keyword,
                page,
                page_size,
            } => search::cmd_search(&config.search, &keyword, page, page_size).await,
            Commands::List { cli } => {
                let installer = build_installer(config, config_loader.target_dirs()?)?;
                let target = cli.unwrap_or(config.add.default_target);
                installed::cmd_list(installer.as_ref(), target).await
            }
            Commands::Remove { name, cli, yes } => {
                let installer = build_installer(config, config_loader.target_dirs()?)?;
                let target = cli.unwrap_or(config.add.default_target);
                installed::cmd_remove(installer.as_ref(), target, &name, yes).await
            }
            Commands::Targets => Self::cmd_targets(&config_loader.target_dirs()?),
            Commands::Config { json } => Self::cmd_config(config, config_loader.path(), json),
            Commands::Completions { shell } => Self::cmd_completions(shell),
        }
    }

    fn cmd_targets(dirs: &TargetDirs) -> Result<()> {
        println!("\n{}\n", style("Skill directories:").bold());
        for (target, dir) in dirs.iter() {
            let state = if dir.is_dir() {
                style("present").green()
            } else {
                style("missing").dim()
            };
            println!(
                "  {:<8} {:<12} {}  ({state})",
                target.as_str(),
                target.label(),
                dir.display()
            );
        }
        Ok(())
    }

    fn cmd_config(config: &RouterConfig, path: &Path, json: bool) -> Result<()> {
        if json {
            println!("{}", serde_json::to_string_pretty(config)?);
        } else {
            println!("{}", style(format!("# {}", path.display())).dim());
            println!(
                "{}",
                toml::to_string_pretty(config).map_err(|e| RouterError::Config(e.to_string()))?
            );
        }
        Ok(())
    }

    fn cmd_completions(shell: Shell) -> Result<()> {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "skills-router", &mut std::io::stdout());
        Ok(())
    }
}

/// Install the global tracing subscriber. `RUST_LOG` wins over `level`.
fn init_tracing(level: &str, format: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if format == "json" {
        builder.json().with_target(true).init();
    } else {
        builder.with_target(false).init();
    }
}

/// `level` if it is a level name or a filter directive, else `warn`.
fn sanitize_level(level: &str) -> &str {
    if level.contains('=') || level.parse::<LevelFilter>().is_ok() {
        level
    } else {
        "warn"
    }
}

/// Print config warnings; they are collected before logging exists.
fn write_config_warnings(out: &mut impl Write, warnings: &[ConfigWarning]) -> io::Result<()> {
    for w in warnings {
        writeln!(out, "{}", style(w).yellow())?;
    }
    Ok(())
}

/// The installer backend selected by `installer.backend`.
fn build_installer(config: &RouterConfig, dirs: TargetDirs) -> Result<Box<dyn SkillInstaller>> {
    match config.installer.backend {
        InstallerBackend::Fs => Ok(Box::new(FsInstaller::new(dirs))),
        InstallerBackend::Script => {
            let script = config.installer.script.clone().ok_or_else(|| {
                RouterError::Config("installer.backend = \"script\" requires installer.script".into())
            })?;
            Ok(Box::new(ScriptInstaller::new(
                config.installer.interpreter.clone(),
                script,
            )))
        }
    }
}
