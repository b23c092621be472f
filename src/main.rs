use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use guarded_push::config::{self, Config};
use guarded_push::git::Git2Repository;
use guarded_push::logging::{ConsoleLogger, Level, Logger, Style, STATUS_FAILED, STATUS_OK};
use guarded_push::validation::{check_message, first_violation};
use guarded_push::{GuardedPush, PushSettings};

#[derive(Parser)]
#[command(
    name = "guarded-push",
    version,
    about = "Validate commit messages, then rebase and push the current branch"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, default_value = ".", help = "Path inside the repository")]
    repo: PathBuf,

    #[arg(long, help = "Log level: debug, info, warning, error, critical")]
    log_level: Option<String>,

    #[arg(long, help = "Log style: default or pre-commit")]
    log_style: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Validate history, fetch, stash, rebase, push and unstash (default)
    Push,

    /// Check every commit reachable from HEAD without pushing
    Validate,

    /// Check a single commit message, e.g. from a commit-msg hook
    CheckMessage {
        #[arg(short, long, help = "Read the message from a file")]
        file: Option<PathBuf>,

        #[arg(help = "Message text", conflicts_with = "file")]
        message: Option<String>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = config::load_config(args.config.as_deref()).context("Error loading config")?;
    let logger = build_logger(&args, &config)?;

    let ok = match args.command.unwrap_or(Command::Push) {
        Command::Push => push(&args.repo, &config, &logger)?,
        Command::Validate => validate(&args.repo, &logger)?,
        Command::CheckMessage { file, message } => {
            check_single_message(file, message, &logger)?
        }
    };

    if !ok {
        std::process::exit(1);
    }

    Ok(())
}

fn build_logger(args: &Args, config: &Config) -> Result<ConsoleLogger> {
    let level = match args.log_level.as_deref() {
        Some(level) => level.parse::<Level>()?,
        None => config.logging.level,
    };
    let style = match args.log_style.as_deref() {
        Some(style) => style.parse::<Style>()?,
        None => config.logging.style,
    };

    Ok(ConsoleLogger::new(level, style))
}

fn open_repository(path: &Path) -> Result<Git2Repository> {
    Git2Repository::open(path)
        .with_context(|| format!("Not a git repository: {}", path.display()))
}

fn push(path: &Path, config: &Config, logger: &ConsoleLogger) -> Result<bool> {
    let repo = open_repository(path)?;
    let mut workflow = GuardedPush::new(repo, logger, PushSettings::from(config));

    Ok(workflow.run().is_pushed())
}

fn validate(path: &Path, logger: &ConsoleLogger) -> Result<bool> {
    let repo = open_repository(path)?;

    match first_violation(&repo)? {
        None => {
            logger.info("Commit messages are signed off and conventional", STATUS_OK);
            Ok(true)
        }
        Some(violation) => {
            logger.error_with_reason(
                &format!("Commit {} failed validation", violation.short_hash()),
                STATUS_FAILED,
                &format!("\"{}\": {}", violation.header, violation.failure),
            );
            Ok(false)
        }
    }
}

fn check_single_message(
    file: Option<PathBuf>,
    message: Option<String>,
    logger: &ConsoleLogger,
) -> Result<bool> {
    let text = match (file, message) {
        (Some(path), _) => fs::read_to_string(&path)
            .with_context(|| format!("Cannot read message file {}", path.display()))?,
        (None, Some(message)) => message,
        (None, None) => anyhow::bail!("Provide a message or --file"),
    };

    match check_message(&text).failure {
        None => {
            logger.info("Commit message is valid", STATUS_OK);
            Ok(true)
        }
        Some(failure) => {
            logger.error_with_reason(
                "Commit message validation failed",
                STATUS_FAILED,
                &failure.to_string(),
            );
            Ok(false)
        }
    }
}
