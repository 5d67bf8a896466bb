mod config;
mod data;
mod practice;
mod report;

use std::fmt;
use std::io;
use std::path::PathBuf;

use services::{Clock, GoalTracker, PracticeLoopService};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::data::StudyData;

#[derive(Debug, PartialEq, Eq)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownCommand(String),
    UnknownArg(String),
    InvalidLimit { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidLimit { raw } => write!(f, "invalid --limit value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  study stats    [--data <file.json>] [--config <file.toml>]");
    eprintln!("  study practice [--data <file.json>] [--config <file.toml>] [--limit <n>]");
    eprintln!();
    eprintln!("Without --data the built-in sample goals and exercises are used.");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  STUDY_DATA, STUDY_CONFIG, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Stats,
    Practice,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "stats" => Some(Self::Stats),
            "practice" => Some(Self::Practice),
            _ => None,
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    data: Option<PathBuf>,
    config: Option<PathBuf>,
    limit: Option<usize>,
}

impl Args {
    fn from_env() -> Self {
        Self {
            data: std::env::var_os("STUDY_DATA").map(PathBuf::from),
            config: std::env::var_os("STUDY_CONFIG").map(PathBuf::from),
            limit: None,
        }
    }

    fn parse(
        mut self,
        cmd: Command,
        args: &mut impl Iterator<Item = String>,
    ) -> Result<Self, ArgsError> {
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--data" => self.data = Some(require_value(args, "--data")?.into()),
                "--config" => self.config = Some(require_value(args, "--config")?.into()),
                "--limit" if cmd == Command::Practice => {
                    let value = require_value(args, "--limit")?;
                    let parsed: usize = value
                        .parse()
                        .ok()
                        .filter(|limit| *limit > 0)
                        .ok_or_else(|| ArgsError::InvalidLimit { raw: value.clone() })?;
                    self.limit = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(self)
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Split off the subcommand; `None` means usage was asked for.
///
/// No subcommand shows the dashboard.
fn take_command(argv: &mut Vec<String>) -> Result<Option<Command>, ArgsError> {
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Stats,
        Some("--help" | "-h") => return Ok(None),
        Some(first) if first.starts_with("--") => Command::Stats,
        Some(first) => {
            Command::from_arg(first).ok_or_else(|| ArgsError::UnknownCommand(first.to_string()))?
        }
    };
    if argv.first().is_some_and(|first| !first.starts_with("--")) {
        argv.remove(0);
    }
    Ok(Some(cmd))
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // The error itself is printed by `main`.
    let Some(cmd) = take_command(&mut argv).inspect_err(|_| print_usage())? else {
        print_usage();
        return Ok(());
    };
    let parsed = Args::from_env()
        .parse(cmd, &mut argv.into_iter())
        .inspect_err(|_| print_usage())?;

    init_tracing();

    let settings = config::load_settings(parsed.config.as_deref())?;
    let data = StudyData::load(parsed.data.as_deref())?;
    info!(
        goals = data.goals.len(),
        achievements = data.achievements.len(),
        exercises = data.exercises.len(),
        sample = parsed.data.is_none(),
        "study data loaded"
    );

    let clock = Clock::default_clock();
    match cmd {
        Command::Stats => {
            let tracker = GoalTracker::new(data.goals, data.achievements)
                .with_clock(clock)
                .with_settings(settings);
            report::write_stats(&mut io::stdout().lock(), &tracker, &data.exercises)?;
        }
        Command::Practice => {
            let service = PracticeLoopService::new(clock, settings);
            practice::run_practice(
                &service,
                data.exercises,
                parsed.limit,
                io::stdin().lock(),
                io::stdout().lock(),
            )?;
        }
    }

    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
