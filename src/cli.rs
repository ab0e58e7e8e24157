use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{ArgAction, Parser, ValueHint};
use log::LevelFilter;

use crate::formatters::OutputFormat;
use crate::vcs::{GitBackend, ServiceOptions};

mod run_impl;

pub use run_impl::dispatch;

#[allow(clippy::struct_excessive_bools)]
#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "commit-scan",
    version,
    about = "Show the diff of a git commit, or analyze each new commit as a post-commit hook",
    long_about = None
)]
pub struct Args {
    /// Path to git repository (default: discovered from the current directory)
    #[arg(
        long = "repo",
        value_name = "PATH",
        value_hint = ValueHint::DirPath,
        value_parser = parse_repo_path
    )]
    pub repo: Option<PathBuf>,

    /// Specific commit to analyze: hash, tag, branch or any git revision (default: latest)
    #[arg(long = "commit", value_name = "REV")]
    pub commit: Option<String>,

    /// Run in git hook mode: analyze the latest commit and save a snapshot
    #[arg(long = "hook", action = ArgAction::SetTrue)]
    pub hook: bool,

    /// Output JSON
    #[arg(long = "json", action = ArgAction::SetTrue, conflicts_with = "markdown")]
    pub json: bool,

    /// Output Markdown
    #[arg(long = "markdown", action = ArgAction::SetTrue, conflicts_with = "json")]
    pub markdown: bool,

    /// Summary only: hide patch text
    #[arg(long = "stat", action = ArgAction::SetTrue)]
    pub stat: bool,

    /// Directory for hook-mode snapshots (default: <git-dir>/commit-scan)
    #[arg(
        long = "report-dir",
        value_name = "DIR",
        env = "COMMIT_SCAN_REPORT_DIR",
        value_hint = ValueHint::DirPath
    )]
    pub report_dir: Option<PathBuf>,

    /// Install a post-commit hook that runs this tool in hook mode
    #[arg(long = "install-hook", action = ArgAction::SetTrue, conflicts_with_all = ["hook", "commit"])]
    pub install_hook: bool,

    /// Overwrite a post-commit hook not installed by this tool
    #[arg(long = "force", action = ArgAction::SetTrue, requires = "install_hook")]
    pub force: bool,

    /// Verbose logging (-v debug, -vv trace)
    #[arg(long = "verbose", short = 'v', action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(long = "quiet", short = 'q', action = ArgAction::SetTrue, conflicts_with = "verbose")]
    pub quiet: bool,
}

// clap's stock PathBuf parser rejects "", which we treat as "discover".
fn parse_repo_path(s: &str) -> Result<PathBuf, std::convert::Infallible> {
    Ok(PathBuf::from(s))
}

impl Args {
    /// Explicit repository path; an empty value means "discover".
    pub fn repo_path(&self) -> Option<&Path> {
        self.repo
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }

    /// Requested revision; an empty value means "latest".
    pub fn commit_rev(&self) -> Option<&str> {
        self.commit.as_deref().filter(|c| !c.is_empty())
    }

    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else if self.markdown {
            OutputFormat::Markdown
        } else {
            OutputFormat::Text
        }
    }

    pub fn service_options(&self) -> ServiceOptions {
        ServiceOptions {
            format: self.output_format(),
            stat_only: self.stat,
            report_dir: self.report_dir.clone(),
        }
    }

    fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Warn;
        }
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

/// Log lines go to stderr; `RUST_LOG` overrides the flag-derived level.
fn init_logging(args: &Args) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(args.log_level())
        .format_target(false)
        .parse_default_env();
    let _ = builder.try_init();
}

/// Runs the CLI application.
///
/// # Errors
/// Returns an error if repository discovery or the selected mode fails.
pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(&args);
    let backend = GitBackend {
        options: args.service_options(),
    };
    dispatch(&args, &backend)
}
