//! These structs provide the CLI interface for the giving-levels CLI.

use clap::Parser;
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// giving-levels: Sorts donors into giving levels and writes the donor lists for the website.
///
/// The program downloads donations and contacts from Salesforce, sums each donor's giving per
/// year and over all time, and writes one CSV report per year plus an all-time report to the
/// `data` directory of the project.
///
/// Salesforce and Slack credentials are read from the environment: OK_WATCH_SALESFORCE_USERNAME,
/// OK_WATCH_SALESFORCE_PASSWORD, OK_WATCH_SALESFORCE_SECURITY_TOKEN and
/// SLACK_THOMASTHOREN_ACCESS_TOKEN. Set GIVING_LEVELS_IN_TEST_MODE to run against built-in sample
/// data instead.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,
}

impl Args {
    pub fn new(common: Common) -> Self {
        Self { common }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }
}

/// Arguments common to all runs.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The project directory. Reports are written to its `data` subdirectory. Defaults to the
    /// current directory.
    #[arg(long, env = "GIVING_LEVELS_PROJECT_DIR", default_value_t = default_project_dir())]
    project_dir: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, project_dir: PathBuf) -> Self {
        Self {
            log_level,
            project_dir: project_dir.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn project_dir(&self) -> &DisplayPath {
        &self.project_dir
    }
}

fn default_project_dir() -> DisplayPath {
    DisplayPath(match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            error!(
                "There was an error when trying to get the current directory: {e}. You can get \
                around this by providing --project-dir or GIVING_LEVELS_PROJECT_DIR.",
            );
            PathBuf::from(".")
        }
    })
}

/// A `PathBuf` that implements `Display` and `FromStr` so that clap can use it as a default
/// value.
#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
