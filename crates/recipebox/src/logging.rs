//! Logging configuration for recipebox.
//!
//! Diagnostics are emitted with `tracing` and always written to stderr, so
//! they never interleave with command output such as `export --output -`.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding a filter that overrides the verbosity flags.
///
/// Checked before `RUST_LOG`, so recipebox can be tuned without affecting
/// other programs that read the generic variable.
pub const LOG_ENV_VAR: &str = "RECIPEBOX_LOG";

/// Verbosity level for logging output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Warnings and above.
    #[default]
    Normal,
    /// Debug and above: storage opens, migrations, per-recipe writes.
    Verbose,
    /// Everything, including the spans around each store operation.
    Trace,
}

impl Verbosity {
    /// Map the `-q` flag and the `-v` count onto a level. `-q` wins.
    #[must_use]
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        match (quiet, verbose) {
            (true, _) => Self::Quiet,
            (false, 0) => Self::Normal,
            (false, 1) => Self::Verbose,
            (false, _) => Self::Trace,
        }
    }

    /// Convert verbosity to tracing level filter.
    #[must_use]
    pub fn to_level_filter(&self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::WARN,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Filter directive scoping this level to the recipebox crate.
    #[must_use]
    pub fn directive(&self) -> String {
        format!("recipebox={}", self.to_level_filter())
    }
}

/// Build the filter for `verbosity`, letting a non-empty `override_directives`
/// replace it. Invalid override directives fall back to the verbosity level.
#[must_use]
pub fn build_filter(verbosity: Verbosity, override_directives: Option<&str>) -> EnvFilter {
    override_directives
        .map(str::trim)
        .filter(|directives| !directives.is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(verbosity.directive()))
}

/// Initialize the logging system.
///
/// Call once at startup. The level comes from `verbosity` unless
/// `RECIPEBOX_LOG` (or, failing that, `RUST_LOG`) is set.
///
/// # Examples
///
/// ```no_run
/// use recipebox::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::Verbose);
/// ```
pub fn init_logging(verbosity: Verbosity) {
    let override_directives = std::env::var(LOG_ENV_VAR)
        .or_else(|_| std::env::var(EnvFilter::DEFAULT_ENV))
        .ok();
    let env_filter = build_filter(verbosity, override_directives.as_deref());

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(verbosity == Verbosity::Trace)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false),
    );

    // Ignore the error if a subscriber is already installed.
    let _ = subscriber.try_init();
}

/// Initialize logging for tests.
///
/// Only warnings and errors are shown to keep test output clean.
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}
