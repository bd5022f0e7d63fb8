//! Turns on structured logging for programs and test binaries that drive the unification engine.
//!
//! `TVAR_LOG` holds an [EnvFilter directive](https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html#directives),
//! e.g. `TVAR_LOG=tvar_unify=trace`. Logs go to stderr unless `TVAR_LOGTO=<filepath>` names a
//! file, which is truncated first.
//!
//! Log through the macros re-exported here instead of depending on `tracing` directly, so the
//! logging backend can be swapped in one place.
//!
//! Nothing is logged in release builds.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer};

pub use tracing::{debug, trace};

const FILTER_VAR: &str = "TVAR_LOG";
const LOGTO_VAR: &str = "TVAR_LOGTO";

/// Installs logging for the rest of the process and evaluates to the [`TracingGuards`], which
/// must be kept alive until logging is done.
///
/// Does nothing in release builds.
#[macro_export]
macro_rules! setup_tracing {
    () => {
        if cfg!(debug_assertions) {
            $crate::setup_tracing()
        } else {
            $crate::TracingGuards::NONE
        }
    };
}

/// Where log lines are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

impl LogTarget {
    pub fn from_env() -> Self {
        Self::from_logto(std::env::var_os(LOGTO_VAR))
    }

    /// An unset or empty `TVAR_LOGTO`, or one that names no file, means stderr.
    fn from_logto(value: Option<OsString>) -> Self {
        match value {
            Some(path) if Path::new(&path).file_name().is_some() => {
                LogTarget::File(PathBuf::from(path))
            }
            _ => LogTarget::Stderr,
        }
    }
}

/// Keeps the background log writer alive. Dropping it flushes and stops file logging.
#[must_use]
pub struct TracingGuards {
    _file_writer: Option<WorkerGuard>,
}

impl TracingGuards {
    pub const NONE: TracingGuards = TracingGuards { _file_writer: None };
}

/// Installs logging to the target named by `TVAR_LOGTO`.
pub fn setup_tracing() -> TracingGuards {
    setup_tracing_to(LogTarget::from_env())
}

/// Installs logging to `target`. Only the first call in a process takes effect, so every test
/// in a binary may call this.
pub fn setup_tracing_to(target: LogTarget) -> TracingGuards {
    let filter = EnvFilter::from_env(FILTER_VAR);

    match target {
        LogTarget::Stderr => {
            let layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(filter);

            let _ = tracing_subscriber::registry().with(layer).try_init();

            TracingGuards::NONE
        }
        LogTarget::File(path) => {
            let _ = std::fs::remove_file(&path);

            let directory = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => Path::new("."),
            };
            let file_name = path.file_name().unwrap_or(path.as_os_str());

            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(filter);

            let _ = tracing_subscriber::registry().with(layer).try_init();

            TracingGuards {
                _file_writer: Some(guard),
            }
        }
    }
}
