use std::{io, str::FromStr};
use tracing_subscriber::{fmt, EnvFilter};

use crate::CommonError;

/// Output layout for the tracing subscriber.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(CommonError::UnknownLogFormat(other.to_string())),
        }
    }
}

/// Initialize tracing subscriber with sensible defaults and stdout writer.
/// - Respects `RUST_LOG` if set
/// - Falls back to `info`
pub fn init_logging_default() {
    init_logging(LogFormat::Compact, "info");
}

/// Initialize tracing subscriber with JSON structured output.
/// - Respects `RUST_LOG` if set, defaults to `info` with debug for the store
pub fn init_logging_json() {
    init_logging(LogFormat::Json, "info,service::repository=debug");
}

/// Initialize tracing with an explicit layout; `default_filter` applies only
/// when `RUST_LOG` is unset or unparsable.
///
/// Safe to call more than once: later calls are ignored.
pub fn init_logging(format: LogFormat, default_filter: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    let builder = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stdout);
    let _ = match format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
