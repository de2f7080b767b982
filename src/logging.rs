//! Stderr logging for native hosts and tests.
//!
//! `RUST_LOG` overrides the default filter; `SUI_CONNECT_LOG_JSON=1`
//! switches to one JSON object per line.

use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_JSON_ENV: &str = "SUI_CONNECT_LOG_JSON";

const DEFAULT_DIRECTIVE: &str = "sui_connect=info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl LogFormat {
    pub fn from_env() -> Self {
        Self::parse(std::env::var(LOG_JSON_ENV).ok().as_deref())
    }

    fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("1") | Some("true") => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}

/// Install the global subscriber in the format chosen by the environment.
/// Returns false when one was already installed.
pub fn init_logging() -> bool {
    init_logging_with(LogFormat::from_env())
}

pub fn init_logging_with(format: LogFormat) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let installed = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };
    installed.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_only_when_asked_for() {
        assert_eq!(LogFormat::parse(Some("1")), LogFormat::Json);
        assert_eq!(LogFormat::parse(Some(" true ")), LogFormat::Json);
        assert_eq!(LogFormat::parse(Some("0")), LogFormat::Compact);
        assert_eq!(LogFormat::parse(None), LogFormat::Compact);
    }

    #[test]
    fn second_install_is_refused() {
        init_logging_with(LogFormat::Compact);
        assert!(!init_logging_with(LogFormat::Json));
    }
}
