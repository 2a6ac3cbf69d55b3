//! Subscriber setup driven by `DOCENT_LOG` and `DOCENT_LOG_FORMAT`.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Filter used when `DOCENT_LOG` is unset or invalid.
const DEFAULT_FILTER: &str = "warn,docent=info";

/// Tracing output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingFormat {
    /// Human-readable colored output.
    Pretty,
    /// Compact single-line output (default).
    #[default]
    Compact,
    /// JSON structured output for log aggregation.
    Json,
}

impl TracingFormat {
    /// Parses `pretty`, `compact` or `json`, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" => Some(Self::Pretty),
            "compact" => Some(Self::Compact),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Installs the global subscriber. Logs go to stderr so stdout carries only
/// the answer.
pub fn init() {
    let env_filter = std::env::var("DOCENT_LOG")
        .ok()
        .and_then(|filter| EnvFilter::try_new(filter).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER));
    let format = std::env::var("DOCENT_LOG_FORMAT")
        .ok()
        .and_then(|value| TracingFormat::parse(&value))
        .unwrap_or_default();

    // try_init().ok() ignores errors if already initialized
    match format {
        TracingFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_writer(std::io::stderr),
                )
                .try_init()
                .ok();
        }
        TracingFormat::Compact => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .compact()
                        .with_writer(std::io::stderr),
                )
                .try_init()
                .ok();
        }
        TracingFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .try_init()
                .ok();
        }
    }
}
