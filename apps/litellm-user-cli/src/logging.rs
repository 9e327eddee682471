//! Logging setup. Everything goes to stderr; stdout carries command output.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogFormat, LoggingConfig};

/// Filter directive for a `-v` count, falling back to the configured level.
fn directive(config: &LoggingConfig, verbose: u8) -> &str {
    match verbose {
        0 => &config.level,
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. `RUST_LOG` takes precedence over both
/// the config file and `-v`.
pub fn init_logging(config: &LoggingConfig, verbose: u8) {
    let wanted = directive(config, verbose);
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(wanted))
        .unwrap_or_else(|e| {
            eprintln!("invalid log filter {wanted:?}: {e}; using \"warn\"");
            EnvFilter::new("warn")
        });

    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init(),
    };
    if let Err(e) = result {
        eprintln!("logging already initialized: {e}");
    }
}
