use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Format selector read from the environment.
const FORMAT_ENV: &str = "XSM_LOG_FORMAT";

/// Install the global subscriber. Logs go to stderr so stdout stays clean
/// for command output.
///
/// `RUST_LOG` wins when set. Otherwise quiet mode shows warnings and errors
/// only, verbose mode adds info. `XSM_LOG_FORMAT=json` emits JSON lines.
/// Calling this twice is harmless.
pub fn init_logging(quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(quiet)));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if json_requested(std::env::var(FORMAT_ENV).ok().as_deref()) {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .flatten_event(true),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false),
            )
            .try_init()
    };

    if let Err(e) = result {
        tracing::debug!(event = "core.logging.already_initialized", error = %e);
    }
}

fn default_directive(quiet: bool) -> &'static str {
    if quiet { "warn" } else { "info" }
}

fn json_requested(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case("json"))
}
