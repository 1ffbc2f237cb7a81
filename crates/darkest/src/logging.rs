//! Log output setup.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` isn't set.
pub const DEFAULT_FILTER: &str = "info";

/// Installs the global `tracing` subscriber: human-readable console output
/// filtered by `RUST_LOG` (or [`DEFAULT_FILTER`]).
///
/// Call once at startup. Later calls are ignored.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let console = fmt::layer().with_target(true).with_level(true);

    // `try_init` fails only if a subscriber is already installed.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_does_not_panic() {
        init();
        init();
    }
}
