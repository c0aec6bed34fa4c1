//! Tracing subscriber setup for relcheck binaries.
//!
//! The library itself only emits `tracing` events; nothing is printed unless
//! the embedding program installs a subscriber, e.g. via [`init_tracing`].

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install a global subscriber writing to stderr.
///
/// `RUST_LOG` takes precedence over `level`. With `json`, lines are emitted
/// as newline-delimited JSON. Only the first call in a process has effect.
pub fn init_tracing(json: bool, level: Level) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let layer = fmt::layer().with_target(false).with_writer(std::io::stderr);
    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer.json())
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer)
            .try_init()
            .ok();
    }
}
