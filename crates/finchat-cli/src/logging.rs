//! Logging and tracing setup

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber
///
/// Honors `RUST_LOG` when set; otherwise defaults to warnings only so log
/// lines do not interleave with the chat transcript.
pub fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "info" } else { "warn" };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
