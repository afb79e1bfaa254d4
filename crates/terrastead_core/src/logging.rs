//! Structured logging bootstrap.

use tracing_subscriber::EnvFilter;

/// Installs a global `fmt` subscriber. `RUST_LOG` overrides the default `info` level.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing::subscriber::set_global_default(
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .finish(),
    )
    .ok();
}
