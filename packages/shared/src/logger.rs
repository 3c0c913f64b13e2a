//! Tracing subscriber setup shared by the server and client binaries.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence when set; otherwise the given binary is
/// enabled at `default_level`, along with `tower_http`.
pub fn setup_logger(name: &str, default_level: &str) {
    // Module targets use underscores even when the binary name does not
    let target = name.replace('-', "_");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{target}={default_level},tower_http={default_level}"))
    });

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
