use anyhow::{Result, anyhow};
use fileops_config::constants::logging::{DEFAULT_FILTER, ENV_FILTER_VAR};
use once_cell::sync::Lazy;
use tracing_subscriber::EnvFilter;

static TRACING: Lazy<()> = Lazy::new(|| {
    if let Err(err) = initialize_tracing() {
        tracing::warn!(error = %err, "tracing already initialized; skipping component tracing setup");
    }
});

/// Install the stderr subscriber once per instance.
pub fn init() {
    Lazy::force(&TRACING);
}

/// `FILEOPS_LOG` wins over `RUST_LOG`; neither set means `warn`.
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(ENV_FILTER_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn initialize_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|err| anyhow!(err))
}
