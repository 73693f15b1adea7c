//! Logging Setup
//!
//! Installs the global `tracing` subscriber. The filter comes from `RUST_LOG`
//! when set, otherwise from the verbosity passed on the command line.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

pub const DEFAULT_LOG_FILTER: &str = "polish_env_map=info,tower_http=info";

pub fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let fallback = if verbose {
        "polish_env_map=debug,tower_http=debug"
    } else {
        DEFAULT_LOG_FILTER
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    Registry::default()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()?;

    Ok(())
}
