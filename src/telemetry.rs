use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is not set.
pub fn default_filter(level: &str) -> String {
    format!("fintwin={level},tower_http={level}")
}

/// Installs a stderr subscriber. `RUST_LOG` takes precedence over `level`.
pub fn init_logging(level: &str) -> Result<(), TryInitError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(level)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false),
        )
        .try_init()?;

    tracing::debug!(level, "logging initialized");
    Ok(())
}
