// src/telemetry.rs

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;


/// Install the global tracing subscriber. `RUST_LOG` wins over the configured level.
pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => fmt().json().with_env_filter(filter).init(),
        _ => fmt().with_env_filter(filter).init(),
    }
}
