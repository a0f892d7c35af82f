//! Tracing subscriber setup.
//!
//! Filter precedence: `RUST_LOG`, then `[logging] level`, then `warn`.
//! Output goes to stderr so stdout stays clean for `list-symbols`.

use crate::domain::settings::DEFAULT_LOG_LEVEL;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Pick the filter directive from the environment value and the config value.
pub fn filter_directive(env: Option<&str>, config_level: Option<&str>) -> String {
    [env, config_level]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or(DEFAULT_LOG_LEVEL)
        .to_string()
}

/// Install the global subscriber. A second call is a no-op.
pub fn init_logging(config_level: Option<&str>) {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directive = filter_directive(env.as_deref(), config_level);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|e| {
        eprintln!("warning: invalid log filter '{}' ({}), using {}", directive, e, DEFAULT_LOG_LEVEL);
        EnvFilter::new(DEFAULT_LOG_LEVEL)
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}
