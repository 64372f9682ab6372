//! Tracing subscriber setup.
//!
//! Logs go to stderr: stdout is reserved for the saved image path.

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;

const FALLBACK_DIRECTIVE: &str = "info";

/// Install the global subscriber. Returns `false` if one was already set.
pub fn init_logging(config: &LoggingConfig) -> bool {
    let builder = fmt::Subscriber::builder()
        .with_env_filter(build_filter(config))
        .with_writer(std::io::stderr)
        .with_target(true);

    let installed = if config.json {
        tracing::subscriber::set_global_default(builder.json().finish()).is_ok()
    } else {
        let subscriber = builder
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .finish();
        tracing::subscriber::set_global_default(subscriber).is_ok()
    };

    if installed {
        tracing::debug!(level = %config.level, json = config.json, "Logging initialized");
    }
    installed
}

/// `RUST_LOG` wins; otherwise the configured level, or `info` if it does not parse.
fn build_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new(FALLBACK_DIRECTIVE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_level_falls_back() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = LoggingConfig {
            level: "lasso=loudest".to_string(),
            json: false,
        };
        assert_eq!(build_filter(&config).to_string(), FALLBACK_DIRECTIVE);
    }
}
