use crate::config::{AppConfig, AppEnvironment};
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("'{value}' is not a usable log filter")]
    Filter { value: String, source: ParseError },
    #[error("failed to install tracing subscriber: {0}")]
    Init(Box<dyn std::error::Error + Send + Sync>),
}

/// Installs the global tracing subscriber. `RUST_LOG` wins when set;
/// otherwise the configured level applies. Development keeps targets and
/// color for local reading, the other tiers emit compact ansi-free lines
/// for log collectors.
pub fn init(config: &AppConfig) -> Result<(), TelemetryError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.telemetry.log_level).map_err(|source| {
            TelemetryError::Filter {
                value: config.telemetry.log_level.clone(),
                source,
            }
        })?,
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match config.environment {
        AppEnvironment::Development => builder.with_target(true).try_init(),
        AppEnvironment::Test | AppEnvironment::Production => builder
            .with_target(false)
            .compact()
            .with_ansi(false)
            .try_init(),
    }
    .map_err(TelemetryError::Init)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CatalogConfig, ServerConfig, TelemetryConfig};

    #[test]
    fn rejects_unparseable_log_filter() {
        std::env::remove_var("RUST_LOG");
        let config = AppConfig {
            environment: AppEnvironment::Test,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            telemetry: TelemetryConfig {
                log_level: "propfinder=notalevel".to_string(),
            },
            catalog: CatalogConfig::default(),
        };

        let error = init(&config).expect_err("filter should not parse");
        assert!(matches!(error, TelemetryError::Filter { .. }));
    }
}
