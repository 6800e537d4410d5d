use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::config::Config;

const LOG_FILE_PREFIX: &str = "posture-guard";
const MAX_LOG_FILES: usize = 30;

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub log_level: String,
    pub enable_file_logs: bool,
    pub log_dir: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            enable_file_logs: false,
            log_dir: "./logs".to_string(),
        }
    }
}

impl From<&Config> for LogConfig {
    fn from(config: &Config) -> Self {
        Self {
            log_level: config.log_level.clone(),
            enable_file_logs: config.enable_file_logs,
            log_dir: config.log_dir.clone(),
        }
    }
}

/// Install the global subscriber: env-filtered stdout, plus a daily-rolling
/// JSON file under `log_dir` when file logs are enabled.
///
/// Safe to call more than once; later calls leave the first subscriber in place.
/// If the log directory cannot be opened the service keeps logging to stdout.
pub fn init_tracing(config: &LogConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let stdout_layer = fmt::layer().with_target(true).with_thread_ids(false);
    let registry = Registry::default().with(env_filter).with(stdout_layer);

    let mut appender_error = None;
    let file_layer = if config.enable_file_logs {
        match RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix(LOG_FILE_PREFIX)
            .filename_suffix("log")
            .max_log_files(MAX_LOG_FILES)
            .build(&config.log_dir)
        {
            Ok(appender) => Some(
                fmt::layer()
                    .with_writer(appender)
                    .with_ansi(false)
                    .json(),
            ),
            Err(e) => {
                appender_error = Some(e.to_string());
                None
            }
        }
    } else {
        None
    };

    if let Err(e) = registry.with(file_layer).try_init() {
        let msg = e.to_string();
        if !msg.contains("already been set") {
            panic!("Failed to initialize tracing: {e}");
        }
    }

    if let Some(error) = appender_error {
        tracing::warn!(log_dir = %config.log_dir, %error, "File logging disabled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        let cfg = LogConfig::default();
        init_tracing(&cfg);
        init_tracing(&cfg);
    }

    #[test]
    fn file_logs_into_temp_dir() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = LogConfig {
            enable_file_logs: true,
            log_dir: dir.path().to_string_lossy().to_string(),
            ..LogConfig::default()
        };
        init_tracing(&cfg);
    }

    #[test]
    fn log_config_follows_service_config() {
        let mut config = Config::from_env();
        config.enable_file_logs = true;
        config.log_dir = "/var/log/posture".to_string();
        let log = LogConfig::from(&config);
        assert!(log.enable_file_logs);
        assert_eq!(log.log_dir, "/var/log/posture");
    }
}
