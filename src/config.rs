use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub enable_file_logs: bool,
    pub log_dir: String,
    pub sled_path: String,
    pub cors_origin: String,
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Frames accepted in a single analysis or append request.
    pub max_frames_per_request: usize,
    /// Frame rate assumed for video batches that omit `fps`.
    pub default_fps: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_frames_per_request: 10_000,
            default_fps: 30.0,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = AnalysisConfig::default();
        let default_fps = env_or_parse("DEFAULT_FPS", defaults.default_fps);
        let default_fps = if default_fps.is_finite() && default_fps > 0.0 {
            default_fps
        } else {
            tracing::warn!(value = default_fps, "DEFAULT_FPS must be positive, using default");
            defaults.default_fps
        };
        let max_frames =
            env_or_parse("MAX_FRAMES_PER_REQUEST", defaults.max_frames_per_request);
        let max_frames = if max_frames > 0 {
            max_frames
        } else {
            tracing::warn!("MAX_FRAMES_PER_REQUEST must be positive, using default");
            defaults.max_frames_per_request
        };

        Self {
            host: env_or_parse("HOST", IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))),
            port: env_or_parse("PORT", 3000_u16),
            log_level: env_or("RUST_LOG", "info"),
            enable_file_logs: env_or_bool("ENABLE_FILE_LOGS", false),
            log_dir: env_or("LOG_DIR", "./logs"),
            sled_path: env_or("SLED_PATH", "./data/posture.sled"),
            cors_origin: env_or("CORS_ORIGIN", "http://localhost:5173"),
            analysis: AnalysisConfig {
                max_frames_per_request: max_frames,
                default_fps,
            },
        }
    }
}

pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_or_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match env::var(key) {
        Ok(raw) => match raw.parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(
                    key,
                    value = %raw,
                    "Failed to parse env var, using default"
                );
                default
            }
        },
        Err(_) => default,
    }
}

pub fn env_or_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Mutex, OnceLock};

    use super::*;

    fn env_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }

    fn managed_keys() -> &'static [&'static str] {
        &[
            "HOST",
            "PORT",
            "RUST_LOG",
            "SLED_PATH",
            "ENABLE_FILE_LOGS",
            "MAX_FRAMES_PER_REQUEST",
            "DEFAULT_FPS",
        ]
    }

    fn clear_keys(keys: &[&str]) {
        for key in keys {
            env::remove_var(key);
        }
    }

    #[test]
    fn loads_defaults_when_missing() {
        let _guard = env_lock().lock().expect("env lock");
        clear_keys(managed_keys());

        let cfg = Config::from_env();
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.sled_path, "./data/posture.sled");
        assert!(!cfg.enable_file_logs);
        assert_eq!(cfg.analysis.max_frames_per_request, 10_000);
        assert_eq!(cfg.analysis.default_fps, 30.0);
    }

    #[test]
    fn parses_numeric_values() {
        let _guard = env_lock().lock().expect("env lock");
        clear_keys(managed_keys());

        env::set_var("PORT", "4000");
        env::set_var("MAX_FRAMES_PER_REQUEST", "250");
        env::set_var("DEFAULT_FPS", "24");

        let cfg = Config::from_env();
        assert_eq!(cfg.port, 4000);
        assert_eq!(cfg.analysis.max_frames_per_request, 250);
        assert_eq!(cfg.analysis.default_fps, 24.0);
        clear_keys(managed_keys());
    }

    #[test]
    fn invalid_values_fall_back() {
        let _guard = env_lock().lock().expect("env lock");
        clear_keys(managed_keys());

        env::set_var("PORT", "bad");
        env::set_var("MAX_FRAMES_PER_REQUEST", "x");
        env::set_var("DEFAULT_FPS", "-5");

        let cfg = Config::from_env();
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.analysis.max_frames_per_request, 10_000);
        assert_eq!(cfg.analysis.default_fps, 30.0);
        clear_keys(managed_keys());
    }

    #[test]
    fn zero_frame_cap_falls_back() {
        let _guard = env_lock().lock().expect("env lock");
        clear_keys(managed_keys());

        env::set_var("MAX_FRAMES_PER_REQUEST", "0");
        env::set_var("DEFAULT_FPS", "0");

        let cfg = Config::from_env();
        assert_eq!(cfg.analysis.max_frames_per_request, 10_000);
        assert_eq!(cfg.analysis.default_fps, 30.0);
        clear_keys(managed_keys());
    }

    #[test]
    fn bool_flags_accept_common_spellings() {
        let _guard = env_lock().lock().expect("env lock");
        clear_keys(managed_keys());

        env::set_var("ENABLE_FILE_LOGS", "on");
        assert!(Config::from_env().enable_file_logs);
        env::set_var("ENABLE_FILE_LOGS", "maybe");
        assert!(!Config::from_env().enable_file_logs);
        clear_keys(managed_keys());
    }
}
