use serde::Serialize;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Where job data comes from; fixed per deployment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataMode {
    /// Live REST backend, admin features available
    Backed,
    /// Bundled read-only `jobs.json`
    Static,
}

impl FromStr for DataMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "backed" | "backend" => Ok(DataMode::Backed),
            "static" => Ok(DataMode::Static),
            other => Err(format!(
                "JOB_BOARD_MODE must be 'backed' or 'static', got '{}'",
                other
            )),
        }
    }
}

impl fmt::Display for DataMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataMode::Backed => write!(f, "backed"),
            DataMode::Static => write!(f, "static"),
        }
    }
}

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    pub mode: DataMode,

    /// Base URL of the REST backend (backed mode)
    pub backend_url: String,

    /// Path or http(s) URL of the bundled jobs file (static mode)
    pub jobs_file: String,

    pub bind_address: String,
    pub port: u16,

    /// Directory for the rolling log files
    pub log_dir: String,

    /// Quiet period before search-as-you-type fires
    pub search_debounce: Duration,

    /// Number of jobs shown on the home page
    pub recent_jobs_limit: usize,

    /// Timeout applied to every backend request
    pub request_timeout: Duration,

    /// Maximum form payload size (in bytes)
    pub max_payload_size: usize,

    /// Visitor sessions unused for this long are dropped
    pub session_idle_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// All variables are optional:
    /// - JOB_BOARD_MODE: `backed` or `static` (default: backed)
    /// - BACKEND_URL: REST backend base URL (default: http://127.0.0.1:5000)
    /// - JOBS_FILE: jobs.json path or URL (default: jobs.json)
    /// - BIND_ADDRESS / PORT: listen address (default: 127.0.0.1:8080)
    /// - LOG_DIR: log directory (default: logs)
    /// - SEARCH_DEBOUNCE_MS: debounce window (default: 300)
    /// - RECENT_JOBS_LIMIT: home page job count (default: 6)
    /// - REQUEST_TIMEOUT_SECS: backend request timeout (default: 10)
    /// - MAX_PAYLOAD_SIZE: form payload limit in bytes (default: 1048576 = 1MB)
    /// - SESSION_IDLE_MINUTES: visitor session lifetime without requests (default: 30)
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        let mode = match env::var("JOB_BOARD_MODE") {
            Ok(raw) => raw.parse()?,
            Err(_) => DataMode::Backed,
        };

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| format!("PORT must be a valid port number, got '{}'", raw))?,
            Err(_) => 8080,
        };

        Ok(Config {
            mode,
            backend_url: env::var("BACKEND_URL").unwrap_or_else(|_| "http://127.0.0.1:5000".to_string()),
            jobs_file: env::var("JOBS_FILE").unwrap_or_else(|_| "jobs.json".to_string()),
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port,
            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
            search_debounce: Duration::from_millis(parse_or("SEARCH_DEBOUNCE_MS", 300)),
            recent_jobs_limit: parse_or("RECENT_JOBS_LIMIT", 6),
            request_timeout: Duration::from_secs(parse_or("REQUEST_TIMEOUT_SECS", 10)),
            max_payload_size: parse_or("MAX_PAYLOAD_SIZE", 1024 * 1024),
            session_idle_timeout: Duration::from_secs(60 * parse_or("SESSION_IDLE_MINUTES", 30)),
        })
    }
}

/// Parse an optional numeric variable with default fallback
fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_mode_parsing() {
        assert_eq!("backed".parse::<DataMode>(), Ok(DataMode::Backed));
        assert_eq!(" Static ".parse::<DataMode>(), Ok(DataMode::Static));
        assert!("sqlite".parse::<DataMode>().is_err());
        assert_eq!(DataMode::Static.to_string(), "static");
    }

    #[test]
    fn numeric_fallback_on_garbage() {
        env::set_var("JOB_BOARD_TEST_GARBAGE", "lots");
        assert_eq!(parse_or("JOB_BOARD_TEST_GARBAGE", 6usize), 6);
        env::set_var("JOB_BOARD_TEST_NUMBER", "12");
        assert_eq!(parse_or("JOB_BOARD_TEST_NUMBER", 6usize), 12);
    }
}
