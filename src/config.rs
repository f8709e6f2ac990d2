use std::env;

pub const DEFAULT_DATA_SOURCE: &str = "data/sample.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_source: String,
    pub http_timeout_secs: u64,
    pub fetch_max_retries: usize,
    pub fetch_retry_delay_ms: u64,
    pub default_result_count: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_source: DEFAULT_DATA_SOURCE.to_string(),
            http_timeout_secs: 60,
            fetch_max_retries: 3,
            fetch_retry_delay_ms: 500,
            default_result_count: 10,
        }
    }
}

impl Config {
    /// Every setting is optional; unset or unparsable values use the defaults
    pub fn from_env() -> Self {
        Config {
            data_source: env::var("SOLAR_DATA_SOURCE")
                .unwrap_or_else(|_| DEFAULT_DATA_SOURCE.to_string()),
            http_timeout_secs: env::var("SOLAR_HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap_or(60),
            fetch_max_retries: env::var("SOLAR_FETCH_MAX_RETRIES")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .unwrap_or(3),
            fetch_retry_delay_ms: env::var("SOLAR_FETCH_RETRY_DELAY_MS")
                .unwrap_or_else(|_| "500".to_string())
                .parse()
                .unwrap_or(500),
            default_result_count: env::var("SOLAR_DEFAULT_RESULT_COUNT")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
        }
    }
}
