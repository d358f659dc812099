use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 5000;
/// Upper bound on `FETCH_MAX_RETRIES`; backoff doubles per attempt.
pub const MAX_FETCH_RETRIES: u32 = 10;
/// `tokio::time::interval` rejects a zero period.
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; LinkPreviewBot/1.0; +https://yourapp.com)";

#[derive(Clone, Debug)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub is_production: bool,
    pub cache_ttl: Duration,
    pub cache_sweep_interval: Duration,
    pub fetch: FetchSettings,
    pub enrich_timeout: Duration,
}

/// Page fetch knobs handed to `PageFetcher`.
#[derive(Clone, Debug)]
pub struct FetchSettings {
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_backoff: Duration,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        FetchSettings {
            timeout: Duration::from_millis(50_000),
            max_retries: 2,
            retry_backoff: Duration::from_secs(1),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Config {
    /// Read configuration from the process environment (after loading `.env`).
    /// Unset or unparseable values fall back to their defaults.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = FetchSettings::default();

        Config {
            server_host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: parse_var("PORT", DEFAULT_PORT),
            is_production: env::var("APP_ENV").as_deref() == Ok("production"),
            cache_ttl: Duration::from_secs(parse_var("CACHE_TTL_SECS", 3600)),
            cache_sweep_interval: Duration::from_secs(parse_var("CACHE_SWEEP_SECS", 600))
                .max(MIN_SWEEP_INTERVAL),
            fetch: FetchSettings {
                timeout: Duration::from_millis(parse_var("FETCH_TIMEOUT_MS", 50_000)),
                max_retries: parse_var("FETCH_MAX_RETRIES", defaults.max_retries)
                    .min(MAX_FETCH_RETRIES),
                retry_backoff: defaults.retry_backoff,
                user_agent: env::var("USER_AGENT").unwrap_or(defaults.user_agent),
            },
            enrich_timeout: Duration::from_secs(parse_var("ENRICH_TIMEOUT_SECS", 10)),
        }
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_var<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
