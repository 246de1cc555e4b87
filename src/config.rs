use clap::Parser;

/// SportMonks connector with UFP match outcome estimates
#[derive(Parser, Debug, Clone)]
#[command(name = "ufp-connector", version, about)]
pub struct Config {
    /// HTTP listen address
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:5000")]
    pub listen_addr: String,

    /// SportMonks football API base URL
    #[arg(
        long,
        env = "SPORTMONKS_API_URL",
        default_value = "https://api.sportmonks.com/v3/football"
    )]
    pub sportmonks_api_url: String,

    /// SportMonks API token (sent as `api_token` on every call)
    #[arg(long, env = "SPORTMONKS_API_KEY", hide_env_values = true)]
    pub sportmonks_api_key: Option<String>,

    /// Timeout for each upstream call, in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "20")]
    pub request_timeout_secs: u64,

    /// Fixtures resolved concurrently in batch predictions
    #[arg(long, env = "FIXTURE_CONCURRENCY", default_value = "4")]
    pub fixture_concurrency: usize,

    /// Max records kept per pushed-update store (0 = unbounded)
    #[arg(long, env = "LIVE_STORE_CAPACITY", default_value = "0")]
    pub live_store_capacity: usize,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        match self.sportmonks_api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => {}
            _ => anyhow::bail!("SPORTMONKS_API_KEY is required"),
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be positive");
        }
        if self.fixture_concurrency == 0 {
            anyhow::bail!("fixture_concurrency must be at least 1");
        }
        Ok(())
    }

    pub fn api_key(&self) -> &str {
        self.sportmonks_api_key.as_deref().unwrap_or_default()
    }
}
