use anyhow::{Context, Result};
use config::Config;
use serde::Deserialize;

const DEFAULT_ORIGIN: &str = "https://www.drugs.com";
const DEFAULT_SEARCH_PATH: &str = "/search.php?searchterm=";
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";
const DEFAULT_BIND: &str = "0.0.0.0:3000";

/// Runtime settings. Every field can be overridden with a `MEDSCRAPE_*`
/// environment variable, e.g. `MEDSCRAPE_TIMEOUT_SECS=20`.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub site_origin: String,
    pub search_path: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub bind_addr: String,
    pub concurrency: usize,
}

impl Settings {
    pub fn load() -> Result<Self> {
        let settings = Config::builder()
            .set_default("site_origin", DEFAULT_ORIGIN)?
            .set_default("search_path", DEFAULT_SEARCH_PATH)?
            .set_default("timeout_secs", 10_i64)?
            .set_default("user_agent", DEFAULT_USER_AGENT)?
            .set_default("bind_addr", DEFAULT_BIND)?
            .set_default("concurrency", 4_i64)?
            .add_source(config::Environment::with_prefix("MEDSCRAPE").try_parsing(true))
            .build()
            .context("Failed to read MEDSCRAPE_* settings")?;
        settings
            .try_deserialize()
            .context("Invalid MEDSCRAPE_* settings")
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            site_origin: DEFAULT_ORIGIN.to_string(),
            search_path: DEFAULT_SEARCH_PATH.to_string(),
            timeout_secs: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            bind_addr: DEFAULT_BIND.to_string(),
            concurrency: 4,
        }
    }
}
