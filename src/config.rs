use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Music catalog gateway base URL
    #[serde(default = "default_catalog_api_url")]
    pub catalog_api_url: String,

    /// Media extraction service base URL
    #[serde(default = "default_resolver_api_url")]
    pub resolver_api_url: String,

    /// Directory where library state is persisted as JSON blobs
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_catalog_api_url() -> String {
    "http://localhost:8070".to_string()
}

fn default_resolver_api_url() -> String {
    "http://localhost:8071".to_string()
}

fn default_data_dir() -> String {
    "./data".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8009
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
