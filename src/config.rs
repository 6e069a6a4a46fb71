use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Path of the CSV catalog loaded at startup
    #[serde(default = "default_catalog_csv")]
    pub catalog_csv: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Movies per page when listing without an explicit page size
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,

    /// Rated-neighbor window used when wiring similarity edges
    #[serde(default = "default_graph_window")]
    pub graph_window: usize,

    /// Largest rating gap that still counts as similar
    #[serde(default = "default_graph_rating_threshold")]
    pub graph_rating_threshold: f64,

    /// Maximum number of suggestions returned per request
    #[serde(default = "default_recommend_cap")]
    pub recommend_cap: usize,
}

fn default_catalog_csv() -> String {
    "db/data.csv".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_page_size() -> usize {
    20
}

fn default_graph_window() -> usize {
    crate::services::graph_builder::DEFAULT_WINDOW
}

fn default_graph_rating_threshold() -> f64 {
    crate::services::graph_builder::DEFAULT_RATING_THRESHOLD
}

fn default_recommend_cap() -> usize {
    20
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_csv: default_catalog_csv(),
            host: default_host(),
            port: default_port(),
            default_page_size: default_page_size(),
            graph_window: default_graph_window(),
            graph_rating_threshold: default_graph_rating_threshold(),
            recommend_cap: default_recommend_cap(),
        }
    }
}
