use serde::Deserialize;

/// Main configuration structure for Sitemap-SEO
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Root sitemap URL (the command line argument takes precedence)
    #[serde(rename = "root-url", default)]
    pub root_url: Option<String>,

    /// Maximum number of page fetches in flight at once
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Per-request timeout in seconds
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Apply the concurrency gate to sitemap expansion as well
    #[serde(rename = "gate-expansion", default)]
    pub gate_expansion: bool,

    /// Substring marking a `<loc>` entry as a nested sitemap
    #[serde(rename = "sitemap-marker", default = "default_sitemap_marker")]
    pub sitemap_marker: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            root_url: None,
            concurrency: default_concurrency(),
            request_timeout_secs: default_request_timeout(),
            gate_expansion: false,
            sitemap_marker: default_sitemap_marker(),
        }
    }
}

/// Identity strings sent as `User-Agent`, one picked at random per request
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    #[serde(default = "default_agents")]
    pub agents: Vec<String>,

    /// Fixed seed for reproducible agent selection
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            agents: default_agents(),
            seed: None,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the CSV file receiving one row per visited page
    #[serde(rename = "csv-path", default = "default_csv_path")]
    pub csv_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: default_csv_path(),
        }
    }
}

fn default_concurrency() -> usize {
    10
}

fn default_request_timeout() -> u64 {
    10
}

fn default_sitemap_marker() -> String {
    ".xml".to_string()
}

fn default_csv_path() -> String {
    "scraped_data.csv".to_string()
}

fn default_agents() -> Vec<String> {
    [
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/61.0.3163.100 Safari/537.36",
        "Mozilla/5.0 (Windows NT 6.1; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/61.0.3163.100 Safari/537.36",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_12_6) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/61.0.3163.100 Safari/537.36",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_12_6) AppleWebKit/604.1.38 (KHTML, like Gecko) Version/11.0 Safari/604.1.38",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:56.0) Gecko/20100101 Firefox/56.0",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_13) AppleWebKit/604.1.38 (KHTML, like Gecko) Version/11.0 Safari/604.1.38",
    ]
    .iter()
    .map(|agent| agent.to_string())
    .collect()
}
