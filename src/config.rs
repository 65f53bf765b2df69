//! Client configuration

use std::time::Duration;

/// E-utilities search endpoint
pub const SEARCH_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi";

/// Base address of the rendered article pages
pub const ARTICLE_BASE_URL: &str = "https://pubmed.ncbi.nlm.nih.gov/";

/// Environment variable holding an optional NCBI API key
pub const API_KEY_ENV: &str = "NCBI_API_KEY";

pub(crate) static APP_USER_AGENT: &str =
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub search_url: String,
    /// Article pages live at `<article_base_url><id>/`
    pub article_base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
    /// Sent as `api_key` on search requests. Raises the NCBI rate limit.
    pub api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search_url: SEARCH_URL.to_owned(),
            article_base_url: ARTICLE_BASE_URL.to_owned(),
            timeout: Duration::from_secs(30),
            user_agent: APP_USER_AGENT.to_owned(),
            api_key: None,
        }
    }
}

impl Config {
    /// Point both endpoints at a single base address, e.g. a mock server.
    ///
    /// Search goes to `<base>/esearch.fcgi`, articles to `<base>/<id>/`.
    pub fn for_testing(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            search_url: format!("{}/esearch.fcgi", base),
            article_base_url: format!("{}/", base),
            timeout: Duration::from_secs(5),
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = Some(api_key.to_owned());
        self
    }

    pub(crate) fn article_url(&self, id: &str) -> String {
        if self.article_base_url.ends_with('/') {
            format!("{}{}/", self.article_base_url, id)
        } else {
            format!("{}/{}/", self.article_base_url, id)
        }
    }
}
