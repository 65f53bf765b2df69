//! PubMed client

use crate::{
    classify::AffiliationClassifier,
    config::{API_KEY_ENV, Config},
    error::Result,
};
use reqwest::Client;

#[derive(Debug, Clone)]
pub struct PubMed {
    config: Config,
    classifier: AffiliationClassifier,
    client: Client,
}

impl Default for PubMed {
    fn default() -> Self {
        let config = Config::default();
        let client = build_client(&config).unwrap_or_else(|_| Client::new());
        Self {
            config,
            classifier: AffiliationClassifier::default(),
            client,
        }
    }
}

impl PubMed {
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self {
            client: build_client(&config)?,
            config,
            classifier: AffiliationClassifier::default(),
        })
    }

    /// Create a new client with the given NCBI API key
    pub fn with_api_key(api_key: &str) -> Result<Self> {
        Self::new(Config::default().with_api_key(api_key))
    }

    /// Create a new client, picking up `NCBI_API_KEY` when it is set
    pub fn from_env() -> Result<Self> {
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => Self::with_api_key(key.trim()),
            _ => Self::new(Config::default()),
        }
    }

    /// Replace the affiliation rules used when building records
    pub fn with_classifier(mut self, classifier: AffiliationClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn classifier(&self) -> &AffiliationClassifier {
        &self.classifier
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    pub(crate) fn api_key(&self) -> Option<&str> {
        self.config.api_key.as_deref()
    }

    pub async fn query<Q: Query>(&self, query: &Q) -> Result<Q::Response> {
        query.query(self).await
    }
}

/// One request against a PubMed endpoint
pub trait Query {
    type Response;

    fn query(
        &self,
        client: &PubMed,
    ) -> impl std::future::Future<Output = Result<Self::Response>> + Send;
}

fn build_client(config: &Config) -> Result<Client> {
    Ok(Client::builder()
        .timeout(config.timeout)
        .user_agent(config.user_agent.as_str())
        .build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_comes_from_config() {
        let client = PubMed::with_api_key("secret").unwrap();
        assert_eq!(client.api_key(), Some("secret"));

        let client = PubMed::default();
        assert_eq!(client.api_key(), None);
    }

    #[test]
    fn classifier_is_replaceable() {
        let rules = AffiliationClassifier::new(["abbey"], ["brewery"]).unwrap();
        let client = PubMed::default().with_classifier(rules.clone());
        assert_eq!(client.classifier(), &rules);
    }
}
