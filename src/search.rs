//! PubMed identifier search
//!
//! `GET esearch.fcgi?db=pubmed&term={term}&retmode=xml&retmax={n}`
//!
//! Returns PubMed identifiers in relevance order. Only the first page of
//! results is requested.

use crate::{
    client::{PubMed, Query},
    error::{Error, Result},
    utils::{build_request, remote_error},
};
use quick_xml::events::Event;
use tracing::{debug, info};

/// Number of identifiers requested when no bound is given
pub const DEFAULT_MAX_RESULTS: u32 = 10;

/// Query parameters for the identifier search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParam {
    /// Free-text PubMed query, e.g. `cancer treatment`
    term: String,
    /// Upper bound on the number of identifiers returned
    max_results: u32,
}

impl SearchParam {
    pub fn new(term: &str) -> Result<Self> {
        SearchParamBuilder::default().term(term).build()
    }

    pub fn builder() -> SearchParamBuilder {
        SearchParamBuilder::default()
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn max_results(&self) -> u32 {
        self.max_results
    }

    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("db", "pubmed".to_owned()),
            ("term", self.term.clone()),
            ("retmode", "xml".to_owned()),
            ("retmax", self.max_results.to_string()),
        ]
    }
}

/// Builder for the search parameters
#[derive(Debug, Clone, Default)]
pub struct SearchParamBuilder {
    term: Option<String>,
    max_results: Option<u32>,
}

impl SearchParamBuilder {
    pub fn term(&mut self, term: &str) -> &mut Self {
        self.term = Some(term.to_owned());
        self
    }

    pub fn max_results(&mut self, max_results: u32) -> &mut Self {
        self.max_results = Some(max_results);
        self
    }

    pub fn build(&self) -> Result<SearchParam> {
        let term = self
            .term
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::InvalidParameter("query is empty".to_string()))?;
        let max_results = self.max_results.unwrap_or(DEFAULT_MAX_RESULTS);
        if max_results == 0 {
            return Err(Error::InvalidParameter(
                "max_results must be at least 1".to_string(),
            ));
        }
        Ok(SearchParam {
            term: term.to_owned(),
            max_results,
        })
    }
}

impl Query for SearchParam {
    type Response = Vec<String>;

    async fn query(&self, client: &PubMed) -> Result<Self::Response> {
        let url = &client.config().search_url;
        debug!(term = %self.term, retmax = self.max_results, "searching PubMed");
        let resp = build_request(client.client(), url, client.api_key())
            .query(&self.query_pairs())
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(remote_error(url, resp).await);
        }
        let body = resp.text().await?;

        let mut ids = parse_search_response(&body)?;
        ids.truncate(self.max_results as usize);
        info!(term = %self.term, found = ids.len(), "search finished");
        Ok(ids)
    }
}

/// Collect the text of every `<Id>` element, in document order.
///
/// An `<ERROR>` element with no identifiers means the query was rejected.
pub fn parse_search_response(xml: &str) -> Result<Vec<String>> {
    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut ids = Vec::new();
    let mut error: Option<String> = None;
    let mut in_id = false;
    let mut in_error = false;
    let mut saw_root = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                saw_root = true;
                match e.name().as_ref() {
                    b"Id" => in_id = true,
                    b"ERROR" => in_error = true,
                    _ => {}
                }
            }
            Event::Empty(_) => saw_root = true,
            Event::Text(e) if in_id => {
                let id = e.unescape()?.trim().to_owned();
                if !id.is_empty() {
                    ids.push(id);
                }
            }
            Event::Text(e) if in_error => {
                error = Some(e.unescape()?.trim().to_owned());
            }
            Event::End(e) => match e.name().as_ref() {
                b"Id" => in_id = false,
                b"ERROR" => in_error = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err(Error::MalformedResponse(
            "search response has no XML elements".to_string(),
        ));
    }
    if ids.is_empty()
        && let Some(message) = error
    {
        return Err(Error::MalformedResponse(format!(
            "search rejected: {}",
            message
        )));
    }
    Ok(ids)
}
