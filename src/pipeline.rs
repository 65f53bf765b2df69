//! Search, then fetch each article in turn
//!
//! Requests are issued one at a time in search order. A failed search
//! aborts the run; a failed article is recorded and the batch moves on,
//! unless the pipeline is in fail-fast mode.

use crate::{
    article::ArticleParam,
    client::PubMed,
    error::{Error, Result},
    models::PaperRecord,
    search::SearchParam,
};
use tracing::{info, warn};

/// An identifier whose article could not be fetched
#[derive(Debug, Clone, PartialEq)]
pub struct FetchFailure {
    pub id: String,
    pub error: Error,
}

/// Outcome of one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    /// Identifiers returned by the search, in relevance order
    pub ids: Vec<String>,
    /// One record per fetched article, in the order of `ids`
    pub records: Vec<PaperRecord>,
    /// Identifiers with no article page
    pub skipped: Vec<String>,
    pub failures: Vec<FetchFailure>,
}

impl BatchReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Pipeline<'a> {
    client: &'a PubMed,
    fail_fast: bool,
}

impl<'a> Pipeline<'a> {
    pub fn new(client: &'a PubMed) -> Self {
        Self {
            client,
            fail_fast: false,
        }
    }

    /// Abort on the first article that fails instead of recording it
    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    pub async fn run(&self, param: &SearchParam) -> Result<BatchReport> {
        let ids = self.client.query(param).await?;
        let mut report = BatchReport {
            ids,
            ..BatchReport::default()
        };

        for id in &report.ids {
            match self.fetch(id).await {
                Ok(Some(record)) => report.records.push(record),
                Ok(None) => {
                    warn!(%id, "no article page, skipping");
                    report.skipped.push(id.clone());
                }
                Err(error) if !self.fail_fast => {
                    warn!(%id, %error, "failed to fetch article");
                    report.failures.push(FetchFailure {
                        id: id.clone(),
                        error,
                    });
                }
                Err(error) => return Err(error),
            }
        }

        info!(
            found = report.ids.len(),
            fetched = report.records.len(),
            skipped = report.skipped.len(),
            failed = report.failures.len(),
            "batch finished"
        );
        Ok(report)
    }

    /// Yield records as each article arrives.
    ///
    /// Article failures are yielded as errors and the stream continues, or
    /// ends after the error in fail-fast mode.
    #[cfg(feature = "stream")]
    pub fn stream(
        &self,
        param: SearchParam,
    ) -> impl futures::Stream<Item = Result<PaperRecord>> + '_ {
        async_stream::stream! {
            let ids = match self.client.query(&param).await {
                Ok(ids) => ids,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };
            for id in ids {
                match self.fetch(&id).await {
                    Ok(Some(record)) => yield Ok(record),
                    Ok(None) => warn!(%id, "no article page, skipping"),
                    Err(e) => {
                        yield Err(e);
                        if self.fail_fast {
                            return;
                        }
                    }
                }
            }
        }
    }

    async fn fetch(&self, id: &str) -> Result<Option<PaperRecord>> {
        let param = ArticleParam::new(id)?;
        self.client.query(&param).await
    }
}

impl PubMed {
    pub fn pipeline(&self) -> Pipeline<'_> {
        Pipeline::new(self)
    }

    /// Identifiers matching `term`, at most `max_results` of them
    pub async fn search(&self, term: &str, max_results: u32) -> Result<Vec<String>> {
        let param = SearchParam::builder()
            .term(term)
            .max_results(max_results)
            .build()?;
        self.query(&param).await
    }

    /// Record for a single identifier, `None` if PubMed has no page for it
    pub async fn fetch_paper(&self, id: &str) -> Result<Option<PaperRecord>> {
        self.query(&ArticleParam::new(id)?).await
    }

    /// Search and fetch every hit, recording per-article failures
    pub async fn fetch_papers(&self, term: &str, max_results: u32) -> Result<BatchReport> {
        let param = SearchParam::builder()
            .term(term)
            .max_results(max_results)
            .build()?;
        self.pipeline().run(&param).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_completeness() {
        let mut report = BatchReport::default();
        assert!(report.is_complete());
        report.failures.push(FetchFailure {
            id: "1".to_owned(),
            error: Error::Request("timed out".to_owned()),
        });
        assert!(!report.is_complete());
    }

    #[tokio::test]
    async fn test_invalid_search_fails_before_any_request() {
        let client = PubMed::default();
        let err = client.fetch_papers("  ", 5).await.unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
        let err = client.search("cancer", 0).await.unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
    }
}
