//! Article details from the rendered PubMed page
//!
//! `GET https://pubmed.ncbi.nlm.nih.gov/{id}/`
//!
//! The page is scraped, not parsed against a schema: every field is
//! optional and falls back to a placeholder when its element is missing.

use std::{collections::HashMap, sync::LazyLock};

use crate::{
    classify::AffiliationClassifier,
    client::{PubMed, Query},
    error::{Error, Result},
    models::{AuthorAffiliation, NO_TITLE, NOT_AVAILABLE, PaperRecord, join_or_not_available},
    utils::{build_request, clean_text, is_not_found, remote_error},
};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("static selector is valid CSS")
}

static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("h1.heading-title"));
static CITATION: LazyLock<Selector> = LazyLock::new(|| selector("div.article-citation"));
static CITATION_TEXT: LazyLock<Selector> = LazyLock::new(|| selector("span.cit"));
static AUTHORS: LazyLock<Selector> = LazyLock::new(|| selector("div.authors"));
static AUTHOR_ITEM: LazyLock<Selector> = LazyLock::new(|| selector("span.authors-list-item"));
static AUTHOR_NAME: LazyLock<Selector> = LazyLock::new(|| selector("a.full-name"));
static AUTHOR_KEY: LazyLock<Selector> = LazyLock::new(|| selector("a.affiliation-link"));
static AFFILIATIONS: LazyLock<Selector> = LazyLock::new(|| selector("div.expanded-authors"));
static AFFILIATION_ITEM: LazyLock<Selector> = LazyLock::new(|| selector("li"));
static FOOTNOTE_KEY: LazyLock<Selector> = LazyLock::new(|| selector("sup.key"));
static EMAIL: LazyLock<Selector> = LazyLock::new(|| selector("a.corresponding-author-email"));

/// Request for a single article page
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleParam {
    id: String,
}

impl ArticleParam {
    pub fn new(id: &str) -> Result<Self> {
        let id = id.trim();
        if id.is_empty() || id.contains('/') {
            return Err(Error::InvalidParameter(format!(
                "invalid PubMed identifier: {:?}",
                id
            )));
        }
        Ok(Self { id: id.to_owned() })
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Query for ArticleParam {
    /// `None` when PubMed has no page for the identifier
    type Response = Option<PaperRecord>;

    async fn query(&self, client: &PubMed) -> Result<Self::Response> {
        let url = client.config().article_url(&self.id);
        debug!(id = %self.id, %url, "fetching article page");
        let resp = build_request(client.client(), &url, None).send().await?;
        let status = resp.status();
        if is_not_found(status) {
            debug!(id = %self.id, "article page not found");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(remote_error(&url, resp).await);
        }
        let html = resp.text().await?;

        let page = ArticlePage::parse(&html);
        Ok(Some(page.into_record(&self.id, client.classifier())))
    }
}

/// An author entry from the authors list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorEntry {
    pub name: String,
    /// Footnote keys pointing at the affiliation list, e.g. `["1", "3"]`
    pub keys: Vec<String>,
}

/// An affiliation list item with its footnote marker removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffiliationEntry {
    pub key: Option<String>,
    pub text: String,
}

/// Fields scraped from one article page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticlePage {
    pub title: Option<String>,
    pub citation: Option<String>,
    pub authors: Vec<AuthorEntry>,
    pub affiliations: Vec<AffiliationEntry>,
    pub corresponding_email: Option<String>,
}

impl ArticlePage {
    pub fn parse(html: &str) -> Self {
        let document = Html::parse_document(html);
        let root = document.root_element();

        let title = first_text(root, &TITLE);

        let citation = root
            .select(&CITATION)
            .next()
            .and_then(|section| first_text(section, &CITATION_TEXT));

        let authors = root
            .select(&AUTHORS)
            .next()
            .map(parse_authors)
            .unwrap_or_default();

        let affiliations = root
            .select(&AFFILIATIONS)
            .next()
            .map(parse_affiliations)
            .unwrap_or_default();

        let corresponding_email = root.select(&EMAIL).next().and_then(|link| {
            let text = element_text(link);
            if !text.is_empty() {
                return Some(text);
            }
            link.value()
                .attr("href")
                .map(|href| href.trim_start_matches("mailto:").trim().to_owned())
                .filter(|email| !email.is_empty())
        });

        Self {
            title,
            citation,
            authors,
            affiliations,
            corresponding_email,
        }
    }

    /// Pair each author with their affiliation text.
    ///
    /// When both lists carry footnote keys, authors are matched to the
    /// affiliations their keys point at; an author with several keys yields
    /// several pairs. Otherwise the lists are zipped by position and the
    /// longer list's tail is dropped.
    pub fn pairs(&self) -> Vec<AuthorAffiliation> {
        let keyed_authors = self.authors.iter().any(|a| !a.keys.is_empty());
        let keyed_affiliations: HashMap<&str, &str> = self
            .affiliations
            .iter()
            .filter_map(|a| a.key.as_deref().map(|key| (key, a.text.as_str())))
            .collect();

        if keyed_authors && !keyed_affiliations.is_empty() {
            let keyed = &keyed_affiliations;
            return self
                .authors
                .iter()
                .flat_map(move |author| {
                    author.keys.iter().filter_map(move |key| {
                        keyed
                            .get(key.as_str())
                            .map(|text| AuthorAffiliation::new(&author.name, text))
                    })
                })
                .collect();
        }

        if self.authors.len() != self.affiliations.len() {
            debug!(
                authors = self.authors.len(),
                affiliations = self.affiliations.len(),
                "author and affiliation counts differ, pairing by position"
            );
        }
        self.authors
            .iter()
            .zip(&self.affiliations)
            .map(|(author, affiliation)| AuthorAffiliation::new(&author.name, &affiliation.text))
            .collect()
    }

    pub fn into_record(self, id: &str, classifier: &AffiliationClassifier) -> PaperRecord {
        let classification = classifier.partition(&self.pairs());
        PaperRecord {
            pubmed_id: id.to_owned(),
            title: self.title.unwrap_or_else(|| NO_TITLE.to_owned()),
            publication_date: self.citation.unwrap_or_else(|| NOT_AVAILABLE.to_owned()),
            non_academic_authors: join_or_not_available(&classification.non_academic_authors),
            company_affiliations: join_or_not_available(&classification.company_affiliations),
            corresponding_email: self
                .corresponding_email
                .unwrap_or_else(|| NOT_AVAILABLE.to_owned()),
        }
    }
}

fn parse_authors(container: ElementRef<'_>) -> Vec<AuthorEntry> {
    container
        .select(&AUTHOR_ITEM)
        .filter_map(|item| {
            let name = first_text(item, &AUTHOR_NAME)?;
            let keys = item
                .select(&AUTHOR_KEY)
                .map(element_text)
                .filter(|key| !key.is_empty())
                .collect();
            Some(AuthorEntry { name, keys })
        })
        .collect()
}

fn parse_affiliations(container: ElementRef<'_>) -> Vec<AffiliationEntry> {
    container
        .select(&AFFILIATION_ITEM)
        .map(|item| {
            let key = first_text(item, &FOOTNOTE_KEY);
            let mut parts = Vec::new();
            text_without(item, &FOOTNOTE_KEY, &mut parts);
            AffiliationEntry {
                key,
                text: clean_text(parts),
            }
        })
        .collect()
}

fn first_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty())
}

fn element_text(element: ElementRef<'_>) -> String {
    clean_text(element.text())
}

/// Collect text nodes under `element`, skipping subtrees matching `skip`.
fn text_without<'a>(element: ElementRef<'a>, skip: &Selector, out: &mut Vec<&'a str>) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            if !skip.matches(&child_element) {
                text_without(child_element, skip, out);
            }
        } else if let Some(text) = child.value().as_text() {
            out.push(text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r##"<!DOCTYPE html>
<html><body>
<main class="article-details">
  <header class="heading">
    <div class="article-citation">
      <div class="article-source">
        <button class="journal-actions-trigger">Lancet Oncol</button>
        <span class="period">. </span>
        <span class="cit">2024 Mar;25(3):301-312.</span>
      </div>
    </div>
    <h1 class="heading-title">
      Targeted therapy   in solid tumours
    </h1>
    <div class="authors">
      <div class="authors-list">
        <span class="authors-list-item">
          <a class="full-name" href="/?term=Doe+J">Jane Doe</a>
          <sup class="affiliation-links"><a class="affiliation-link" href="#full-view-affiliation-2">2</a></sup>
        </span>
        <span class="authors-list-item">
          <a class="full-name" href="/?term=Roe+R">Richard Roe</a>
          <sup class="affiliation-links"><a class="affiliation-link" href="#full-view-affiliation-1">1</a></sup>
        </span>
      </div>
    </div>
    <div class="expanded-authors">
      <div class="affiliations">
        <ul class="item-list">
          <li data-affiliation-id="full-view-affiliation-1"><sup class="key">1</sup> Department of Oncology, Example University, Boston, MA, USA.</li>
          <li data-affiliation-id="full-view-affiliation-2"><sup class="key">2</sup> Acme Pharmaceuticals Inc, Cambridge, MA, USA.</li>
        </ul>
      </div>
    </div>
    <a class="corresponding-author-email" href="mailto:jane.doe@acme.example">jane.doe@acme.example</a>
  </header>
</main>
</body></html>"##;

    #[test]
    fn test_parse_full_page() {
        let page = ArticlePage::parse(PAGE);
        assert_eq!(page.title.as_deref(), Some("Targeted therapy in solid tumours"));
        assert_eq!(page.citation.as_deref(), Some("2024 Mar;25(3):301-312."));
        assert_eq!(
            page.authors,
            vec![
                AuthorEntry {
                    name: "Jane Doe".to_owned(),
                    keys: vec!["2".to_owned()],
                },
                AuthorEntry {
                    name: "Richard Roe".to_owned(),
                    keys: vec!["1".to_owned()],
                },
            ]
        );
        assert_eq!(page.affiliations.len(), 2);
        assert_eq!(page.affiliations[0].key.as_deref(), Some("1"));
        assert_eq!(
            page.affiliations[0].text,
            "Department of Oncology, Example University, Boston, MA, USA."
        );
        assert_eq!(
            page.corresponding_email.as_deref(),
            Some("jane.doe@acme.example")
        );
    }

    #[test]
    fn test_pairs_follow_footnote_keys() {
        // Positional pairing would give Jane the university affiliation
        let page = ArticlePage::parse(PAGE);
        assert_eq!(
            page.pairs(),
            vec![
                AuthorAffiliation::new("Jane Doe", "Acme Pharmaceuticals Inc, Cambridge, MA, USA."),
                AuthorAffiliation::new(
                    "Richard Roe",
                    "Department of Oncology, Example University, Boston, MA, USA."
                ),
            ]
        );

        let record = page.into_record("39400001", &AffiliationClassifier::default());
        assert_eq!(record.non_academic_authors, "Jane Doe");
        assert_eq!(
            record.company_affiliations,
            "Acme Pharmaceuticals Inc, Cambridge, MA, USA."
        );
        assert_eq!(record.corresponding_email, "jane.doe@acme.example");
    }

    #[test]
    fn test_author_with_several_keys() {
        let page = ArticlePage {
            authors: vec![AuthorEntry {
                name: "Ann Lee".to_owned(),
                keys: vec!["1".to_owned(), "2".to_owned(), "9".to_owned()],
            }],
            affiliations: vec![
                AffiliationEntry {
                    key: Some("1".to_owned()),
                    text: "School of Medicine".to_owned(),
                },
                AffiliationEntry {
                    key: Some("2".to_owned()),
                    text: "Genentech Inc".to_owned(),
                },
            ],
            ..ArticlePage::default()
        };
        let pairs = page.pairs();
        assert_eq!(
            pairs,
            vec![
                AuthorAffiliation::new("Ann Lee", "School of Medicine"),
                AuthorAffiliation::new("Ann Lee", "Genentech Inc"),
            ]
        );
    }

    #[test]
    fn test_positional_pairing_without_keys() {
        let html = r#"<html><body>
<h1 class="heading-title">Unkeyed</h1>
<div class="authors">
  <span class="authors-list-item"><a class="full-name">Jane Doe</a></span>
  <span class="authors-list-item"><a class="full-name">John Roe</a></span>
  <span class="authors-list-item"><a class="full-name">Extra Author</a></span>
</div>
<div class="expanded-authors"><ul>
  <li>Acme Pharmaceuticals Inc</li>
  <li>Department of Oncology, Example University</li>
</ul></div>
</body></html>"#;
        let page = ArticlePage::parse(html);
        assert_eq!(
            page.pairs(),
            vec![
                AuthorAffiliation::new("Jane Doe", "Acme Pharmaceuticals Inc"),
                AuthorAffiliation::new("John Roe", "Department of Oncology, Example University"),
            ]
        );
        let record = page.into_record("1", &AffiliationClassifier::default());
        assert_eq!(record.non_academic_authors, "Jane Doe");
        assert_eq!(record.company_affiliations, "Acme Pharmaceuticals Inc");
    }

    #[test]
    fn test_missing_fields_fall_back() {
        let page = ArticlePage::parse("<html><body><p>Nothing here</p></body></html>");
        assert_eq!(page, ArticlePage::default());

        let record = page.into_record("42", &AffiliationClassifier::default());
        assert_eq!(record, PaperRecord::empty("42"));
    }

    #[test]
    fn test_citation_needs_both_elements() {
        let html = r#"<div class="article-citation"><span class="other">x</span></div>
<span class="cit">outside the citation block</span>"#;
        let page = ArticlePage::parse(html);
        assert_eq!(page.citation, None);
    }

    #[test]
    fn test_empty_title_is_missing() {
        let page = ArticlePage::parse(r#"<h1 class="heading-title">   </h1>"#);
        assert_eq!(page.title, None);
        let record = page.into_record("5", &AffiliationClassifier::default());
        assert_eq!(record.title, NO_TITLE);
    }

    #[test]
    fn test_email_from_href() {
        let html = r#"<a class="corresponding-author-email" href="mailto:someone@example.org"></a>"#;
        let page = ArticlePage::parse(html);
        assert_eq!(page.corresponding_email.as_deref(), Some("someone@example.org"));
    }

    #[test]
    fn test_footnote_marker_stripped_everywhere() {
        let html = r#"<div class="expanded-authors"><ul>
<li><sup class="key">a</sup>Biotech <em>Corp</em><sup class="key">*</sup> Ltd</li>
</ul></div>"#;
        let page = ArticlePage::parse(html);
        assert_eq!(page.affiliations[0].key.as_deref(), Some("a"));
        assert_eq!(page.affiliations[0].text, "Biotech Corp Ltd");
    }

    #[test]
    fn test_inline_markup_does_not_split_words() {
        let html = r#"<h1 class="heading-title">CO<sub>2</sub> uptake in <i>E. coli</i>-derived cells</h1>"#;
        let page = ArticlePage::parse(html);
        assert_eq!(
            page.title.as_deref(),
            Some("CO2 uptake in E. coli-derived cells")
        );
    }

    #[test]
    fn test_split_word_affiliation_is_company() {
        let html = r#"<div class="authors">
  <span class="authors-list-item"><a class="full-name">Jane Doe</a><a class="affiliation-link">1</a></span>
</div>
<div class="expanded-authors"><ul>
  <li><sup class="key">1</sup>Acme Bio<b>tech</b> GmbH</li>
</ul></div>"#;
        let page = ArticlePage::parse(html);
        assert_eq!(page.affiliations[0].text, "Acme Biotech GmbH");

        let record = page.into_record("7", &AffiliationClassifier::default());
        assert_eq!(record.non_academic_authors, "Jane Doe");
        assert_eq!(record.company_affiliations, "Acme Biotech GmbH");
    }

    #[test]
    fn test_article_param_validation() {
        assert_eq!(ArticleParam::new(" 123 ").unwrap().id(), "123");
        assert!(ArticleParam::new("").is_err());
        assert!(ArticleParam::new("12/34").is_err());
    }
}
