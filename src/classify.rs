//! Academic vs. industry classification of author affiliations
//!
//! Each affiliation text is matched case-insensitively against two keyword
//! sets. Keywords match as plain substrings, so `inc` also fires inside
//! longer words. The academic set is tested first and wins ties.

use crate::{
    error::{Error, Result},
    models::AuthorAffiliation,
};
use regex::{Regex, RegexBuilder};
use tracing::debug;

pub const ACADEMIC_KEYWORDS: &[&str] = &[
    "university",
    "college",
    "institute",
    "department",
    "school",
    "research center",
    "hospital",
];

pub const COMPANY_KEYWORDS: &[&str] = &[
    "pharma",
    "biotech",
    "inc",
    "corp",
    "limited",
    "company",
    "laboratories",
    "pharmaceutical",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AffiliationKind {
    Academic,
    Company,
    Unclassified,
}

#[derive(Debug, Clone)]
pub struct AffiliationClassifier {
    academic_keywords: Vec<String>,
    company_keywords: Vec<String>,
    academic: Regex,
    company: Regex,
}

impl PartialEq for AffiliationClassifier {
    fn eq(&self, other: &Self) -> bool {
        self.academic_keywords == other.academic_keywords
            && self.company_keywords == other.company_keywords
    }
}

impl Default for AffiliationClassifier {
    fn default() -> Self {
        let academic_keywords = to_owned(ACADEMIC_KEYWORDS);
        let company_keywords = to_owned(COMPANY_KEYWORDS);
        Self {
            academic: keyword_pattern(&academic_keywords)
                .expect("built-in academic keywords compile"),
            company: keyword_pattern(&company_keywords)
                .expect("built-in company keywords compile"),
            academic_keywords,
            company_keywords,
        }
    }
}

impl AffiliationClassifier {
    /// Build a classifier from custom keyword sets.
    ///
    /// Keywords are matched literally; both sets must be non-empty.
    pub fn new<A, C>(academic: A, company: C) -> Result<Self>
    where
        A: IntoIterator,
        A::Item: AsRef<str>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        let academic_keywords = normalize(academic, "academic")?;
        let company_keywords = normalize(company, "company")?;
        Ok(Self {
            academic: keyword_pattern(&academic_keywords)?,
            company: keyword_pattern(&company_keywords)?,
            academic_keywords,
            company_keywords,
        })
    }

    pub fn academic_keywords(&self) -> &[String] {
        &self.academic_keywords
    }

    pub fn company_keywords(&self) -> &[String] {
        &self.company_keywords
    }

    pub fn classify(&self, affiliation: &str) -> AffiliationKind {
        if self.academic.is_match(affiliation) {
            AffiliationKind::Academic
        } else if self.company.is_match(affiliation) {
            AffiliationKind::Company
        } else {
            AffiliationKind::Unclassified
        }
    }

    /// Sort author/affiliation pairs into the three buckets, keeping input order.
    pub fn partition(&self, pairs: &[AuthorAffiliation]) -> Classification {
        let mut out = Classification::default();
        for pair in pairs {
            match self.classify(&pair.affiliation) {
                AffiliationKind::Academic => out.academic_authors.push(pair.author.clone()),
                AffiliationKind::Company => {
                    out.non_academic_authors.push(pair.author.clone());
                    out.company_affiliations.push(pair.affiliation.clone());
                }
                AffiliationKind::Unclassified => {
                    debug!(author = %pair.author, affiliation = %pair.affiliation, "unclassified affiliation");
                    out.unclassified.push(pair.clone());
                }
            }
        }
        out
    }
}

/// Output of [`AffiliationClassifier::partition`].
///
/// `non_academic_authors[i]` belongs to `company_affiliations[i]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    pub academic_authors: Vec<String>,
    pub non_academic_authors: Vec<String>,
    pub company_affiliations: Vec<String>,
    pub unclassified: Vec<AuthorAffiliation>,
}

fn normalize<I>(keywords: I, set: &str) -> Result<Vec<String>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let keywords: Vec<String> = keywords
        .into_iter()
        .map(|k| k.as_ref().trim().to_owned())
        .filter(|k| !k.is_empty())
        .collect();
    if keywords.is_empty() {
        return Err(Error::InvalidParameter(format!(
            "{} keyword set is empty",
            set
        )));
    }
    Ok(keywords)
}

fn keyword_pattern(keywords: &[String]) -> Result<Regex> {
    let alternation = keywords
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");
    RegexBuilder::new(&format!("({})", alternation))
        .case_insensitive(true)
        .build()
        .map_err(|e| Error::InvalidParameter(e.to_string()))
}

fn to_owned(keywords: &[&str]) -> Vec<String> {
    keywords.iter().map(|k| (*k).to_owned()).collect()
}
