//! Records produced by a run

use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder for any field the article page did not provide
pub const NOT_AVAILABLE: &str = "Not Available";

/// Placeholder title
pub const NO_TITLE: &str = "No Title";

/// Export column names, in column order
pub const FIELD_NAMES: [&str; 6] = [
    "PubmedID",
    "Title",
    "Publication Date",
    "Non-academic Author(s)",
    "Company Affiliation(s)",
    "Corresponding Author Email",
];

/// One exported paper. Every field is always present; missing data is a
/// sentinel string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperRecord {
    #[serde(rename = "PubmedID")]
    pub pubmed_id: String,
    #[serde(rename = "Title")]
    pub title: String,
    /// Citation text as printed on the page, e.g. `Lancet. 2024 Mar;403(10431):1-10.`
    #[serde(rename = "Publication Date")]
    pub publication_date: String,
    #[serde(rename = "Non-academic Author(s)")]
    pub non_academic_authors: String,
    #[serde(rename = "Company Affiliation(s)")]
    pub company_affiliations: String,
    #[serde(rename = "Corresponding Author Email")]
    pub corresponding_email: String,
}

impl PaperRecord {
    /// A record with every field set to its placeholder
    pub fn empty(pubmed_id: &str) -> Self {
        Self {
            pubmed_id: pubmed_id.to_owned(),
            title: NO_TITLE.to_owned(),
            publication_date: NOT_AVAILABLE.to_owned(),
            non_academic_authors: NOT_AVAILABLE.to_owned(),
            company_affiliations: NOT_AVAILABLE.to_owned(),
            corresponding_email: NOT_AVAILABLE.to_owned(),
        }
    }

    /// Field values in [`FIELD_NAMES`] order
    pub fn values(&self) -> [&str; 6] {
        [
            self.pubmed_id.as_str(),
            self.title.as_str(),
            self.publication_date.as_str(),
            self.non_academic_authors.as_str(),
            self.company_affiliations.as_str(),
            self.corresponding_email.as_str(),
        ]
    }
}

impl fmt::Display for PaperRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in FIELD_NAMES.iter().zip(self.values()).enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "'{}': '{}'", name, quoted(value))?;
        }
        write!(f, "}}")
    }
}

/// Backslash-escape `\` and `'` so a value cannot end its quotes early.
fn quoted(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Join a multi-valued field, or fall back to [`NOT_AVAILABLE`].
pub fn join_or_not_available(values: &[String]) -> String {
    if values.is_empty() {
        NOT_AVAILABLE.to_owned()
    } else {
        values.join(", ")
    }
}

/// One author and one of their affiliation texts
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AuthorAffiliation {
    pub author: String,
    pub affiliation: String,
}

impl AuthorAffiliation {
    pub fn new(author: &str, affiliation: &str) -> Self {
        Self {
            author: author.to_owned(),
            affiliation: affiliation.to_owned(),
        }
    }
}
