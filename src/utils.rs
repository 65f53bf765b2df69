use reqwest::{Client, RequestBuilder, Response, StatusCode};

use crate::error::{Error, Result};

pub(crate) fn build_request(client: &Client, url: &str, api_key: Option<&str>) -> RequestBuilder {
    let mut req_builder = client.get(url);
    if let Some(key) = api_key {
        req_builder = req_builder.query(&[("api_key", key)]);
    }
    req_builder
}

/// Turn a non-success response into `Error::RemoteService`.
pub(crate) async fn remote_error(url: &str, resp: Response) -> Error {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    Error::RemoteService {
        url: url.to_owned(),
        status: status.as_u16(),
        body: truncate(&body, 200),
    }
}

pub(crate) fn is_not_found(status: StatusCode) -> bool {
    status == StatusCode::NOT_FOUND
}

/// Join text nodes as-is, then collapse runs of whitespace into single
/// spaces and trim the ends.
///
/// Nodes are concatenated first so inline markup (`Bio<b>tech</b>`) does not
/// split words.
pub(crate) fn clean_text<'a, I: IntoIterator<Item = &'a str>>(parts: I) -> String {
    let joined: String = parts.into_iter().collect();
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_owned()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_collapses_whitespace() {
        assert_eq!(clean_text(["  Jane\n ", "  Doe "]), "Jane Doe");
        assert_eq!(clean_text(["\t\n"]), "");
        assert_eq!(clean_text(Vec::<&str>::new()), "");
    }

    #[test]
    fn clean_text_keeps_words_split_by_markup() {
        assert_eq!(clean_text(["Acme Bio", "tech", " GmbH"]), "Acme Biotech GmbH");
        assert_eq!(
            clean_text(["CO", "2", " uptake in ", "E. coli", "-derived cells"]),
            "CO2 uptake in E. coli-derived cells"
        );
    }

    #[test]
    fn truncate_long_bodies() {
        assert_eq!(truncate("abc", 5), "abc");
        assert_eq!(truncate("abcdef", 3), "abc...");
    }
}
