//! Shareable links carrying a query
//!
//! A filtered view is shared as `<page>?<encoded query>`, the same shape the
//! day links on the page use.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("Link query is not valid UTF-8 after decoding: {0}")]
    InvalidEncoding(String),
}

/// Build a link to `base` that restores `query`
///
/// A `#fragment` on `base` is kept after the query.
pub fn share_link(base: &str, query: &str) -> String {
    let (base, fragment) = match base.split_once('#') {
        Some((base, fragment)) => (base, Some(fragment)),
        None => (base, None),
    };
    let mut link = strip_query(base).to_string();
    let query = query.trim();
    if !query.is_empty() {
        link.push('?');
        link.push_str(&urlencoding::encode(query));
    }
    if let Some(fragment) = fragment {
        link.push('#');
        link.push_str(fragment);
    }
    link
}

/// Read the query back from a shared link
///
/// Returns `None` when the link carries no query or only whitespace.
pub fn query_from_link(link: &str) -> Result<Option<String>, LinkError> {
    let Some((_, encoded)) = link.split_once('?') else {
        return Ok(None);
    };
    let encoded = encoded.split('#').next().unwrap_or_default().replace('+', " ");
    let decoded = urlencoding::decode(&encoded)
        .map_err(|e| LinkError::InvalidEncoding(e.to_string()))?;
    let decoded = decoded.trim();
    Ok((!decoded.is_empty()).then(|| decoded.to_string()))
}

fn strip_query(link: &str) -> &str {
    link.split_once('?').map_or(link, |(base, _)| base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_link_encodes_query() {
        assert_eq!(
            share_link("https://example.org/index.html", "jazz !rock"),
            "https://example.org/index.html?jazz%20%21rock"
        );
    }

    #[test]
    fn test_share_link_replaces_existing_query() {
        assert_eq!(share_link("page.html?old", " new "), "page.html?new");
        assert_eq!(share_link("page.html?old", "  "), "page.html");
    }

    #[test]
    fn test_share_link_keeps_fragment_after_query() {
        assert_eq!(share_link("sat.html#19", "jazz"), "sat.html?jazz#19");
        assert_eq!(share_link("sat.html?old#19", "jazz"), "sat.html?jazz#19");
        assert_eq!(share_link("sat.html#19", ""), "sat.html#19");
        assert_eq!(
            query_from_link(&share_link("sat.html#19", "jazz !rock")).unwrap().as_deref(),
            Some("jazz !rock")
        );
    }

    #[test]
    fn test_query_from_link() {
        let link = share_link("https://x/", "Jazz !Rock Nürnberg");
        assert_eq!(
            query_from_link(&link).unwrap().as_deref(),
            Some("Jazz !Rock Nürnberg")
        );
        assert_eq!(query_from_link("https://x/?a+b").unwrap().as_deref(), Some("a b"));
        assert_eq!(query_from_link("https://x/").unwrap(), None);
        assert_eq!(query_from_link("https://x/?%20").unwrap(), None);
    }

    #[test]
    fn test_query_from_link_rejects_invalid_utf8() {
        assert!(query_from_link("https://x/?%FF%FE").is_err());
    }
}
