//! Upload URL decomposition.
//!
//! Registration hands back upload URLs with their signing parameters baked
//! into the query string. The upload call wants them apart: a bare endpoint
//! plus a flat parameter list that the transport re-encodes.

use crate::types::SplitUrl;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum UrlSplitError {
    #[error("invalid upload URL '{url}': {source}")]
    Parse {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Split `url` into `scheme://authority/path` and its query parameters.
///
/// - The bare URL is the input text up to the first `?` or `#`, verbatim:
///   no case folding, default-port removal or percent-encoding.
/// - Parameters keep the order of their first appearance.
/// - A repeated key keeps only its first non-empty value.
/// - Parameters with empty values are skipped.
pub fn split_url(url: &str) -> Result<SplitUrl, UrlSplitError> {
    let parsed = Url::parse(url).map_err(|source| UrlSplitError::Parse {
        url: url.to_string(),
        source,
    })?;

    let base = url
        .find(['?', '#'])
        .map_or(url, |end| &url[..end])
        .to_string();

    let mut params: Vec<(String, String)> = Vec::new();
    for (key, value) in parsed.query_pairs() {
        if value.is_empty() || params.iter().any(|(k, _)| *k == key) {
            continue;
        }
        params.push((key.into_owned(), value.into_owned()));
    }

    Ok(SplitUrl { base, params })
}
