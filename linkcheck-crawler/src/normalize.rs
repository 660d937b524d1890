//! Address normalization
//!
//! Two addresses that differ only in fragment or query parameter order must
//! collapse to the same canonical form, otherwise the visited set and link
//! deduplication both break.

use crate::error::{CrawlError, Result};
use url::Url;

/// Normalizes an address by stripping the fragment and canonicalizing the
/// query string.
///
/// Query parameters that do not look like `name=value` (name starting with a
/// letter or underscore, non-empty value) are dropped. Surviving parameters
/// are sorted by their full `name=value` token. If nothing survives, the
/// trailing `?` is dropped as well.
pub fn normalize(address: &str) -> String {
    let stripped = remove_fragment(address);

    let Some(query_index) = stripped.find('?') else {
        return stripped.to_string();
    };

    let query = &stripped[query_index + 1..];
    match sorted_query_string(query) {
        Some(sorted) => format!("{}?{}", &stripped[..query_index], sorted),
        None => stripped[..query_index].to_string(),
    }
}

/// Strips everything from the first `#` onward. Idempotent.
pub fn remove_fragment(address: &str) -> &str {
    match address.find('#') {
        Some(index) => &address[..index],
        None => address,
    }
}

/// Filters a raw query string down to its valid `name=value` parameters and
/// sorts them lexicographically by the full token. Returns `None` when no
/// parameter survives.
pub fn sorted_query_string(query: &str) -> Option<String> {
    if query.is_empty() {
        return None;
    }

    let mut params: Vec<&str> = query.split('&').filter(|p| is_valid_param(p)).collect();
    if params.is_empty() {
        return None;
    }

    params.sort_unstable();
    Some(params.join("&"))
}

/// A parameter is valid when its name starts with an ASCII letter or an
/// underscore and its value is non-empty. The value may itself contain `=`.
fn is_valid_param(param: &str) -> bool {
    let Some((name, value)) = param.split_once('=') else {
        return false;
    };

    let starts_well = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');

    starts_well && !value.is_empty()
}

/// Resolves a `Location` header value against the address that produced it.
///
/// An absolute redirect is returned unchanged. A relative one is resolved
/// against the authority (scheme + host + port) of the original address. A
/// resolution that still does not yield an absolute address indicates
/// malformed upstream data and fails with a distinct error rather than an
/// ordinary per-page failure.
pub fn resolve_redirect_target(original: &str, redirect: &str) -> Result<String> {
    if Url::parse(redirect).is_ok() {
        return Ok(redirect.to_string());
    }

    let invariant = || CrawlError::RedirectResolution {
        address: original.to_string(),
        location: redirect.to_string(),
    };

    let original_url =
        Url::parse(original).map_err(|e| CrawlError::InvalidAddress(e.to_string()))?;
    let authority = original_url.authority();

    // Url lowercases the host, so locate the authority case-insensitively and
    // keep the original's own text as the base
    let index = original
        .to_ascii_lowercase()
        .find(&authority.to_ascii_lowercase())
        .ok_or_else(|| invariant())?
        + authority.len();
    let resolved = format!("{}{}", &original[..index], redirect);

    Url::parse(&resolved).map_err(|_| invariant())?;
    Ok(resolved)
}
