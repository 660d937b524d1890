//! Page fetcher
//!
//! Issues a single GET per address and converts the raw transport response
//! into a classified [`PageResult`]. Per-page failures never escape as
//! errors; they are captured in the returned record. The one exception is a
//! redirect that resolves to a non-absolute address, which signals malformed
//! upstream data and surfaces as [`CrawlError::RedirectResolution`].

use crate::error::Result;
use crate::extract::find_unique_links;
use crate::normalize::resolve_redirect_target;
use crate::result::{PageResult, TRANSPORT_FAILURE_STATUS};
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::{Client, Response, StatusCode, redirect::Policy};
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::{debug, warn};

/// HTTP client configuration shared by every fetch in a crawl.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: format!(
                "linkcheck/{} (https://github.com/scottvevans/linkcheck)",
                env!("CARGO_PKG_VERSION")
            ),
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

/// Builds the shared HTTP client. Redirects are never followed; the crawl
/// engine classifies them itself.
pub fn build_http_client(config: &FetchConfig) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(&config.user_agent)
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .redirect(Policy::none())
        .build()
}

/// Fetches one address and classifies the outcome by status-code class.
/// Exactly one network read per invocation, no retries.
pub async fn fetch_page(client: &Client, address: &str) -> Result<PageResult> {
    debug!("fetching {address}");

    let response = match client.get(address).send().await {
        Ok(response) => response,
        Err(e) => {
            warn!("transport failure for {address}: {e}");
            return Ok(transport_failure(address, &e));
        }
    };

    let status = response.status();
    if status.is_success() {
        Ok(handle_success(address, response).await)
    } else if status.is_redirection() {
        handle_redirect(address, &response)
    } else {
        Ok(PageResult::leaf(
            address,
            status.as_u16() as i32,
            reason_phrase(status),
        ))
    }
}

/// 2xx: read and parse the body when it is HTML, otherwise drop the body
/// unread and note the actual content type.
async fn handle_success(address: &str, response: Response) -> PageResult {
    let status = response.status();
    let code = status.as_u16() as i32;

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    if !is_html(content_type.as_deref()) {
        return PageResult::leaf(
            address,
            code,
            format!(
                "not an html page; Content-Type: {}",
                content_type.as_deref().unwrap_or("none")
            ),
        );
    }

    match response.text().await {
        Ok(html) => match find_unique_links(address, &html) {
            Ok(links) => PageResult::new(address, code, reason_phrase(status), links),
            Err(e) => PageResult::leaf(
                address,
                code,
                format!("ERROR: processing failed due to link extraction: {e}"),
            ),
        },
        Err(e) => PageResult::leaf(
            address,
            code,
            format!("ERROR: processing failed due to body read: {e}"),
        ),
    }
}

/// 3xx: resolve the Location header when present and record it as the single
/// link to follow.
fn handle_redirect(address: &str, response: &Response) -> Result<PageResult> {
    let status = response.status();
    let code = status.as_u16() as i32;

    let Some(location) = response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
    else {
        return Ok(PageResult::leaf(
            address,
            code,
            format!("{} -> new location unknown", reason_phrase(status)),
        ));
    };

    let target = resolve_redirect_target(address, location)?;
    let message = format!("{} -> {}", reason_phrase(status), target);
    Ok(PageResult::new(
        address,
        code,
        message,
        BTreeSet::from([target]),
    ))
}

fn transport_failure(address: &str, error: &reqwest::Error) -> PageResult {
    let category = if error.is_timeout() {
        "timeout"
    } else if error.is_connect() {
        "connection error"
    } else if error.is_request() {
        "request error"
    } else {
        "transport error"
    };

    PageResult::leaf(
        address,
        TRANSPORT_FAILURE_STATUS,
        format!("ERROR: processing failed due to {category}: {error}"),
    )
}

/// Media type compatible with `text/html`, ignoring parameters and case.
fn is_html(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|ct| ct.split(';').next())
        .is_some_and(|ct| ct.trim().eq_ignore_ascii_case("text/html"))
}

fn reason_phrase(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Unknown Status")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&FetchConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_is_html() {
        assert!(is_html(Some("text/html")));
        assert!(is_html(Some("text/html; charset=utf-8")));
        assert!(is_html(Some("TEXT/HTML")));
        assert!(!is_html(Some("application/json")));
        assert!(!is_html(Some("text/plain")));
        assert!(!is_html(None));
    }

    #[test]
    fn test_reason_phrase() {
        assert_eq!(reason_phrase(StatusCode::OK), "OK");
        assert_eq!(reason_phrase(StatusCode::MOVED_PERMANENTLY), "Moved Permanently");
        assert_eq!(reason_phrase(StatusCode::NOT_FOUND), "Not Found");
    }
}
