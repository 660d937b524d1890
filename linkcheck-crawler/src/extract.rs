//! Link extraction
//!
//! Thin adapter over the `scraper` HTML parser: pulls `a[href]` elements out
//! of raw markup and resolves them into absolute addresses against the page
//! address (or a `<base href>` element when the page declares one).

use crate::error::{CrawlError, Result};
use crate::normalize::normalize;
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use tracing::debug;
use url::Url;

/// Finds every anchor link in the markup, resolved to an absolute address and
/// sorted lexicographically. Unresolvable and `mailto:` links are skipped.
pub fn find_links(base_address: &str, html: &str) -> Result<Vec<String>> {
    if base_address.trim().is_empty() {
        return Err(CrawlError::InvalidAddress(
            "base address must not be blank".to_string(),
        ));
    }
    let base =
        Url::parse(base_address).map_err(|e| CrawlError::InvalidAddress(e.to_string()))?;

    let document = Html::parse_document(html);
    let base = document_base(&document, base);

    let selector = Selector::parse("a[href]").unwrap();
    let mut links = Vec::new();

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        if href.is_empty() {
            continue;
        }
        match base.join(href) {
            Ok(resolved) => {
                if resolved.scheme().eq_ignore_ascii_case("mailto") {
                    continue;
                }
                links.push(resolved.to_string());
            }
            Err(e) => debug!("skipping unresolvable href {href}: {e}"),
        }
    }

    links.sort_unstable();
    Ok(links)
}

/// Deduplicated, normalized link set for a page, minus the page's own
/// address. Composes [`find_links`] with [`normalize`] at the boundary.
pub fn find_unique_links(base_address: &str, html: &str) -> Result<BTreeSet<String>> {
    let mut set: BTreeSet<String> = find_links(base_address, html)?
        .iter()
        .map(|link| normalize(link))
        .collect();

    set.remove(&normalize(base_address));
    Ok(set)
}

/// A `<base href>` element overrides the page address for relative link
/// resolution, the way browsers treat it.
fn document_base(document: &Html, page_address: Url) -> Url {
    let selector = Selector::parse("base[href]").unwrap();
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("href"))
        .and_then(|href| page_address.join(href).ok())
        .unwrap_or(page_address)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EBAY_INC_BASE: &str = "https://www.ebayinc.com/";
    const COMPANY: &str = "company/";
    const COMPANY_ABS: &str = "https://www.ebayinc.com/company/";
    const COMPANY_FRAGMENT: &str = "company/#main-content";
    const COMPANY_FRAGMENT_ABS: &str = "https://www.ebayinc.com/company/#main-content";
    const GOOGLE_ABOUT_US: &str = "https://about.google/stories";

    fn fragment(links: &[&str]) -> String {
        let mut html = String::from("<div>");
        for link in links {
            html.push_str(&format!("<a href=\"{link}\">link text</a>"));
        }
        html.push_str("</div>");
        html
    }

    fn page(base_href: Option<&str>, links: &[&str]) -> String {
        let base = base_href
            .map(|href| format!("<base href=\"{href}\" />"))
            .unwrap_or_default();
        format!(
            "<html><head>{}</head><body>{}</body></html>",
            base,
            fragment(links)
        )
    }

    #[test]
    fn test_resolves_relative_links() {
        let html = fragment(&[COMPANY, COMPANY_FRAGMENT]);
        let links = find_links(EBAY_INC_BASE, &html).unwrap();
        assert_eq!(links, vec![COMPANY_ABS, COMPANY_FRAGMENT_ABS]);
    }

    #[test]
    fn test_finds_absolute_links() {
        let html = fragment(&[COMPANY_ABS]);
        let links = find_links(EBAY_INC_BASE, &html).unwrap();
        assert_eq!(links, vec![COMPANY_ABS]);
    }

    #[test]
    fn test_finds_external_links() {
        let html = fragment(&[GOOGLE_ABOUT_US]);
        let links = find_links(EBAY_INC_BASE, &html).unwrap();
        assert_eq!(links, vec![GOOGLE_ABOUT_US]);
    }

    #[test]
    fn test_finds_multiple_links_in_page_sorted() {
        let expected = vec![GOOGLE_ABOUT_US, COMPANY_ABS];

        let no_base = page(None, &expected);
        let mut sorted = expected.clone();
        sorted.sort_unstable();
        assert_eq!(find_links(EBAY_INC_BASE, &no_base).unwrap(), sorted);

        let with_base = page(Some(EBAY_INC_BASE), &expected);
        assert_eq!(find_links(EBAY_INC_BASE, &with_base).unwrap(), sorted);
    }

    #[test]
    fn test_base_href_overrides_page_address() {
        let html = page(Some("https://cdn.example.com/assets/"), &["a.html"]);
        let links = find_links(EBAY_INC_BASE, &html).unwrap();
        assert_eq!(links, vec!["https://cdn.example.com/assets/a.html"]);
    }

    #[test]
    fn test_skips_mailto_links() {
        let html = fragment(&["mailto:someone@example.com", COMPANY]);
        let links = find_links(EBAY_INC_BASE, &html).unwrap();
        assert_eq!(links, vec![COMPANY_ABS]);
    }

    #[test]
    fn test_rejects_blank_and_malformed_base() {
        let html = fragment(&[COMPANY]);
        assert!(matches!(
            find_links("", &html),
            Err(CrawlError::InvalidAddress(_))
        ));
        assert!(matches!(
            find_links("badurl.html", &html),
            Err(CrawlError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_find_unique_links_normalizes_and_dedupes() {
        let html = fragment(&[COMPANY, COMPANY_FRAGMENT]);
        let links = find_unique_links(EBAY_INC_BASE, &html).unwrap();
        assert_eq!(links, BTreeSet::from([COMPANY_ABS.to_string()]));

        let queries = [
            "company/?a=b&c=d&y=z",
            "company/?a=b&y=z&c=d",
            "company/?c=d&a=b&y=z",
            "company/?y=z&c=d&a=b#main-content",
        ];
        let html = page(Some(EBAY_INC_BASE), &queries);
        let links = find_unique_links(EBAY_INC_BASE, &html).unwrap();
        assert_eq!(
            links,
            BTreeSet::from(["https://www.ebayinc.com/company/?a=b&c=d&y=z".to_string()])
        );
    }

    #[test]
    fn test_find_unique_links_removes_own_address() {
        let html = fragment(&[EBAY_INC_BASE, COMPANY]);
        let links = find_unique_links(EBAY_INC_BASE, &html).unwrap();
        assert_eq!(links, BTreeSet::from([COMPANY_ABS.to_string()]));
    }
}
