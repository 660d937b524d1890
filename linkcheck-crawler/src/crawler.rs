//! Crawl controller
//!
//! Drives a breadth-first, level-synchronized traversal: every address in
//! the current frontier is fetched concurrently, the whole level is awaited
//! before the next one is computed, and the visited set is only updated
//! between levels so no shared structure is written concurrently.

use crate::error::{CrawlError, Result};
use crate::fetcher::{FetchConfig, build_http_client, fetch_page};
use crate::normalize::normalize;
use crate::result::{CrawlReport, PageResult};
use futures::StreamExt;
use futures::stream;
use reqwest::Client;
use std::collections::{BTreeSet, HashSet};
use std::time::Instant;
use tracing::{debug, info};

/// Deepest level a crawl may be asked to reach.
pub const MAX_DEPTH: usize = 5;

const DEFAULT_MAX_CONCURRENCY: usize = 16;

/// Breadth-first crawl engine. The HTTP client is an explicit dependency so
/// callers control timeouts and connection reuse.
pub struct Crawler {
    client: Client,
    max_concurrency: usize,
}

impl Crawler {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }

    /// A crawler with the default client configuration.
    pub fn with_defaults() -> Result<Self> {
        let client = build_http_client(&FetchConfig::default())?;
        Ok(Self::new(client))
    }

    /// Bounds the number of in-flight fetches within a level.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    /// Crawls `root_address` breadth-first to `max_depth` levels, returning a
    /// report over every page fetched.
    ///
    /// `max_depth` must be between 1 and [`MAX_DEPTH`] and `root_address`
    /// must not be blank; both are rejected before any network activity.
    /// Per-page failures are captured as results, so once a crawl starts the
    /// only error that can surface is a malformed redirect resolution.
    pub async fn crawl(&self, max_depth: usize, root_address: &str) -> Result<CrawlReport> {
        if !(1..=MAX_DEPTH).contains(&max_depth) {
            return Err(CrawlError::InvalidDepth(max_depth));
        }
        if root_address.trim().is_empty() {
            return Err(CrawlError::InvalidAddress(
                "address must not be blank".to_string(),
            ));
        }

        info!("crawling {root_address} to depth {max_depth}");
        let started = Instant::now();

        let mut results: Vec<PageResult> = Vec::new();
        let mut visited: HashSet<String> = HashSet::new();
        let mut frontier: BTreeSet<String> = BTreeSet::from([normalize(root_address)]);
        let mut current_depth = 0;

        loop {
            debug!(
                "level {current_depth}: fetching {} address(es)",
                frontier.len()
            );
            let level = self.fetch_level(&frontier).await?;

            if current_depth == max_depth {
                results.extend(level);
                break;
            }

            visited.extend(std::mem::take(&mut frontier));
            frontier = level
                .iter()
                .flat_map(|result| result.links.iter())
                .filter(|link| !visited.contains(*link))
                .cloned()
                .collect();

            results.extend(level);
            current_depth += 1;
        }

        info!(
            "crawl of {root_address} complete: {} page(s) in {}ms",
            results.len(),
            started.elapsed().as_millis()
        );
        Ok(CrawlReport::assemble(
            root_address,
            max_depth,
            started,
            results,
        ))
    }

    /// Fetches a whole frontier concurrently and waits for every fetch to
    /// finish - the level barrier. Result order within a level is not
    /// deterministic.
    async fn fetch_level(&self, frontier: &BTreeSet<String>) -> Result<Vec<PageResult>> {
        stream::iter(frontier)
            .map(|address| fetch_page(&self.client, address))
            .buffer_unordered(self.max_concurrency)
            .collect::<Vec<_>>()
            .await
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_depth_zero_is_rejected() {
        let crawler = Crawler::with_defaults().unwrap();
        let result = crawler.crawl(0, "http://example.com/").await;
        assert!(matches!(result, Err(CrawlError::InvalidDepth(0))));
    }

    #[tokio::test]
    async fn test_depth_above_bound_is_rejected() {
        let crawler = Crawler::with_defaults().unwrap();
        let result = crawler.crawl(MAX_DEPTH + 1, "http://example.com/").await;
        assert!(matches!(result, Err(CrawlError::InvalidDepth(6))));
    }

    #[tokio::test]
    async fn test_blank_address_is_rejected() {
        let crawler = Crawler::with_defaults().unwrap();
        let result = crawler.crawl(1, "   ").await;
        assert!(matches!(result, Err(CrawlError::InvalidAddress(_))));
    }

    #[test]
    fn test_max_concurrency_floor() {
        let crawler = Crawler::with_defaults().unwrap().with_max_concurrency(0);
        assert_eq!(crawler.max_concurrency, 1);
    }
}
