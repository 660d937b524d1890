use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::time::Instant;

/// Status code recorded when a fetch never produced an HTTP status line
/// (connection refused, timeout, malformed response).
pub const TRANSPORT_FAILURE_STATUS: i32 = -1;

/// Outcome of one fetch attempt. Created once, immutable thereafter.
///
/// `links` is internal state for the crawl controller and never serialized:
/// it is only non-empty for 2xx HTML pages (the discovered link set) or 3xx
/// responses with a resolvable target (the singleton resolved target).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageResult {
    pub address: String,
    pub status_code: i32,
    pub message: String,
    #[serde(skip)]
    pub links: BTreeSet<String>,
}

impl PageResult {
    pub fn new(
        address: impl Into<String>,
        status_code: i32,
        message: impl Into<String>,
        links: BTreeSet<String>,
    ) -> Self {
        Self {
            address: address.into(),
            status_code,
            message: message.into(),
            links,
        }
    }

    /// A result with no discovered links.
    pub fn leaf(address: impl Into<String>, status_code: i32, message: impl Into<String>) -> Self {
        Self::new(address, status_code, message, BTreeSet::new())
    }
}

/// Aggregate output of one crawl invocation.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    pub root_address: String,
    pub depth: usize,
    pub elapsed_millis: u64,
    pub total_pages_crawled: usize,
    pub status_counts: HashMap<i32, usize>,
    pub page_results: Vec<PageResult>,
}

impl CrawlReport {
    /// Groups results into a status-code histogram and wraps them with the
    /// crawl parameters and elapsed wall-clock time. Pure aside from reading
    /// the clock.
    pub fn assemble(
        root_address: impl Into<String>,
        depth: usize,
        started: Instant,
        page_results: Vec<PageResult>,
    ) -> Self {
        let mut status_counts: HashMap<i32, usize> = HashMap::new();
        for result in &page_results {
            *status_counts.entry(result.status_code).or_insert(0) += 1;
        }

        Self {
            root_address: root_address.into(),
            depth,
            elapsed_millis: started.elapsed().as_millis() as u64,
            total_pages_crawled: page_results.len(),
            status_counts,
            page_results,
        }
    }
}
