pub mod crawler;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod normalize;
pub mod result;

pub use crawler::Crawler;
pub use error::CrawlError;
pub use fetcher::{FetchConfig, build_http_client};
pub use result::{CrawlReport, PageResult};
