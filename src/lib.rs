//! Archives Tiki catalog listings, product details and reviews as JSON files.

pub mod archiver;
pub mod config;
pub mod crawler;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod parser;

pub use config::{CrawlConfig, Endpoints, RetryPolicy};
pub use crawler::Crawler;
pub use error::{FetchError, Result, TransportError};
pub use fetcher::{HttpTransport, RawResponse, Transport};
pub use models::{Category, CategorySummary, CrawlSummary};
