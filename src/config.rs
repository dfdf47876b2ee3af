//! Static crawl configuration: category table, endpoint templates, request
//! headers, retry policy and output layout.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::Category;

pub const LISTING_ENDPOINT: &str = "https://tiki.vn/api/personalish/v1/blocks/listings?limit=40&sort=top_seller&page={page}&category={category}";
pub const DETAIL_ENDPOINT: &str = "https://tiki.vn/api/v2/products/{product_id}";
pub const REVIEWS_ENDPOINT: &str =
    "https://tiki.vn/api/v2/reviews?product_id={product_id}&include=comments&page={page}";

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

pub const CATEGORIES: &[(&str, u64)] = &[
    ("sach-van-hoc", 839),
    ("sach-kinh-te", 846),
    ("sach-ky-nang-song", 870),
    ("nuoi-day-con", 2527),
    ("sach-kien-thuc-tong-hop", 873),
    ("lich-su-dia-ly", 880),
];

/// Headers sent with every request.
pub fn default_headers() -> Vec<(&'static str, &'static str)> {
    vec![
        ("Content-Type", "application/json"),
        ("User-Agent", USER_AGENT),
        ("Accept", "application/json, text/plain, */*"),
        ("Referer", "https://tiki.vn/"),
        ("Origin", "https://tiki.vn"),
    ]
}

/// Fixed-count retry with a constant pause between failed attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_secs(3),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Endpoints {
    pub listing: String,
    pub detail: String,
    pub reviews: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            listing: LISTING_ENDPOINT.to_string(),
            detail: DETAIL_ENDPOINT.to_string(),
            reviews: REVIEWS_ENDPOINT.to_string(),
        }
    }
}

impl Endpoints {
    pub fn listing_url(&self, page: u32, category_id: u64) -> String {
        self.listing
            .replace("{page}", &page.to_string())
            .replace("{category}", &category_id.to_string())
    }

    pub fn detail_url(&self, product_id: u64) -> String {
        self.detail.replace("{product_id}", &product_id.to_string())
    }

    pub fn reviews_url(&self, product_id: u64, page: u32) -> String {
        self.reviews
            .replace("{product_id}", &product_id.to_string())
            .replace("{page}", &page.to_string())
    }
}

/// Immutable crawl settings, built once at startup and passed to the crawler.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub categories: Vec<Category>,
    pub endpoints: Endpoints,
    pub headers: Vec<(&'static str, &'static str)>,
    pub retry: RetryPolicy,
    /// Pause after every paginated request.
    pub courtesy_delay: Duration,
    pub max_listing_pages: u32,
    pub request_timeout: Duration,
    /// Root under which `products/` and `reviews/` are written.
    pub output_root: PathBuf,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            categories: CATEGORIES
                .iter()
                .map(|(slug, id)| Category::new(slug, *id))
                .collect(),
            endpoints: Endpoints::default(),
            headers: default_headers(),
            retry: RetryPolicy::default(),
            courtesy_delay: Duration::from_secs(1),
            max_listing_pages: 3,
            request_timeout: Duration::from_secs(30),
            output_root: PathBuf::from("data/raw"),
        }
    }
}

impl CrawlConfig {
    pub fn product_dir(&self, category: &Category) -> PathBuf {
        self.output_root.join("products").join(&category.slug)
    }

    pub fn review_dir(&self, category: &Category) -> PathBuf {
        self.output_root.join("reviews").join(&category.slug)
    }
}

pub fn record_path(dir: &Path, product_id: u64) -> PathBuf {
    dir.join(format!("{}.json", product_id))
}
