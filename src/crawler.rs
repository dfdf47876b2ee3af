//! Sequential category → listing → detail → reviews crawl.
//!
//! Every request goes through [`fetch_with_retry`]; the output directory is
//! the only progress state. A product's detail file guards its detail
//! request and its review file guards its review requests, so an
//! interrupted run picks up whichever half is still missing.

use std::fs;
use std::path::Path;
use std::thread;
use std::time::Duration;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::archiver::save_json;
use crate::config::{CrawlConfig, record_path};
use crate::error::{FetchError, Result};
use crate::fetcher::{Transport, fetch_with_retry};
use crate::models::{Category, CategorySummary, CrawlSummary};
use crate::parser;

/// Items gathered by a paginated fetch and the error that cut it short, if any.
struct Paginated {
    items: Vec<Value>,
    stopped_by: Option<FetchError>,
}

pub struct Crawler<'a, T: Transport> {
    config: &'a CrawlConfig,
    transport: T,
    sleep: Box<dyn Fn(Duration) + 'a>,
}

impl<'a, T: Transport> Crawler<'a, T> {
    pub fn new(config: &'a CrawlConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            sleep: Box::new(thread::sleep),
        }
    }

    /// Replace the blocking sleep used for courtesy delays and retry backoff.
    pub fn with_sleep(mut self, sleep: impl Fn(Duration) + 'a) -> Self {
        self.sleep = Box::new(sleep);
        self
    }

    fn get(&self, url: &str) -> Result<String> {
        fetch_with_retry(&self.transport, url, self.config.retry, &*self.sleep)
    }

    /// Walk pages 1.. until an empty page, `last_page`, or `cap`.
    fn paginate(&self, cap: Option<u32>, url_for: impl Fn(u32) -> String) -> Paginated {
        let mut items = Vec::new();
        let mut page = 1;

        loop {
            let url = url_for(page);
            let fetched = self.get(&url);
            (self.sleep)(self.config.courtesy_delay);

            let parsed = fetched.and_then(|body| parser::parse_page(&body));
            let envelope = match parsed {
                Ok(envelope) => envelope,
                Err(e) => {
                    return Paginated {
                        items,
                        stopped_by: Some(e),
                    };
                }
            };

            if envelope.data.is_empty() {
                break;
            }
            items.extend(envelope.data);

            let capped = cap.is_some_and(|cap| page >= cap);
            if page >= envelope.paging.last_page || capped {
                break;
            }
            page += 1;
        }

        Paginated {
            items,
            stopped_by: None,
        }
    }

    /// Product summaries for a category, at most `max_listing_pages` pages.
    ///
    /// Failures end the listing early; whatever was gathered is returned.
    pub fn fetch_listing(&self, category_id: u64) -> Vec<Value> {
        let endpoints = &self.config.endpoints;
        let result = self.paginate(Some(self.config.max_listing_pages), |page| {
            endpoints.listing_url(page, category_id)
        });
        if let Some(e) = result.stopped_by {
            warn!(category_id, error = %e, kept = result.items.len(), "listing stopped early");
        }
        result.items
    }

    pub fn fetch_detail(&self, product_id: u64) -> Result<Value> {
        let url = self.config.endpoints.detail_url(product_id);
        let body = self.get(&url)?;
        parser::parse_record(&body)
    }

    /// All review pages for a product, concatenated in page order.
    ///
    /// An error status on a later page keeps the pages already read; exhausted
    /// retries or an undecodable page fail the whole fetch.
    pub fn fetch_reviews(&self, product_id: u64) -> Result<Vec<Value>> {
        let endpoints = &self.config.endpoints;
        let result = self.paginate(None, |page| endpoints.reviews_url(product_id, page));
        match result.stopped_by {
            None => Ok(result.items),
            Some(e @ FetchError::Status { .. }) => {
                warn!(product_id, error = %e, kept = result.items.len(), "reviews stopped early");
                Ok(result.items)
            }
            Some(e) => Err(e),
        }
    }

    fn process_product(
        &self,
        product_id: u64,
        product_dir: &Path,
        review_dir: &Path,
        summary: &mut CategorySummary,
    ) -> Result<()> {
        let detail_path = record_path(product_dir, product_id);
        if detail_path.exists() {
            debug!(product_id, "detail already saved, skipping");
            summary.details_skipped += 1;
        } else {
            let detail = self.fetch_detail(product_id)?;
            save_json(&detail, &detail_path)?;
            summary.details_saved += 1;
        }

        let review_path = record_path(review_dir, product_id);
        if review_path.exists() {
            debug!(product_id, "reviews already saved, skipping");
            summary.reviews_skipped += 1;
        } else {
            let reviews = self.fetch_reviews(product_id)?;
            save_json(&reviews, &review_path)?;
            summary.reviews_saved += 1;
        }
        Ok(())
    }

    pub fn crawl_category(&self, category: &Category) -> Result<CategorySummary> {
        info!(category = %category.slug, id = category.id, "crawling category");

        let product_dir = self.config.product_dir(category);
        let review_dir = self.config.review_dir(category);
        fs::create_dir_all(&product_dir)?;
        fs::create_dir_all(&review_dir)?;

        let products = self.fetch_listing(category.id);
        let mut summary = CategorySummary {
            slug: category.slug.clone(),
            listed: products.len(),
            ..Default::default()
        };

        for product in &products {
            let Some(product_id) = parser::product_id(product) else {
                warn!(category = %category.slug, "listing entry without numeric id");
                summary.failures += 1;
                continue;
            };
            if let Err(e) = self.process_product(product_id, &product_dir, &review_dir, &mut summary) {
                warn!(product_id, error = %e, "failed to archive product");
                summary.failures += 1;
            }
        }

        info!(
            category = %category.slug,
            listed = summary.listed,
            details_saved = summary.details_saved,
            reviews_saved = summary.reviews_saved,
            failures = summary.failures,
            "category done"
        );
        Ok(summary)
    }

    /// Crawl every configured category in order. Per-category faults are
    /// logged and counted, never returned.
    pub fn crawl_all(&self) -> CrawlSummary {
        let started_at = Utc::now();
        let mut categories = Vec::with_capacity(self.config.categories.len());

        for category in &self.config.categories {
            match self.crawl_category(category) {
                Ok(summary) => categories.push(summary),
                Err(e) => {
                    warn!(category = %category.slug, error = %e, "category aborted");
                    categories.push(CategorySummary {
                        slug: category.slug.clone(),
                        failures: 1,
                        ..Default::default()
                    });
                }
            }
        }

        CrawlSummary {
            started_at,
            finished_at: Utc::now(),
            categories,
        }
    }
}
