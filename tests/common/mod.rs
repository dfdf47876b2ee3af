//! Shared fixtures for the crawler integration tests.
//!
//! `FakeCatalog` is an in-memory `Transport` that replays scripted replies per
//! URL and records every URL requested, in order. Crawlers built with
//! [`crawler`] log their pauses into the same fake instead of sleeping.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use serde_json::{Value, json};
use tiki_product_archiver::{
    Category, CrawlConfig, Crawler, Endpoints, RawResponse, Transport, TransportError,
};

pub fn endpoints() -> Endpoints {
    Endpoints {
        listing: "http://catalog.test/listings?page={page}&category={category}".into(),
        detail: "http://catalog.test/products/{product_id}".into(),
        reviews: "http://catalog.test/reviews?product_id={product_id}&page={page}".into(),
    }
}

/// Single-category config writing under `root`.
pub fn test_config(root: &std::path::Path) -> CrawlConfig {
    CrawlConfig {
        categories: vec![Category::new("sach-van-hoc", 839)],
        endpoints: endpoints(),
        output_root: root.to_path_buf(),
        ..Default::default()
    }
}

pub fn crawler<'a>(config: &'a CrawlConfig, fake: &'a FakeCatalog) -> Crawler<'a, &'a FakeCatalog> {
    Crawler::new(config, fake).with_sleep(move |d| fake.pauses.borrow_mut().push(d))
}

type Reply = Result<RawResponse, TransportError>;

#[derive(Default)]
pub struct FakeCatalog {
    replies: RefCell<HashMap<String, VecDeque<Reply>>>,
    requested: RefCell<Vec<String>>,
    pauses: RefCell<Vec<Duration>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, url: String, reply: Reply) -> &Self {
        self.replies
            .borrow_mut()
            .entry(url)
            .or_default()
            .push_back(reply);
        self
    }

    pub fn json(&self, url: String, body: Value) -> &Self {
        self.reply(
            url,
            Ok(RawResponse {
                status: 200,
                body: body.to_string(),
            }),
        )
    }

    pub fn status(&self, url: String, status: u16) -> &Self {
        self.reply(
            url,
            Ok(RawResponse {
                status,
                body: String::new(),
            }),
        )
    }

    pub fn refuse(&self, url: String) -> &Self {
        self.reply(url, Err(TransportError::Connection("connection refused".into())))
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }

    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses.borrow().clone()
    }

    pub fn requests_matching(&self, fragment: &str) -> usize {
        self.requested
            .borrow()
            .iter()
            .filter(|url| url.contains(fragment))
            .count()
    }
}

impl Transport for FakeCatalog {
    fn get(&self, url: &str) -> Reply {
        self.requested.borrow_mut().push(url.to_string());
        let next = self
            .replies
            .borrow_mut()
            .get_mut(url)
            .and_then(|queue| queue.pop_front());
        next.unwrap_or(Ok(RawResponse {
            status: 404,
            body: String::new(),
        }))
    }
}

pub fn page(items: Vec<Value>, last_page: u32) -> Value {
    json!({ "data": items, "paging": { "last_page": last_page } })
}

pub fn listing_url(page: u32) -> String {
    endpoints().listing_url(page, 839)
}

pub fn detail_url(product_id: u64) -> String {
    endpoints().detail_url(product_id)
}

pub fn reviews_url(product_id: u64, page: u32) -> String {
    endpoints().reviews_url(product_id, page)
}
