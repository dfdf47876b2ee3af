use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub slug: String,
    pub id: u64,
}

impl Category {
    pub fn new(slug: &str, id: u64) -> Self {
        Self {
            slug: slug.to_string(),
            id,
        }
    }
}

/// The `{data, paging: {last_page}}` envelope shared by paginated endpoints.
///
/// A missing or `null` field reads as empty / page 0.
#[derive(Debug, Default, Deserialize)]
pub struct Page {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub paging: Paging,
}

#[derive(Debug, Default, Deserialize)]
pub struct Paging {
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_page: u32,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Counters for one category.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CategorySummary {
    pub slug: String,
    pub listed: usize,
    pub details_saved: usize,
    pub details_skipped: usize,
    pub reviews_saved: usize,
    pub reviews_skipped: usize,
    pub failures: usize,
}

#[derive(Debug, Clone)]
pub struct CrawlSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub categories: Vec<CategorySummary>,
}

impl CrawlSummary {
    pub fn total_failures(&self) -> usize {
        self.categories.iter().map(|c| c.failures).sum()
    }
}
