//! Last search, kept on disk between runs.
//!
//! Two documents are stored under the cache directory: the search itself
//! (`search_base.json`) and the reader's position in the results
//! (`search_meta.json`). Both are wrapped in [`CachedData`] so callers can
//! tell how old they are.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{Article, SortBy};

/// Consider cache stale after 1 hour.
const CACHE_STALE_MINUTES: i64 = 60;

const BASE_KEY: &str = "search_base";
const META_KEY: &str = "search_meta";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.cached_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Also covers clock skew
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            let hours = minutes / 60;
            if minutes % 60 >= 30 {
                format!("{}h ago", hours + 1)
            } else {
                format!("{}h ago", hours)
            }
        } else {
            let days = minutes / 1440;
            if (minutes % 1440) / 60 >= 12 {
                format!("{}d ago", days + 1)
            } else {
                format!("{}d ago", days)
            }
        }
    }

    pub fn is_stale(&self) -> bool {
        self.age_minutes() > CACHE_STALE_MINUTES
    }
}

/// The query and the results loaded so far.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchState {
    pub query: String,
    pub from: Option<String>,
    pub to: Option<String>,
    pub sort_by: SortBy,
    pub articles: Vec<Article>,
    /// How many of `articles` are shown.
    pub visible_count: usize,
    /// Result count reported by the provider.
    pub total: u64,
    /// Provider pages requested so far. Duplicates dropped on merge make
    /// `articles.len()` an unreliable page counter.
    #[serde(default)]
    pub pages_fetched: u32,
}

impl SearchState {
    pub fn visible_articles(&self) -> &[Article] {
        &self.articles[..self.visible_count.min(self.articles.len())]
    }

    /// Grow the visible window by up to `page_size`. Returns how many
    /// articles became visible.
    pub fn show_more(&mut self, page_size: usize) -> usize {
        let before = self.visible_articles().len();
        self.visible_count = (before + page_size).min(self.articles.len());
        self.visible_count - before
    }

    pub fn has_hidden(&self) -> bool {
        self.visible_count < self.articles.len()
    }

    /// Whether the provider has more results than have been fetched.
    pub fn has_more_pages(&self) -> bool {
        (self.articles.len() as u64) < self.total
    }

    /// Page number to request next, 1-based.
    pub fn next_page(&self) -> u32 {
        self.pages_fetched.max(1) + 1
    }

    /// Merge a freshly fetched page, dropping articles already loaded.
    /// Returns how many were added.
    pub fn append_page(&mut self, page: Vec<Article>) -> usize {
        self.pages_fetched = self.pages_fetched.max(1) + 1;
        if page.is_empty() {
            // Provider reported more results than it will return
            self.total = self.articles.len() as u64;
            return 0;
        }

        let mut known: HashSet<String> = self.articles.iter().map(|a| a.url.clone()).collect();
        let before = self.articles.len();
        self.articles
            .extend(page.into_iter().filter(|a| known.insert(a.url.clone())));
        self.articles.len() - before
    }

}

/// Where the reader was in the result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchMeta {
    pub selected_index: Option<usize>,
    pub scroll_offset: usize,
}

pub struct SearchCache {
    cache_dir: PathBuf,
}

impl SearchCache {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir)
            .with_context(|| format!("Failed to create cache directory {}", cache_dir.display()))?;
        Ok(Self { cache_dir })
    }

    fn cache_path(&self, name: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", name))
    }

    fn load<T: DeserializeOwned>(&self, name: &str) -> Option<CachedData<T>> {
        let path = self.cache_path(name);
        if !path.exists() {
            return None;
        }

        let parsed = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache file: {}", name))
            .and_then(|contents| {
                serde_json::from_str(&contents)
                    .with_context(|| format!("Failed to parse cache file: {}", name))
            });

        match parsed {
            Ok(cached) => Some(cached),
            Err(e) => {
                debug!(cache = name, error = %e, "Ignoring unreadable cache entry");
                None
            }
        }
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) {
        let write = || -> Result<()> {
            let contents = serde_json::to_string_pretty(&CachedData::new(data))?;
            std::fs::write(self.cache_path(name), contents)?;
            Ok(())
        };
        if let Err(e) = write() {
            warn!(cache = name, error = %e, "Failed to write cache entry");
        }
    }

    pub fn save_state(&self, state: &SearchState) {
        self.save(BASE_KEY, state);
    }

    pub fn save_meta(&self, meta: &SearchMeta) {
        self.save(META_KEY, meta);
    }

    pub fn load_state(&self) -> Option<CachedData<SearchState>> {
        self.load(BASE_KEY)
    }

    pub fn load_meta(&self) -> Option<CachedData<SearchMeta>> {
        self.load(META_KEY)
    }

    /// Forget the last search.
    pub fn clear(&self) {
        for name in [BASE_KEY, META_KEY] {
            let path = self.cache_path(name);
            if path.exists() {
                if let Err(e) = std::fs::remove_file(&path) {
                    warn!(cache = name, error = %e, "Failed to remove cache entry");
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
