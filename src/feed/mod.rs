//! Feed acquisition: the `all.json` document, its durable cache, and the
//! loader that decides between them.
//!
//! - [`types`] - Article, statistics and payload shapes (serde)
//! - [`cache`] - Time-boxed cache entry in the local store
//! - [`loader`] - Cache-first fetch over HTTP
//!
//! # Example
//!
//! ```ignore
//! use fclite::feed::{FeedCache, FeedLoader};
//!
//! let loader = FeedLoader::new(client, FeedCache::new(db), "https://example.com/", timeout);
//! let loaded = loader.load().await?;
//! ```

mod cache;
mod loader;
mod types;

pub use cache::{is_fresh, now_millis, FeedCache, CACHE_KEY, CACHE_TIME_KEY, CACHE_TTL_MILLIS};
pub use loader::{feed_endpoint, FeedError, FeedLoader, FEED_FILE};
pub use types::{Article, FeedPayload, FeedStatistics, LoadSource, LoadedFeed};
