use serde::{Deserialize, Serialize};

// ============================================================================
// Feed Document
// ============================================================================

/// One blog post summary from the aggregated feed.
///
/// Immutable once loaded. The feed guarantees no stable ID; author, title
/// and `created` together are only a display key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub link: String,
    pub author: String,
    /// Avatar image URL. Absent, empty or broken avatars fall back to the
    /// configured image at projection time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// ISO-8601 date-time, kept verbatim.
    pub created: String,
}

/// Summary numbers published alongside the articles. Displayed verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedStatistics {
    pub friends_num: u64,
    pub active_num: u64,
    pub article_num: u64,
    pub last_updated_time: String,
}

/// The `all.json` document: the unit fetched and the unit cached.
///
/// Article order is the feed's order (newest first) and is never re-sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedPayload {
    pub article_data: Vec<Article>,
    #[serde(default)]
    pub statistical_data: FeedStatistics,
}

impl FeedPayload {
    /// Parse a payload from raw JSON bytes.
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

/// Where a loaded payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Cache,
    Network,
}

/// A payload together with its origin.
#[derive(Debug, Clone)]
pub struct LoadedFeed {
    pub payload: FeedPayload,
    pub source: LoadSource,
}
