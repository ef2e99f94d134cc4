//! Pure projections from widget state to render-ready data.
//!
//! Nothing here mutates state. The UI layer only ever sees what these
//! functions return.

use crate::feed::{Article, FeedStatistics};
use crate::util::{origin_of, validate_url_for_open};

/// Maximum number of articles listed in the author overlay.
pub const AUTHOR_DETAIL_LIMIT: usize = 4;

/// `view[cursor .. cursor + page_size]`, clamped to the view. Same slice
/// `PaginationState::next_page` would hand out, without moving anything.
pub fn project_page<T>(view: &[T], cursor: usize, page_size: usize) -> &[T] {
    let start = cursor.min(view.len());
    let end = start.saturating_add(page_size).min(view.len());
    &view[start..end]
}

/// Up to [`AUTHOR_DETAIL_LIMIT`] of `author`'s articles, in feed order.
///
/// Always drawn from the full list; the active author filter does not apply.
pub fn project_author_detail<'a>(all: &'a [Article], author: &str) -> Vec<&'a Article> {
    all.iter()
        .filter(|a| a.author == author)
        .take(AUTHOR_DETAIL_LIMIT)
        .collect()
}

/// Avatar URL to display: the article's own when it is a usable http(s)
/// URL, otherwise the configured fallback.
pub fn resolve_image<'a>(avatar: Option<&'a str>, fallback: &'a str) -> &'a str {
    match avatar.map(str::trim) {
        Some(url) if !url.is_empty() && validate_url_for_open(url).is_ok() => url,
        _ => fallback,
    }
}

/// `scheme://host[:port]` of a link, used as the author's site address.
pub fn site_origin(link: &str) -> Option<String> {
    origin_of(link).ok()
}

/// Date part of an ISO-8601 `created` value (first ten characters).
pub fn display_date(created: &str) -> &str {
    match created.char_indices().nth(10) {
        Some((idx, _)) => &created[..idx],
        None => created,
    }
}

/// Everything the author overlay shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorDetail<'a> {
    pub author: &'a str,
    pub avatar: &'a str,
    /// Site origin of the article the overlay was opened from.
    pub site: Option<String>,
    pub articles: Vec<&'a Article>,
}

/// Build the overlay for the author of `clicked`.
pub fn author_detail<'a>(
    all: &'a [Article],
    clicked: &'a Article,
    fallback_image: &'a str,
) -> AuthorDetail<'a> {
    AuthorDetail {
        author: &clicked.author,
        avatar: resolve_image(clicked.avatar.as_deref(), fallback_image),
        site: site_origin(&clicked.link),
        articles: project_author_detail(all, &clicked.author),
    }
}

/// The statistics footer, two lines.
pub fn stats_lines(stats: &FeedStatistics) -> [String; 2] {
    [
        format!(
            "Subscribed: {}   Active: {}   Articles: {}",
            stats.friends_num, stats.active_num, stats.article_num
        ),
        format!("Updated: {}", stats.last_updated_time),
    ]
}
