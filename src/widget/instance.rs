//! One live widget: the loaded feed plus everything derived from it.
//!
//! An instance is acquired with explicit options and a generation number and
//! lives until it is released. Releasing aborts the in-flight load; any result
//! that still arrives carries the old generation and is dropped.

use std::fmt::Write as _;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::feed::{Article, FeedError, FeedLoader, FeedStatistics, LoadSource, LoadedFeed};
use crate::util::sanitize_line;

use super::filter::{FilterState, FilteredView};
use super::pagination::{PaginationState, DEFAULT_PAGE_SIZE};
use super::projector::{author_detail, display_date, project_page, stats_lines, AuthorDetail};

/// Per-instance settings, fixed at acquisition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetOptions {
    pub page_size: usize,
    pub fallback_image_url: String,
}

impl Default for WidgetOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            fallback_image_url: crate::config::DEFAULT_FALLBACK_IMAGE_URL.to_string(),
        }
    }
}

/// Whether a load may be answered from the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    CacheFirst,
    Network,
}

/// Completion message of a spawned load, tagged with the generation of the
/// instance that started it.
#[derive(Debug)]
pub struct LoadReport {
    pub generation: u64,
    pub result: Result<LoadedFeed, FeedError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready(LoadSource),
    /// The last load failed. Whatever was rendered before stays.
    Failed(String),
}

/// What applying a [`LoadReport`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Report belonged to a released instance; nothing changed.
    Stale,
    Loaded { source: LoadSource, articles: usize },
    Failed(String),
}

pub struct WidgetInstance {
    generation: u64,
    options: WidgetOptions,
    articles: Vec<Article>,
    statistics: Option<FeedStatistics>,
    filter: FilterState,
    view: FilteredView,
    paging: PaginationState,
    /// Positions into `articles`, in the order they were appended.
    rendered: Vec<usize>,
    has_more: bool,
    state: LoadState,
    load_handle: Option<JoinHandle<()>>,
}

impl WidgetInstance {
    /// Fresh instance with nothing loaded. A page size of zero falls back to
    /// the default.
    pub fn acquire(mut options: WidgetOptions, generation: u64) -> Self {
        if options.page_size == 0 {
            options.page_size = DEFAULT_PAGE_SIZE;
        }
        tracing::debug!(generation, page_size = options.page_size, "Acquired widget instance");
        Self {
            generation,
            options,
            articles: Vec::new(),
            statistics: None,
            filter: FilterState::default(),
            view: FilteredView::default(),
            paging: PaginationState::new(),
            rendered: Vec::new(),
            has_more: false,
            state: LoadState::Idle,
            load_handle: None,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn options(&self) -> &WidgetOptions {
        &self.options
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    /// Start loading in the background. At most one load is in flight: a
    /// previous one is aborted first.
    ///
    /// The report goes out on `tx` tagged with this instance's generation.
    pub fn spawn_load<E>(&mut self, loader: FeedLoader, mode: LoadMode, tx: mpsc::Sender<E>)
    where
        E: From<LoadReport> + Send + 'static,
    {
        if let Some(handle) = self.load_handle.take() {
            handle.abort();
            tracing::debug!(generation = self.generation, "Aborted previous feed load");
        }

        self.state = LoadState::Loading;
        let generation = self.generation;
        tracing::debug!(generation, ?mode, "Spawning feed load");

        self.load_handle = Some(tokio::spawn(async move {
            let result = match mode {
                LoadMode::CacheFirst => loader.load().await,
                LoadMode::Network => loader.refresh().await,
            };
            let report = LoadReport { generation, result };
            if tx.send(E::from(report)).await.is_err() {
                tracing::warn!(generation, "Failed to send feed load result (receiver dropped)");
            }
        }));
    }

    /// Apply a finished load.
    ///
    /// A report from another generation is dropped. A failure keeps the
    /// current articles and rendered list as they are. A success replaces the
    /// payload wholesale, clears the author selection and renders page one.
    pub fn apply_report(&mut self, report: LoadReport) -> LoadOutcome {
        if report.generation != self.generation {
            tracing::debug!(
                report = report.generation,
                current = self.generation,
                "Dropping stale feed load result"
            );
            return LoadOutcome::Stale;
        }
        self.load_handle = None;

        match report.result {
            Ok(loaded) => {
                let count = loaded.payload.article_data.len();
                self.articles = loaded.payload.article_data;
                self.statistics = Some(loaded.payload.statistical_data);
                self.filter = FilterState::from_articles(&self.articles);
                self.render_first_page();
                self.state = LoadState::Ready(loaded.source);
                LoadOutcome::Loaded {
                    source: loaded.source,
                    articles: count,
                }
            }
            Err(e) => {
                tracing::warn!(generation = self.generation, error = %e, "Feed load failed");
                let message = e.to_string();
                self.state = LoadState::Failed(message.clone());
                LoadOutcome::Failed(message)
            }
        }
    }

    /// Recompute the view and replace the rendered list with its first page.
    fn render_first_page(&mut self) {
        self.view = self.filter.apply(&self.articles);
        self.paging.reset();
        let first = project_page(self.view.positions(), 0, self.options.page_size);
        self.rendered = first.to_vec();
        self.paging.advance_to(first.len(), self.view.len());
        self.has_more = self.paging.has_more(self.view.len());
    }

    /// Append the next page. Returns how many articles were added; zero once
    /// the view is exhausted.
    pub fn load_more(&mut self) -> usize {
        let page = self
            .paging
            .next_page(self.view.positions(), self.options.page_size);
        self.rendered.extend_from_slice(page.items);
        self.has_more = page.has_more;
        page.items.len()
    }

    /// Flip an author in the filter and restart from page one. Returns false
    /// for an author not present in the loaded feed.
    pub fn toggle_author(&mut self, author: &str) -> bool {
        if !self.filter.toggle(author) {
            return false;
        }
        self.render_first_page();
        true
    }

    /// Deselect every author. Returns false if nothing was selected.
    pub fn clear_filter(&mut self) -> bool {
        if !self.filter.clear() {
            return false;
        }
        self.render_first_page();
        true
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn statistics(&self) -> Option<&FeedStatistics> {
        self.statistics.as_ref()
    }

    /// Articles appended so far, in display order.
    pub fn rendered(&self) -> impl Iterator<Item = &Article> + '_ {
        self.rendered.iter().filter_map(|&i| self.articles.get(i))
    }

    pub fn rendered_len(&self) -> usize {
        self.rendered.len()
    }

    pub fn rendered_article(&self, row: usize) -> Option<&Article> {
        self.rendered.get(row).and_then(|&i| self.articles.get(i))
    }

    /// Whether the "load more" trigger should be shown.
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Articles in the filtered view not yet appended.
    pub fn remaining(&self) -> usize {
        self.view.len().saturating_sub(self.rendered.len())
    }

    /// The rendered list and statistics as plain text, one article per two
    /// lines. Feed strings are sanitized so the output is safe to print.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for article in self.rendered() {
            let _ = writeln!(
                out,
                "{}  {}  ({})",
                sanitize_line(display_date(&article.created)),
                sanitize_line(&article.title),
                sanitize_line(&article.author)
            );
            let _ = writeln!(out, "    {}", sanitize_line(&article.link));
        }
        if self.has_more {
            let _ = writeln!(out, "... {} more", self.remaining());
        }
        if let Some(stats) = &self.statistics {
            let [counts, updated] = stats_lines(stats);
            let _ = writeln!(out);
            let _ = writeln!(out, "{}", sanitize_line(&counts));
            let _ = writeln!(out, "{}", sanitize_line(&updated));
        }
        out
    }

    /// Overlay data for the author of the rendered article at `row`.
    pub fn author_detail(&self, row: usize) -> Option<AuthorDetail<'_>> {
        let clicked = self.rendered_article(row)?;
        Some(author_detail(
            &self.articles,
            clicked,
            &self.options.fallback_image_url,
        ))
    }

    /// Tear down: abort the in-flight load. The instance is unusable for
    /// loading afterwards; state is discarded with it.
    pub fn release(&mut self) {
        if let Some(handle) = self.load_handle.take() {
            handle.abort();
            tracing::debug!(generation = self.generation, "Aborted feed load on release");
        }
    }
}

impl Drop for WidgetInstance {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::FeedPayload;
    use pretty_assertions::assert_eq;

    fn article(author: &str, n: usize) -> Article {
        Article {
            title: format!("{author}-{n}"),
            link: format!("https://{}.example.com/p/{n}", author.to_lowercase()),
            author: author.to_string(),
            avatar: None,
            created: "2026-10-17T00:00:00Z".to_string(),
        }
    }

    /// 30 articles: A at even positions until A has 20, B fills the rest.
    fn thirty() -> Vec<Article> {
        let mut out = Vec::new();
        let (mut a, mut b) = (0, 0);
        for i in 0..30 {
            if (i % 3 != 2 && a < 20) || b >= 10 {
                out.push(article("A", a));
                a += 1;
            } else {
                out.push(article("B", b));
                b += 1;
            }
        }
        out
    }

    fn report(generation: u64, articles: Vec<Article>) -> LoadReport {
        LoadReport {
            generation,
            result: Ok(LoadedFeed {
                payload: FeedPayload {
                    article_data: articles,
                    statistical_data: FeedStatistics::default(),
                },
                source: LoadSource::Network,
            }),
        }
    }

    fn loaded(articles: Vec<Article>) -> WidgetInstance {
        let mut instance = WidgetInstance::acquire(WidgetOptions::default(), 1);
        instance.apply_report(report(1, articles));
        instance
    }

    fn rendered_titles(instance: &WidgetInstance) -> Vec<String> {
        instance.rendered().map(|a| a.title.clone()).collect()
    }

    #[test]
    fn test_scenario_select_and_deselect() {
        let articles = thirty();
        let mut instance = loaded(articles.clone());

        let first: Vec<String> = articles[..24].iter().map(|a| a.title.clone()).collect();
        assert_eq!(rendered_titles(&instance), first);
        assert!(instance.has_more());

        assert!(instance.toggle_author("A"));
        assert_eq!(instance.rendered_len(), 20);
        assert!(instance.rendered().all(|a| a.author == "A"));
        assert!(!instance.has_more());

        assert!(instance.toggle_author("A"));
        assert_eq!(rendered_titles(&instance), first);
        assert!(instance.has_more());
    }

    #[test]
    fn test_load_more_appends_remaining() {
        let mut instance = loaded(thirty());
        assert_eq!(instance.load_more(), 6);
        assert_eq!(instance.rendered_len(), 30);
        assert!(!instance.has_more());
        assert_eq!(instance.load_more(), 0);
        assert_eq!(instance.rendered_len(), 30);
    }

    #[test]
    fn test_toggle_restarts_from_first_page() {
        let articles: Vec<Article> = (0..60).map(|n| article(if n % 2 == 0 { "A" } else { "B" }, n)).collect();
        let mut instance = loaded(articles);
        instance.load_more();
        assert_eq!(instance.rendered_len(), 48);

        instance.toggle_author("B");
        assert_eq!(instance.rendered_len(), 24);
        assert_eq!(instance.rendered_article(0).map(|a| a.title.as_str()), Some("B-1"));
    }

    #[test]
    fn test_toggle_unknown_author_is_noop() {
        let mut instance = loaded(thirty());
        instance.load_more();
        assert!(!instance.toggle_author("Mallory"));
        assert_eq!(instance.rendered_len(), 30);
    }

    #[test]
    fn test_clear_filter() {
        let mut instance = loaded(thirty());
        assert!(!instance.clear_filter());
        instance.toggle_author("B");
        assert!(instance.clear_filter());
        assert_eq!(instance.rendered_len(), 24);
        assert!(instance.filter().selection().is_empty());
    }

    #[test]
    fn test_stale_report_is_dropped() {
        let mut instance = WidgetInstance::acquire(WidgetOptions::default(), 7);
        let outcome = instance.apply_report(report(6, thirty()));
        assert_eq!(outcome, LoadOutcome::Stale);
        assert!(instance.articles().is_empty());
        assert_eq!(instance.state(), &LoadState::Idle);
    }

    #[test]
    fn test_failure_keeps_previous_render() {
        let mut instance = loaded(thirty());
        let outcome = instance.apply_report(LoadReport {
            generation: 1,
            result: Err(FeedError::HttpStatus(502)),
        });
        assert!(matches!(outcome, LoadOutcome::Failed(_)));
        assert_eq!(instance.rendered_len(), 24);
        assert!(matches!(instance.state(), LoadState::Failed(_)));
    }

    #[test]
    fn test_empty_feed() {
        let instance = loaded(Vec::new());
        assert_eq!(instance.rendered_len(), 0);
        assert!(!instance.has_more());
        assert!(instance.filter().authors().is_empty());
    }

    #[test]
    fn test_zero_page_size_falls_back() {
        let options = WidgetOptions {
            page_size: 0,
            ..WidgetOptions::default()
        };
        let instance = WidgetInstance::acquire(options, 0);
        assert_eq!(instance.options().page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_author_detail_ignores_filter() {
        let mut instance = loaded(thirty());
        instance.toggle_author("B");
        let detail = instance.author_detail(0).unwrap();
        assert_eq!(detail.author, "B");
        assert_eq!(detail.articles.len(), 4);
        assert_eq!(detail.avatar, instance.options().fallback_image_url);
        assert!(instance.author_detail(99).is_none());
    }

    #[test]
    fn test_remaining_counts_filtered_view() {
        let mut instance = loaded(thirty());
        assert_eq!(instance.remaining(), 6);

        instance.toggle_author("A");
        assert_eq!(instance.remaining(), 0);

        instance.toggle_author("A");
        instance.load_more();
        assert_eq!(instance.remaining(), 0);
    }

    #[test]
    fn test_plain_text_strips_escape_sequences() {
        let mut articles = thirty();
        articles[0].title = "hi\x1b]0;pwned\x07\x1b[31mRED".to_string();
        articles[0].author = "A\x1b[2J".to_string();
        articles[0].link = "https://a.example.com/\x1b]8;;https://evil.example/\x07x".to_string();
        let mut instance = WidgetInstance::acquire(WidgetOptions::default(), 1);
        let mut report = report(1, articles);
        if let Ok(loaded) = report.result.as_mut() {
            loaded.payload.statistical_data.last_updated_time = "now\x1b[31m".to_string();
        }
        instance.apply_report(report);

        let text = instance.plain_text();
        assert!(!text.contains('\x1b'));
        assert!(!text.contains('\x07'));
        assert!(text.contains("RED"));
        assert!(text.contains("... 6 more"));
        assert!(text.contains("Updated: now"));
    }
}
