use crate::config::Config;
use crate::feed::{FeedCache, FeedLoader, LoadSource};
use crate::keybindings::KeybindingRegistry;
use crate::storage::Database;
use crate::theme::{StyleMap, ThemeVariant};
use crate::widget::{LoadMode, LoadOutcome, LoadReport, WidgetInstance};
use anyhow::Result;
use ratatui::style::Style;
use reqwest::redirect::Policy;
use std::borrow::Cow;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// How long a status message stays visible.
const STATUS_TTL: Duration = Duration::from_secs(3);

// ============================================================================
// HTTP Client Configuration
// ============================================================================

/// Redirect policy: at most 3 hops, loops rejected.
fn create_redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= 3 {
            return attempt.error("Too many redirects (max 3)");
        }

        let url = attempt.url();
        if attempt.previous().iter().any(|prev| prev.as_str() == url.as_str()) {
            return attempt.error("Redirect loop detected");
        }

        tracing::debug!(
            from = %attempt.previous().last().map(|u| u.as_str()).unwrap_or("initial"),
            to = %url,
            hop = attempt.previous().len() + 1,
            "Following redirect"
        );

        attempt.follow()
    })
}

/// HTTP client shared by every load.
///
/// No client-wide timeout: the loader bounds each request itself so an
/// expiry always surfaces as `FeedError::Timeout`.
pub fn build_http_client() -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .redirect(create_redirect_policy())
        .pool_max_idle_per_host(2)
        .pool_idle_timeout(Duration::from_secs(30))
        .user_agent(concat!("fclite/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

// ============================================================================
// Events
// ============================================================================

/// Events from background tasks.
#[derive(Debug)]
pub enum AppEvent {
    /// A feed load finished. Carries the generation of the instance that
    /// spawned it.
    FeedLoaded(LoadReport),
}

impl From<LoadReport> for AppEvent {
    fn from(report: LoadReport) -> Self {
        Self::FeedLoaded(report)
    }
}

// ============================================================================
// UI State
// ============================================================================

/// The author filter dropdown, when open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropdownState {
    /// Highlighted author index.
    pub selected: usize,
}

// ============================================================================
// Application State
// ============================================================================

pub struct App {
    pub config: Config,
    pub loader: FeedLoader,

    /// The live widget. Replaced wholesale on re-initialization.
    pub instance: WidgetInstance,
    /// Generation handed to the next acquired instance.
    next_generation: u64,

    // Theme
    pub theme_variant: ThemeVariant,
    pub theme: StyleMap,

    pub keybindings: KeybindingRegistry,

    // UI State
    /// Highlighted row in the article list. The row after the last article is
    /// the "load more" trigger while more remain.
    pub selected: usize,
    pub dropdown: Option<DropdownState>,
    /// Row the author overlay was opened from.
    pub overlay_row: Option<usize>,
    pub show_help: bool,
    pub help_scroll_offset: usize,

    /// Status message with expiry. Cow avoids allocating static literals.
    pub status_message: Option<(Cow<'static, str>, Instant)>,

    /// Skip frame renders when nothing changed.
    pub needs_redraw: bool,

    /// Loading spinner frame, advanced by the tick handler.
    pub spinner_frame: usize,
}

impl App {
    /// Build the app around an opened database. The first instance is
    /// acquired but not loaded; call [`App::start_load`].
    pub fn new(config: Config, db: Database) -> Result<Self> {
        let http_client = build_http_client()?;
        let loader = FeedLoader::new(
            http_client,
            FeedCache::new(db),
            config.base_url.clone(),
            config.request_timeout(),
        );

        let theme_variant = ThemeVariant::from_str_name(&config.theme).unwrap_or_else(|| {
            tracing::warn!(theme = %config.theme, "Unknown theme, using dark");
            ThemeVariant::Dark
        });

        let mut keybindings = KeybindingRegistry::new();
        for warning in keybindings.apply_overrides(&config.keybindings) {
            tracing::warn!("{}", warning);
        }

        let instance = WidgetInstance::acquire(config.widget_options(), 1);

        Ok(Self {
            config,
            loader,
            instance,
            next_generation: 2,
            theme_variant,
            theme: StyleMap::from_palette(&theme_variant.palette()),
            keybindings,
            selected: 0,
            dropdown: None,
            overlay_row: None,
            show_help: false,
            help_scroll_offset: 0,
            status_message: None,
            needs_redraw: true,
            spinner_frame: 0,
        })
    }

    /// Resolve a semantic role name to its `Style`.
    pub fn style(&self, role: &str) -> Style {
        self.theme.resolve(role)
    }

    pub fn set_theme(&mut self, variant: ThemeVariant) {
        self.theme_variant = variant;
        self.theme = StyleMap::from_palette(&variant.palette());
        self.needs_redraw = true;
    }

    /// Cycle to the next theme variant. Returns its name for status display.
    pub fn cycle_theme(&mut self) -> &'static str {
        let next = self.theme_variant.next();
        self.set_theme(next);
        next.name()
    }

    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear the status message once it is older than three seconds.
    /// Returns true if a message was cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed() >= STATUS_TTL {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    // ------------------------------------------------------------------------
    // Loading and lifecycle
    // ------------------------------------------------------------------------

    /// Start a load on the current instance.
    pub fn start_load(&mut self, mode: LoadMode, event_tx: &mpsc::Sender<AppEvent>) {
        self.instance
            .spawn_load(self.loader.clone(), mode, event_tx.clone());
    }

    /// Release the current instance and acquire a fresh one, then load it
    /// from the cache (or the network if the cache is stale).
    ///
    /// Filter selection, paging and UI state are discarded. A load still in
    /// flight for the old instance is aborted; if it already sent its report,
    /// the generation check drops it.
    pub fn reinitialize(&mut self, event_tx: &mpsc::Sender<AppEvent>) {
        let generation = self.next_generation;
        self.next_generation = self.next_generation.wrapping_add(1);

        self.instance.release();
        self.instance = WidgetInstance::acquire(self.config.widget_options(), generation);
        tracing::info!(generation, "Re-initialized widget");

        self.selected = 0;
        self.dropdown = None;
        self.overlay_row = None;
        self.start_load(LoadMode::CacheFirst, event_tx);
    }

    /// Apply a finished load and report the outcome in the status bar.
    pub fn handle_load_report(&mut self, report: LoadReport) {
        match self.instance.apply_report(report) {
            LoadOutcome::Stale => {}
            LoadOutcome::Loaded { source, articles } => {
                self.selected = 0;
                self.dropdown = None;
                self.overlay_row = None;
                let origin = match source {
                    LoadSource::Cache => "cache",
                    LoadSource::Network => "network",
                };
                self.set_status(format!("Loaded {} articles from {}", articles, origin));
            }
            LoadOutcome::Failed(message) => self.set_status(message),
        }
    }

    // ------------------------------------------------------------------------
    // Article list
    // ------------------------------------------------------------------------

    /// Rows in the article list, including the "load more" row.
    pub fn row_count(&self) -> usize {
        self.instance.rendered_len() + usize::from(self.instance.has_more())
    }

    pub fn is_load_more_row(&self, row: usize) -> bool {
        self.instance.has_more() && row == self.instance.rendered_len()
    }

    pub fn nav_down(&mut self) {
        if let Some(dropdown) = self.dropdown.as_mut() {
            let last = self.instance.filter().authors().len().saturating_sub(1);
            dropdown.selected = (dropdown.selected + 1).min(last);
            return;
        }
        let last = self.row_count().saturating_sub(1);
        self.selected = (self.selected + 1).min(last);
    }

    pub fn nav_up(&mut self) {
        if let Some(dropdown) = self.dropdown.as_mut() {
            dropdown.selected = dropdown.selected.saturating_sub(1);
            return;
        }
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn nav_top(&mut self) {
        match self.dropdown.as_mut() {
            Some(dropdown) => dropdown.selected = 0,
            None => self.selected = 0,
        }
    }

    pub fn nav_bottom(&mut self) {
        match self.dropdown.as_mut() {
            Some(dropdown) => {
                dropdown.selected = self.instance.filter().authors().len().saturating_sub(1)
            }
            None => self.selected = self.row_count().saturating_sub(1),
        }
    }

    /// Append the next page. The highlight moves to the first new article.
    pub fn load_more(&mut self) {
        let before = self.instance.rendered_len();
        let added = self.instance.load_more();
        if added == 0 {
            self.set_status("No more articles");
        } else {
            self.selected = before;
        }
    }

    /// Flip the highlighted author in the open dropdown. The list restarts
    /// from its first page.
    pub fn toggle_selected_author(&mut self) {
        let Some(dropdown) = self.dropdown else {
            return;
        };
        let Some(author) = self
            .instance
            .filter()
            .authors()
            .get(dropdown.selected)
            .cloned()
        else {
            return;
        };
        if self.instance.toggle_author(&author) {
            self.selected = 0;
        }
    }

    pub fn clear_filter(&mut self) {
        if self.instance.clear_filter() {
            self.selected = 0;
            self.set_status("Author filter cleared");
        }
    }

    pub fn open_dropdown(&mut self) {
        if self.instance.filter().authors().is_empty() {
            self.set_status("No authors to filter");
            return;
        }
        self.dropdown = Some(DropdownState::default());
    }

    /// Open the author overlay for the highlighted article.
    pub fn open_author_overlay(&mut self) {
        if self.instance.rendered_article(self.selected).is_some() {
            self.overlay_row = Some(self.selected);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
