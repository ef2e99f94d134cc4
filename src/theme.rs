//! Theme system for the TUI.
//!
//! Semantic color roles map to ratatui `Style` values. `ThemeVariant`
//! selects between the Dark and Light palettes and `StyleMap` resolves role
//! names to concrete styles.

use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;

// ============================================================================
// Theme Variant
// ============================================================================

/// Available theme variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name from a string (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// Dark → Light → Dark.
    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

// ============================================================================
// Color Palette
// ============================================================================

/// Every semantic UI role mapped to a `Style`.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Article list --
    pub article_title: Style,
    pub article_author: Style,
    pub article_date: Style,
    pub article_selected: Style,
    pub load_more: Style,

    // -- Author filter --
    pub filter_caption: Style,
    pub filter_checked: Style,
    pub filter_unchecked: Style,
    pub filter_selected: Style,

    // -- Author overlay --
    pub author_name: Style,
    pub author_link: Style,
    pub author_meta: Style,

    // -- Statistics --
    pub stats_counts: Style,
    pub stats_updated: Style,

    // -- Chrome --
    pub status_bar: Style,
    pub status_error: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,
    pub overlay_border: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            article_title: Style::default().add_modifier(Modifier::BOLD),
            article_author: Style::default().fg(Color::Cyan),
            article_date: Style::default().fg(Color::DarkGray),
            article_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            load_more: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),

            filter_caption: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            filter_checked: Style::default().fg(Color::Green),
            filter_unchecked: Style::default(),
            filter_selected: Style::default().bg(Color::DarkGray).fg(Color::White),

            author_name: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            author_link: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
            author_meta: Style::default().fg(Color::DarkGray),

            stats_counts: Style::default().fg(Color::Gray),
            stats_updated: Style::default().fg(Color::DarkGray),

            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            status_error: Style::default().bg(Color::DarkGray).fg(Color::Red),
            panel_border: Style::default(),
            panel_border_focused: Style::default().fg(Color::Cyan),
            overlay_border: Style::default().fg(Color::Yellow),
        }
    }

    /// Adapted for light terminal backgrounds.
    fn light() -> Self {
        Self {
            article_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            article_author: Style::default().fg(Color::Blue),
            article_date: Style::default().fg(Color::DarkGray),
            article_selected: Style::default().bg(Color::Blue).fg(Color::White),
            load_more: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::ITALIC),

            filter_caption: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            filter_checked: Style::default().fg(Color::Green),
            filter_unchecked: Style::default().fg(Color::Black),
            filter_selected: Style::default().bg(Color::Blue).fg(Color::White),

            author_name: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            author_link: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::UNDERLINED),
            author_meta: Style::default().fg(Color::DarkGray),

            stats_counts: Style::default().fg(Color::Black),
            stats_updated: Style::default().fg(Color::DarkGray),

            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            status_error: Style::default().bg(Color::White).fg(Color::Red),
            panel_border: Style::default().fg(Color::DarkGray),
            panel_border_focused: Style::default().fg(Color::Blue),
            overlay_border: Style::default().fg(Color::Magenta),
        }
    }
}

// ============================================================================
// Style Map
// ============================================================================

/// String-keyed style lookup, built from a `ColorPalette`.
#[derive(Debug, Clone)]
pub struct StyleMap {
    map: HashMap<&'static str, Style>,
}

/// All semantic role names, in declaration order.
const ROLE_NAMES: [&str; 19] = [
    "article_title",
    "article_author",
    "article_date",
    "article_selected",
    "load_more",
    "filter_caption",
    "filter_checked",
    "filter_unchecked",
    "filter_selected",
    "author_name",
    "author_link",
    "author_meta",
    "stats_counts",
    "stats_updated",
    "status_bar",
    "status_error",
    "panel_border",
    "panel_border_focused",
    "overlay_border",
];

impl StyleMap {
    pub fn from_palette(p: &ColorPalette) -> Self {
        let styles: [Style; 19] = [
            p.article_title,
            p.article_author,
            p.article_date,
            p.article_selected,
            p.load_more,
            p.filter_caption,
            p.filter_checked,
            p.filter_unchecked,
            p.filter_selected,
            p.author_name,
            p.author_link,
            p.author_meta,
            p.stats_counts,
            p.stats_updated,
            p.status_bar,
            p.status_error,
            p.panel_border,
            p.panel_border_focused,
            p.overlay_border,
        ];

        let map = ROLE_NAMES
            .iter()
            .copied()
            .zip(styles)
            .collect::<HashMap<_, _>>();

        Self { map }
    }

    /// Resolve a role name to its `Style`. Returns `Style::default()` for unknown roles.
    pub fn resolve(&self, role: &str) -> Style {
        self.map.get(role).copied().unwrap_or_default()
    }
}

// ============================================================================
// Tests
// ============================================================================
