//! Keybinding registry: maps actions to key events with config overrides.
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;

// ============================================================================
// Action Enum
// ============================================================================

/// All user-facing actions that can be triggered by keybindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    NavDown,
    NavUp,
    Top,
    Bottom,
    Back,
    Select,
    LoadMore,
    OpenFilter,
    ToggleAuthor,
    ClearFilter,
    AuthorDetail,
    OpenInBrowser,
    OpenAuthorSite,
    Reinitialize,
    Reload,
    CycleTheme,
    ShowHelp,
}

impl Action {
    /// Human-readable description for the help screen.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Quit => "Quit application",
            Self::NavDown => "Navigate down",
            Self::NavUp => "Navigate up",
            Self::Top => "Jump to first row",
            Self::Bottom => "Jump to last row",
            Self::Back => "Go back / dismiss",
            Self::Select => "Load more / show author",
            Self::LoadMore => "Load more articles",
            Self::OpenFilter => "Open author filter",
            Self::ToggleAuthor => "Toggle author",
            Self::ClearFilter => "Clear author filter",
            Self::AuthorDetail => "Show author details",
            Self::OpenInBrowser => "Open article in browser",
            Self::OpenAuthorSite => "Open author site",
            Self::Reinitialize => "Re-initialize widget",
            Self::Reload => "Reload feed from network",
            Self::CycleTheme => "Cycle theme",
            Self::ShowHelp => "Show help",
        }
    }
}

// ============================================================================
// Context Enum
// ============================================================================

/// Dispatch context; determines which bindings are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    /// The article list.
    Global,
    /// Author filter dropdown is open.
    Dropdown,
    /// Author detail overlay is open.
    Overlay,
}

impl Context {
    pub fn name(self) -> &'static str {
        match self {
            Self::Global => "Article list",
            Self::Dropdown => "Author filter",
            Self::Overlay => "Author details",
        }
    }
}

// ============================================================================
// Key Specification
// ============================================================================

/// A key event: code + modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySpec {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeySpec {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    const fn ch(c: char) -> Self {
        Self::plain(KeyCode::Char(c))
    }
}

/// Parse a key string from config into a KeySpec.
///
/// Supported formats:
/// - Single char: "q", "j", "/"
/// - Named keys: "Enter", "Esc", "Tab", "Up", "Down", "Home", "End", "Space"
/// - Modifier combos: "Ctrl+d"
/// - Function keys: "F1" through "F12"
fn parse_key_string(s: &str) -> Option<KeySpec> {
    let s = s.trim();

    if let Some(rest) = s.strip_prefix("Ctrl+") {
        let mut chars = rest.trim().chars();
        return match (chars.next(), chars.next()) {
            (Some(c), None) => Some(KeySpec::ctrl(c)),
            _ => None,
        };
    }

    match s.to_lowercase().as_str() {
        "enter" | "return" => return Some(KeySpec::plain(KeyCode::Enter)),
        "esc" | "escape" => return Some(KeySpec::plain(KeyCode::Esc)),
        "tab" => return Some(KeySpec::plain(KeyCode::Tab)),
        "up" => return Some(KeySpec::plain(KeyCode::Up)),
        "down" => return Some(KeySpec::plain(KeyCode::Down)),
        "home" => return Some(KeySpec::plain(KeyCode::Home)),
        "end" => return Some(KeySpec::plain(KeyCode::End)),
        "backspace" => return Some(KeySpec::plain(KeyCode::Backspace)),
        "space" => return Some(KeySpec::ch(' ')),
        _ => {}
    }

    if let Some(n) = s
        .strip_prefix(['F', 'f'])
        .and_then(|rest| rest.parse::<u8>().ok())
    {
        if (1..=12).contains(&n) {
            return Some(KeySpec::plain(KeyCode::F(n)));
        }
    }

    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(KeySpec::ch(c)),
        _ => None,
    }
}

/// Format a KeySpec as a human-readable string for the help screen.
fn format_key(key: &KeySpec) -> String {
    let modifier = if key.modifiers.contains(KeyModifiers::CONTROL) {
        "Ctrl+"
    } else {
        ""
    };

    let key_name = match key.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => "?".to_string(),
    };

    format!("{}{}", modifier, key_name)
}

// ============================================================================
// Keybinding Registry
// ============================================================================

/// Registry of keybindings, supporting default bindings and config overrides.
///
/// The same key can map to different actions in different contexts; a key
/// not bound in the active context falls back to its Global binding.
pub struct KeybindingRegistry {
    lookup: HashMap<(Context, KeySpec), Action>,
    /// All bindings, in registration order, for the help screen.
    bindings: Vec<(Context, KeySpec, Action)>,
}

impl KeybindingRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            lookup: HashMap::new(),
            bindings: Vec::new(),
        };
        registry.register_defaults();
        registry
    }

    fn bind(&mut self, context: Context, key: KeySpec, action: Action) {
        self.lookup.insert((context, key), action);
        self.bindings.push((context, key, action));
    }

    fn register_defaults(&mut self) {
        use Context::{Dropdown, Global, Overlay};

        let defaults = [
            // === Article list ===
            (Global, KeySpec::ch('q'), Action::Quit),
            (Global, KeySpec::ctrl('c'), Action::Quit),
            (Global, KeySpec::ch('j'), Action::NavDown),
            (Global, KeySpec::plain(KeyCode::Down), Action::NavDown),
            (Global, KeySpec::ch('k'), Action::NavUp),
            (Global, KeySpec::plain(KeyCode::Up), Action::NavUp),
            (Global, KeySpec::ch('g'), Action::Top),
            (Global, KeySpec::plain(KeyCode::Home), Action::Top),
            (Global, KeySpec::ch('G'), Action::Bottom),
            (Global, KeySpec::plain(KeyCode::End), Action::Bottom),
            (Global, KeySpec::plain(KeyCode::Esc), Action::Back),
            (Global, KeySpec::plain(KeyCode::Enter), Action::Select),
            (Global, KeySpec::ch('m'), Action::LoadMore),
            (Global, KeySpec::ch('f'), Action::OpenFilter),
            (Global, KeySpec::ch('c'), Action::ClearFilter),
            (Global, KeySpec::ch('a'), Action::AuthorDetail),
            (Global, KeySpec::ch('o'), Action::OpenInBrowser),
            (Global, KeySpec::ch('r'), Action::Reinitialize),
            (Global, KeySpec::ch('R'), Action::Reload),
            (Global, KeySpec::ch('T'), Action::CycleTheme),
            (Global, KeySpec::ch('?'), Action::ShowHelp),
            // === Author filter dropdown ===
            (Dropdown, KeySpec::ch(' '), Action::ToggleAuthor),
            (Dropdown, KeySpec::plain(KeyCode::Enter), Action::ToggleAuthor),
            (Dropdown, KeySpec::ch('f'), Action::Back),
            // === Author overlay ===
            (Overlay, KeySpec::ch('o'), Action::OpenAuthorSite),
            (Overlay, KeySpec::ch('a'), Action::Back),
            (Overlay, KeySpec::plain(KeyCode::Enter), Action::Back),
        ];

        for (context, key, action) in defaults {
            self.bind(context, key, action);
        }
    }

    /// Apply user overrides from the config keybindings map.
    ///
    /// Keys in the map are action names (e.g., "quit", "load_more").
    /// Values are key strings (e.g., "q", "Ctrl+d", "F5").
    ///
    /// Returns a list of warnings for unrecognized action names or unparseable keys.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Vec<String> {
        let mut warnings = Vec::new();

        for (action_name, key_str) in overrides {
            let Some(action) = parse_action_name(action_name) else {
                warnings.push(format!("Unknown action '{}', ignoring", action_name));
                continue;
            };

            let Some(key) = parse_key_string(key_str) else {
                warnings.push(format!(
                    "Cannot parse key '{}' for action '{}', ignoring",
                    key_str, action_name
                ));
                continue;
            };

            let mut contexts: Vec<Context> = Vec::new();
            for (ctx, _, a) in &self.bindings {
                if *a == action && !contexts.contains(ctx) {
                    contexts.push(*ctx);
                }
            }

            self.lookup.retain(|_, a| *a != action);
            self.bindings.retain(|(_, _, a)| *a != action);

            for ctx in contexts {
                self.bind(ctx, key, action);
            }

            tracing::info!(
                action = %action_name,
                key = %key_str,
                "Applied keybinding override"
            );
        }

        warnings
    }

    /// Look up the action for a key in a context, falling back to Global.
    pub fn action_for_key(
        &self,
        code: KeyCode,
        modifiers: KeyModifiers,
        context: Context,
    ) -> Option<Action> {
        let key = KeySpec::new(code, modifiers);

        if let Some(&action) = self.lookup.get(&(context, key)) {
            return Some(action);
        }

        if context != Context::Global {
            if let Some(&action) = self.lookup.get(&(Context::Global, key)) {
                return Some(action);
            }
        }

        None
    }

    /// All bindings for the help screen as
    /// (context, key display string, action, description) tuples.
    pub fn all_bindings(&self) -> Vec<(Context, String, Action, &'static str)> {
        self.bindings
            .iter()
            .map(|(ctx, key, action)| (*ctx, format_key(key), *action, action.describe()))
            .collect()
    }
}

impl Default for KeybindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse an action name string (from config) into an Action.
fn parse_action_name(name: &str) -> Option<Action> {
    match name.to_lowercase().as_str() {
        "quit" => Some(Action::Quit),
        "nav_down" | "down" => Some(Action::NavDown),
        "nav_up" | "up" => Some(Action::NavUp),
        "top" => Some(Action::Top),
        "bottom" => Some(Action::Bottom),
        "back" => Some(Action::Back),
        "select" | "enter" => Some(Action::Select),
        "load_more" | "loadmore" | "more" => Some(Action::LoadMore),
        "open_filter" | "filter" => Some(Action::OpenFilter),
        "toggle_author" | "toggle" => Some(Action::ToggleAuthor),
        "clear_filter" | "clear" => Some(Action::ClearFilter),
        "author_detail" | "author" => Some(Action::AuthorDetail),
        "open_in_browser" | "open" => Some(Action::OpenInBrowser),
        "open_author_site" | "open_site" => Some(Action::OpenAuthorSite),
        "reinitialize" | "reinit" => Some(Action::Reinitialize),
        "reload" | "refresh" => Some(Action::Reload),
        "cycle_theme" | "theme" => Some(Action::CycleTheme),
        "show_help" | "help" => Some(Action::ShowHelp),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
