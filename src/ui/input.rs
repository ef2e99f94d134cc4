//! Keyboard input dispatch.
//!
//! Overlays capture input first (help, then the author overlay, then the
//! filter dropdown); otherwise keys go to the article list.

use crate::app::{App, AppEvent};
use crate::keybindings::{Action as KbAction, Context as KbContext};
use crate::widget::LoadMode;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::helpers::open_in_browser;
use super::Action;

/// Route a key press to the handler for the active context.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    if app.show_help {
        return Ok(handle_help_input(app, code));
    }

    let context = if app.overlay_row.is_some() {
        KbContext::Overlay
    } else if app.dropdown.is_some() {
        KbContext::Dropdown
    } else {
        KbContext::Global
    };

    let Some(action) = app.keybindings.action_for_key(code, modifiers, context) else {
        return Ok(Action::Continue);
    };

    match context {
        KbContext::Overlay => Ok(handle_overlay_action(app, action)),
        KbContext::Dropdown => Ok(handle_dropdown_action(app, action)),
        KbContext::Global => handle_list_action(app, action, event_tx),
    }
}

/// Help overlay: j/k scroll, Esc/q/? dismiss.
fn handle_help_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.show_help = false;
            app.help_scroll_offset = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_sub(1);
        }
        _ => {}
    }
    Action::Continue
}

fn handle_overlay_action(app: &mut App, action: KbAction) -> Action {
    match action {
        KbAction::Quit => return Action::Quit,
        KbAction::Back => app.overlay_row = None,
        KbAction::OpenAuthorSite => {
            let site = app
                .overlay_row
                .and_then(|row| app.instance.author_detail(row))
                .and_then(|detail| detail.site);
            match site {
                Some(url) => open_in_browser(app, &url),
                None => app.set_status("No site address for this author"),
            }
        }
        KbAction::ShowHelp => app.show_help = true,
        _ => {}
    }
    Action::Continue
}

fn handle_dropdown_action(app: &mut App, action: KbAction) -> Action {
    match action {
        KbAction::Quit => return Action::Quit,
        KbAction::Back => app.dropdown = None,
        KbAction::NavDown => app.nav_down(),
        KbAction::NavUp => app.nav_up(),
        KbAction::Top => app.nav_top(),
        KbAction::Bottom => app.nav_bottom(),
        KbAction::ToggleAuthor | KbAction::Select => app.toggle_selected_author(),
        KbAction::ClearFilter => app.clear_filter(),
        KbAction::CycleTheme => {
            let name = app.cycle_theme();
            app.set_status(format!("Theme: {}", name));
        }
        KbAction::ShowHelp => app.show_help = true,
        _ => {}
    }
    Action::Continue
}

fn handle_list_action(
    app: &mut App,
    action: KbAction,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    match action {
        KbAction::Quit => return Ok(Action::Quit),
        KbAction::NavDown => app.nav_down(),
        KbAction::NavUp => app.nav_up(),
        KbAction::Top => app.nav_top(),
        KbAction::Bottom => app.nav_bottom(),
        KbAction::Back => {
            app.status_message = None;
        }
        KbAction::Select => {
            if app.is_load_more_row(app.selected) {
                app.load_more();
            } else {
                app.open_author_overlay();
            }
        }
        KbAction::LoadMore => app.load_more(),
        KbAction::OpenFilter => app.open_dropdown(),
        KbAction::ClearFilter => app.clear_filter(),
        KbAction::AuthorDetail => app.open_author_overlay(),
        KbAction::OpenInBrowser => {
            let link = app
                .instance
                .rendered_article(app.selected)
                .map(|a| a.link.clone());
            match link {
                Some(link) => open_in_browser(app, &link),
                None => app.set_status("No article selected"),
            }
        }
        KbAction::Reinitialize => {
            app.reinitialize(event_tx);
            app.set_status("Re-initializing...");
        }
        KbAction::Reload => {
            if app.instance.is_loading() {
                app.set_status("Load already in progress");
            } else {
                app.start_load(LoadMode::Network, event_tx);
                app.set_status("Reloading from network...");
            }
        }
        KbAction::CycleTheme => {
            let name = app.cycle_theme();
            app.set_status(format!("Theme: {}", name));
        }
        KbAction::ShowHelp => app.show_help = true,
        KbAction::ToggleAuthor | KbAction::OpenAuthorSite => {}
    }
    Ok(Action::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::feed::{Article, FeedPayload, FeedStatistics, LoadSource, LoadedFeed};
    use crate::storage::Database;
    use crate::widget::LoadReport;

    async fn loaded_app(n: usize) -> App {
        let db = Database::open(":memory:").await.unwrap();
        let mut app = App::new(Config::default(), db).unwrap();
        let article_data = (0..n)
            .map(|i| Article {
                title: format!("Post {i}"),
                link: format!("https://example.com/{i}"),
                author: if i % 2 == 0 { "Even" } else { "Odd" }.to_string(),
                avatar: None,
                created: "2026-10-17T00:00:00Z".to_string(),
            })
            .collect();
        app.handle_load_report(LoadReport {
            generation: 1,
            result: Ok(LoadedFeed {
                payload: FeedPayload {
                    article_data,
                    statistical_data: FeedStatistics::default(),
                },
                source: LoadSource::Cache,
            }),
        });
        app
    }

    fn press(app: &mut App, code: KeyCode, tx: &mpsc::Sender<AppEvent>) -> Action {
        handle_input(app, code, KeyModifiers::NONE, tx).unwrap()
    }

    #[tokio::test]
    async fn test_quit() {
        let mut app = loaded_app(3).await;
        let (tx, _rx) = mpsc::channel(4);
        assert!(matches!(press(&mut app, KeyCode::Char('q'), &tx), Action::Quit));
    }

    #[tokio::test]
    async fn test_enter_on_load_more_row_appends() {
        let mut app = loaded_app(30).await;
        let (tx, _rx) = mpsc::channel(4);
        press(&mut app, KeyCode::Char('G'), &tx);
        assert!(app.is_load_more_row(app.selected));

        press(&mut app, KeyCode::Enter, &tx);
        assert_eq!(app.instance.rendered_len(), 30);
        assert!(app.overlay_row.is_none());
    }

    #[tokio::test]
    async fn test_enter_on_article_opens_overlay() {
        let mut app = loaded_app(5).await;
        let (tx, _rx) = mpsc::channel(4);
        press(&mut app, KeyCode::Char('j'), &tx);
        press(&mut app, KeyCode::Enter, &tx);
        assert_eq!(app.overlay_row, Some(1));

        press(&mut app, KeyCode::Esc, &tx);
        assert!(app.overlay_row.is_none());
    }

    #[tokio::test]
    async fn test_dropdown_flow() {
        let mut app = loaded_app(30).await;
        let (tx, _rx) = mpsc::channel(4);

        press(&mut app, KeyCode::Char('f'), &tx);
        assert!(app.dropdown.is_some());

        press(&mut app, KeyCode::Char('j'), &tx);
        press(&mut app, KeyCode::Char(' '), &tx);
        assert!(app.instance.filter().selection().is_selected("Odd"));
        assert_eq!(app.instance.rendered_len(), 15);

        press(&mut app, KeyCode::Esc, &tx);
        assert!(app.dropdown.is_none());
        assert!(app.instance.filter().selection().is_selected("Odd"));
    }

    #[tokio::test]
    async fn test_help_captures_keys() {
        let mut app = loaded_app(3).await;
        let (tx, _rx) = mpsc::channel(4);
        press(&mut app, KeyCode::Char('?'), &tx);
        assert!(app.show_help);

        assert!(matches!(press(&mut app, KeyCode::Char('q'), &tx), Action::Continue));
        assert!(!app.show_help);
    }
}
