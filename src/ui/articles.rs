use crate::app::App;
use crate::util::{display_width, sanitize_line, truncate_to_width};
use crate::widget::{display_date, LoadState};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use super::loop_runner::SPINNER_FRAMES;

const SPINNER: [&str; SPINNER_FRAMES] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Render the article list with its trailing "load more" row.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let inner_width = area.width.saturating_sub(2) as usize;
    let focused = app.dropdown.is_none() && app.overlay_row.is_none();

    let mut items: Vec<ListItem> = app
        .instance
        .rendered()
        .enumerate()
        .map(|(i, article)| {
            let date = display_date(&article.created);
            let author = sanitize_line(&article.author);
            let title = sanitize_line(&article.title);

            // title  author  date
            let tail_width = display_width(&author) + display_width(date) + 4;
            let title_width = inner_width.saturating_sub(tail_width).max(8);
            let title = truncate_to_width(&title, title_width).into_owned();

            let title_style = if i == app.selected && focused {
                app.style("article_selected")
            } else {
                app.style("article_title")
            };

            ListItem::new(Line::from(vec![
                Span::styled(title, title_style),
                Span::raw("  "),
                Span::styled(author.into_owned(), app.style("article_author")),
                Span::raw("  "),
                Span::styled(date.to_string(), app.style("article_date")),
            ]))
        })
        .collect();

    if app.instance.has_more() {
        let style = if app.is_load_more_row(app.selected) && focused {
            app.style("article_selected")
        } else {
            app.style("load_more")
        };
        items.push(ListItem::new(Line::from(Span::styled("  Load more", style))));
    }

    if items.is_empty() {
        let placeholder = match app.instance.state() {
            LoadState::Idle | LoadState::Loading => {
                format!("{} Loading...", SPINNER[app.spinner_frame % SPINNER_FRAMES])
            }
            LoadState::Failed(_) => "Feed unavailable. Press r to retry.".to_string(),
            LoadState::Ready(_) => "No articles".to_string(),
        };
        items.push(ListItem::new(placeholder));
    }

    let title = if app.instance.is_loading() && app.instance.rendered_len() > 0 {
        format!(
            " Articles {} ",
            SPINNER[app.spinner_frame % SPINNER_FRAMES]
        )
    } else {
        format!(
            " Articles ({}/{}) ",
            app.instance.rendered_len(),
            app.instance.articles().len()
        )
    };

    let border_style = if focused {
        app.style("panel_border_focused")
    } else {
        app.style("panel_border")
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title),
    );

    let mut state = ListState::default();
    if app.row_count() > 0 {
        state.select(Some(app.selected));
    }
    f.render_stateful_widget(list, area, &mut state);
}
