//! Author filter: the caption bar and the checkbox dropdown.

use crate::app::App;
use crate::util::{sanitize_line, truncate_to_width};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

/// One-line caption above the list: the filter label and how to open it.
pub fn render_caption(f: &mut Frame, app: &App, area: Rect) {
    let label = app.instance.filter().label();
    let line = Line::from(vec![
        Span::styled(format!(" ▼ {} ", label), app.style("filter_caption")),
        Span::styled("(f)", app.style("article_date")),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

/// Dropdown anchored under the caption, listing every author with a checkbox.
pub fn render_dropdown(f: &mut Frame, app: &App, anchor: Rect) {
    let Some(dropdown) = app.dropdown else {
        return;
    };
    let filter = app.instance.filter();
    let authors = filter.authors();

    let area = f.area();
    let width = 40u16.min(area.width.saturating_sub(anchor.x));
    let max_height = area.height.saturating_sub(anchor.y + 1);
    let wanted = u16::try_from(authors.len()).unwrap_or(u16::MAX).saturating_add(2);
    let height = wanted.min(max_height);
    if width < 10 || height < 3 {
        return;
    }
    let popup = Rect::new(anchor.x, anchor.y + 1, width, height);
    f.render_widget(Clear, popup);

    let text_width = width.saturating_sub(6) as usize;
    let items: Vec<ListItem> = authors
        .iter()
        .enumerate()
        .map(|(i, author)| {
            let checked = filter.selection().is_selected(author);
            let mark = if checked { "[x] " } else { "[ ] " };
            let style = if i == dropdown.selected {
                app.style("filter_selected")
            } else if checked {
                app.style("filter_checked")
            } else {
                app.style("filter_unchecked")
            };
            let name = sanitize_line(author);
            let name = truncate_to_width(&name, text_width).into_owned();
            ListItem::new(Line::from(Span::styled(format!("{}{}", mark, name), style)))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(app.style("overlay_border"))
            .title(format!(" {} ", filter.label())),
    );

    let mut state = ListState::default();
    state.select(Some(dropdown.selected));
    f.render_stateful_widget(list, popup, &mut state);
}
