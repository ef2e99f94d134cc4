//! Author detail overlay.

use crate::app::App;
use crate::util::{sanitize_line, truncate_to_width};
use crate::widget::display_date;
use ratatui::{
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::helpers::centered_fixed;

pub fn render(f: &mut Frame, app: &App) {
    let Some(detail) = app
        .overlay_row
        .and_then(|row| app.instance.author_detail(row))
    else {
        return;
    };

    let overlay = centered_fixed(70, 14, f.area());
    if overlay.width < 20 || overlay.height < 8 {
        return;
    }
    f.render_widget(Clear, overlay);

    let inner_width = overlay.width.saturating_sub(4) as usize;
    let mut lines = vec![
        Line::from(Span::styled(
            sanitize_line(detail.author).into_owned(),
            app.style("author_name"),
        )),
        Line::from(vec![
            Span::styled("Avatar: ", app.style("author_meta")),
            Span::raw(truncate_to_width(detail.avatar, inner_width.saturating_sub(8)).into_owned()),
        ]),
        Line::from(vec![
            Span::styled("Site:   ", app.style("author_meta")),
            match &detail.site {
                Some(site) => Span::styled(site.clone(), app.style("author_link")),
                None => Span::styled("unknown", app.style("author_meta")),
            },
        ]),
        Line::from(""),
    ];

    for article in &detail.articles {
        let date = display_date(&article.created);
        let title = sanitize_line(&article.title);
        let title_width = inner_width.saturating_sub(date.len() + 3);
        lines.push(Line::from(vec![
            Span::styled(format!("{}  ", date), app.style("article_date")),
            Span::styled(
                truncate_to_width(&title, title_width).into_owned(),
                app.style("article_title"),
            ),
        ]));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(app.style("overlay_border"))
            .title(" Author (o: open site, Esc: close) "),
    );
    f.render_widget(paragraph, overlay);
}
