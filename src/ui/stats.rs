use crate::app::App;
use crate::util::sanitize_line;
use crate::widget::stats_lines;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Statistics footer. Empty until a payload has loaded.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let Some(stats) = app.instance.statistics() else {
        return;
    };
    let [counts, updated] = stats_lines(stats);
    let lines = vec![
        Line::from(Span::styled(format!(" {}", counts), app.style("stats_counts"))),
        Line::from(Span::styled(
            format!(" {}", sanitize_line(&updated)),
            app.style("stats_updated"),
        )),
    ];
    f.render_widget(Paragraph::new(lines), area);
}
