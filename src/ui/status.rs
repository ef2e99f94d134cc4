use crate::app::App;
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

/// Render the status bar: the current message, or key hints.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let (text, style): (Cow<'_, str>, _) = if let Some((msg, _)) = &app.status_message {
        let role = if msg.starts_with("Feed unavailable") {
            "status_error"
        } else {
            "status_bar"
        };
        (Cow::Borrowed(msg.as_ref()), app.style(role))
    } else if app.overlay_row.is_some() {
        (Cow::Borrowed("[o]pen site [Esc]close [q]uit"), app.style("status_bar"))
    } else if app.dropdown.is_some() {
        (
            Cow::Borrowed("[Space]toggle [c]lear [j/k]move [Esc]close"),
            app.style("status_bar"),
        )
    } else {
        (
            Cow::Borrowed("[f]ilter [Enter]author/more [o]pen [r]einit [R]eload [?]help [q]uit"),
            app.style("status_bar"),
        )
    };

    f.render_widget(Paragraph::new(text).style(style), area);
}
