//! Shared helpers for UI handlers and renderers.

use crate::app::App;
use crate::util::validate_url_for_open;
use ratatui::layout::Rect;

/// Open a feed-supplied URL in the system browser.
///
/// The URL is checked first so that only http(s) addresses reach the OS
/// handler. Failures end up in the status bar.
pub(super) fn open_in_browser(app: &mut App, url: &str) {
    match validate_url_for_open(url) {
        Err(e) => app.set_status(e.to_string()),
        Ok(url) => match open::that(url.as_str()) {
            Ok(()) => {
                tracing::debug!(url = %url, "Opened in browser");
                app.set_status(format!("Opening {}", url));
            }
            Err(e) => app.set_status(format!("Failed to open browser: {}", e)),
        },
    }
}

/// A rectangle of `percent_x` by `percent_y` of `area`, centered in it.
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    centered_fixed(width, height, area)
}

/// A rectangle of at most `width` by `height`, centered in `area`.
pub(super) fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 50);
        assert_eq!(centered_rect(80, 80, area), Rect::new(10, 5, 80, 40));
    }

    #[test]
    fn test_centered_fixed_clamps_to_area() {
        let area = Rect::new(2, 1, 30, 10);
        assert_eq!(centered_fixed(60, 20, area), area);
        assert_eq!(centered_fixed(10, 4, area), Rect::new(12, 4, 10, 4));
    }
}
