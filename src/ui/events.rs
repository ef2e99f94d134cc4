//! Background task event handling.

use crate::app::{App, AppEvent};

pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::FeedLoaded(report) => {
            tracing::debug!(
                generation = report.generation,
                ok = report.result.is_ok(),
                "Feed load finished"
            );
            app.handle_load_report(report);
        }
    }
}
