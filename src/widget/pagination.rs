//! Incremental paging over the filtered view.

use super::projector::project_page;

/// Items per page when the configuration does not say otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 24;

/// One step of paging: the slice to append and whether anything remains.
#[derive(Debug, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub has_more: bool,
}

/// Cursor into the current filtered view.
///
/// The cursor only moves forward, by the number of items actually handed
/// out, until it reaches the end of the view. The owner resets it whenever
/// the view is recomputed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaginationState {
    cursor: usize,
}

impl PaginationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Hand out `view[cursor .. cursor + page_size]` and advance past it.
    ///
    /// At or beyond the end this returns an empty page with `has_more ==
    /// false`; that is the terminal state, not an error.
    pub fn next_page<'a, T>(&mut self, view: &'a [T], page_size: usize) -> Page<'a, T> {
        let items = project_page(view, self.cursor, page_size);
        self.cursor = self.cursor.saturating_add(items.len());
        Page {
            items,
            has_more: self.cursor < view.len(),
        }
    }

    /// Move the cursor to `position` after the caller rendered a page it
    /// projected itself. Clamped to the view length.
    pub fn advance_to(&mut self, position: usize, view_len: usize) {
        self.cursor = position.min(view_len);
    }

    /// Whether items remain past the cursor.
    pub fn has_more(&self, view_len: usize) -> bool {
        self.cursor < view_len
    }
}
