//! Widget core: author filter, pagination and the projections the UI draws.
//!
//! - [`filter`] - Selected authors and the filtered view
//! - [`pagination`] - Forward-only cursor over the filtered view
//! - [`projector`] - Pure page / overlay / statistics projections
//! - [`instance`] - Acquire/release lifecycle tying the pieces together

mod filter;
mod instance;
mod pagination;
mod projector;

pub use filter::{distinct_authors, FilterState, FilteredView, SelectionSet};
pub use instance::{LoadMode, LoadOutcome, LoadReport, LoadState, WidgetInstance, WidgetOptions};
pub use pagination::{Page, PaginationState, DEFAULT_PAGE_SIZE};
pub use projector::{
    author_detail, display_date, project_author_detail, project_page, resolve_image,
    site_origin, stats_lines, AuthorDetail, AUTHOR_DETAIL_LIMIT,
};
