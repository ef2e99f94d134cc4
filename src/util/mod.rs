//! Small shared helpers.
//!
//! - **URL checks**: only http(s) links from the feed are opened or displayed
//! - **Text**: Unicode-aware width, truncation and control-character stripping

mod text;
mod url_validator;

pub use text::{display_width, sanitize_line, truncate_to_width};
pub use url_validator::{origin_of, validate_url_for_open, UrlValidationError};
