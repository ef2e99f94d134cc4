use thiserror::Error;
use url::Url;

/// Errors from checking a URL before it is used.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// The URL has no host part.
    #[error("URL has no host")]
    MissingHost,
}

/// Check that a URL taken from the feed is a plain http(s) web address.
///
/// Feed data is remote and untrusted. Anything handed to the system browser
/// or shown as an image source goes through here first, so `file://`,
/// `javascript:` and similar never leave the process.
///
/// # Examples
///
/// ```
/// use fclite::util::validate_url_for_open;
///
/// assert!(validate_url_for_open("https://blog.example.com/post").is_ok());
/// assert!(validate_url_for_open("file:///etc/passwd").is_err());
/// ```
pub fn validate_url_for_open(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str.trim())?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(UrlValidationError::MissingHost),
    }
}

/// `scheme://host[:port]` of a valid http(s) URL.
pub fn origin_of(url_str: &str) -> Result<String, UrlValidationError> {
    let url = validate_url_for_open(url_str)?;
    Ok(url.origin().ascii_serialization())
}
