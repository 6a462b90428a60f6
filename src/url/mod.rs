//! URL handling module for Wande-Chef
//!
//! Listing elements reference their assets relative to the site root, either
//! through a plain `href` or through an inline `onclick` action on a
//! trigger element. This module turns both forms into absolute URLs.

mod resolve;

pub use resolve::{action_target, resolve_action, resolve_href};

/// Returns true when `url` points at an asset with the given extension
///
/// The comparison is a plain suffix check on the full URL string.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use wande_chef::url::has_extension;
///
/// let url = Url::parse("https://example.org/media/intro.mp4").unwrap();
/// assert!(has_extension(&url, "mp4"));
/// assert!(!has_extension(&url, "pdf"));
/// ```
pub fn has_extension(url: &::url::Url, extension: &str) -> bool {
    url.as_str().ends_with(extension)
}
