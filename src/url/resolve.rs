use crate::{ChefError, UrlError};
use url::Url;

/// Resolves a link `href` against the site root
///
/// Relative and root-relative paths are joined onto `root`; absolute URLs
/// are returned as-is. Only HTTP(S) results are accepted.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use wande_chef::url::resolve_href;
///
/// let root = Url::parse("https://fundawande.org").unwrap();
/// let url = resolve_href(&root, "/img/workbook 1.pdf").unwrap();
/// assert_eq!(url.as_str(), "https://fundawande.org/img/workbook%201.pdf");
/// ```
pub fn resolve_href(root: &Url, href: &str) -> Result<Url, UrlError> {
    let href = href.trim();

    let url = root.join(href).map_err(|_| UrlError::Resolve {
        base: root.to_string(),
        href: href.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(UrlError::InvalidScheme(other.to_string())),
    }
}

/// Pulls the asset path out of an inline trigger action
///
/// Trigger elements carry actions such as `playVideo('/media/a.mp4')`; the
/// target is the first single-quoted segment. Returns `None` when the action
/// has no quoted segment at all.
pub fn action_target(action: &str) -> Option<&str> {
    action.split('\'').nth(1)
}

/// Resolves the asset referenced by a trigger action against the site root
///
/// An action without a quoted target breaks the listing markup contract and
/// is reported as [`ChefError::MalformedAction`].
pub fn resolve_action(root: &Url, action: &str) -> Result<Url, ChefError> {
    let target = action_target(action).ok_or_else(|| ChefError::MalformedAction {
        value: action.to_string(),
    })?;

    Ok(resolve_href(root, target)?)
}
