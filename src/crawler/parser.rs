//! HTML parser for listing pages
//!
//! Listing pages expose every resource as an element tagged with `data-cat*`
//! attributes. This module selects the elements of one kind for one language
//! and hands their attributes to the extractor as plain key/value pairs.

use crate::ChefError;
use scraper::{Html, Selector};
use std::collections::HashMap;

/// How a listing element points at its asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// `<a href="...">`
    Link,
    /// `<button onclick="...('path')">`, used for video controls
    Trigger,
}

impl ElementKind {
    /// HTML tag selected for this kind
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Link => "a",
            Self::Trigger => "button",
        }
    }
}

/// One matched listing element
#[derive(Debug, Clone)]
pub struct ListingElement {
    pub kind: ElementKind,

    /// Every attribute on the element, by name
    pub attributes: HashMap<String, String>,
}

impl ListingElement {
    /// Builds an element from attribute pairs
    pub fn new<K, V>(kind: ElementKind, attributes: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            kind,
            attributes: attributes
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Looks up an attribute
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Looks up an attribute the listing contract guarantees
    ///
    /// A missing attribute means the site markup changed under us, which is
    /// reported as [`ChefError::MissingAttribute`].
    pub fn require(&self, name: &str) -> Result<&str, ChefError> {
        self.attr(name).ok_or_else(|| ChefError::MissingAttribute {
            element: self.kind.tag().to_string(),
            attribute: name.to_string(),
        })
    }
}

/// Parses a listing page and returns elements of `kind` for `language_code`
///
/// Elements are returned in document order.
///
/// # Example
///
/// ```
/// use wande_chef::crawler::{parse_listing, ElementKind};
///
/// let html = r#"<a href="/a.pdf" data-cat4="ENG" data-label="A">A</a>
///               <a href="/b.pdf" data-cat4="XHO" data-label="B">B</a>"#;
/// let elements = parse_listing(html, ElementKind::Link, "ENG").unwrap();
/// assert_eq!(elements.len(), 1);
/// assert_eq!(elements[0].attr("href"), Some("/a.pdf"));
/// ```
pub fn parse_listing(
    html: &str,
    kind: ElementKind,
    language_code: &str,
) -> Result<Vec<ListingElement>, ChefError> {
    let document = Html::parse_document(html);

    let selector_text = format!(r#"{}[data-cat4="{}"]"#, kind.tag(), language_code);
    let selector =
        Selector::parse(&selector_text).map_err(|e| ChefError::Selector(format!("{:?}", e)))?;

    let elements = document
        .select(&selector)
        .map(|element| ListingElement::new(kind, element.value().attrs()))
        .collect();

    Ok(elements)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
        <html><body>
            <a href="/docs/one.pdf" data-cat1="Maths" data-cat2="Grade 1" data-cat3="Term 1"
               data-cat4="ENG" data-label="Workbook 1">One</a>
            <a href="/docs/two.pdf" data-cat1="Maths" data-cat2="Grade 1" data-cat3="Term 2"
               data-cat4="XHO" data-label="Workbook 2">Two</a>
            <a href="/about">About</a>
            <button onclick="play('/vids/intro.mp4')" data-cat1="Maths" data-cat2="Grade 2"
                    data-cat3="All" data-cat4="ENG" data-label="Intro">Play</button>
        </body></html>
    "#;

    #[test]
    fn test_selects_links_for_language() {
        let elements = parse_listing(LISTING, ElementKind::Link, "ENG").unwrap();
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].kind, ElementKind::Link);
        assert_eq!(elements[0].attr("data-label"), Some("Workbook 1"));
    }

    #[test]
    fn test_selects_triggers() {
        let elements = parse_listing(LISTING, ElementKind::Trigger, "ENG").unwrap();
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].attr("onclick"), Some("play('/vids/intro.mp4')"));
    }

    #[test]
    fn test_document_order_preserved() {
        let html = r#"
            <a href="/1" data-cat4="ENG">1</a>
            <a href="/2" data-cat4="ENG">2</a>
            <a href="/3" data-cat4="ENG">3</a>
        "#;
        let elements = parse_listing(html, ElementKind::Link, "ENG").unwrap();
        let hrefs: Vec<_> = elements.iter().filter_map(|e| e.attr("href")).collect();
        assert_eq!(hrefs, vec!["/1", "/2", "/3"]);
    }

    #[test]
    fn test_no_matches() {
        let elements = parse_listing("<html></html>", ElementKind::Link, "ENG").unwrap();
        assert!(elements.is_empty());
    }

    #[test]
    fn test_require_missing_attribute() {
        let element = ListingElement::new(ElementKind::Trigger, [("data-cat4", "ENG")]);
        let err = element.require("onclick").unwrap_err();
        match err {
            ChefError::MissingAttribute { element, attribute } => {
                assert_eq!(element, "button");
                assert_eq!(attribute, "onclick");
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
