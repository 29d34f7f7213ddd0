//! Element lookup strategies.
//!
//! The STC page carries almost no stable identifiers, so fields and tables
//! are found by the text they render. Every lookup goes through [`Locate`]
//! so a different matching strategy can be plugged in without touching the
//! field extraction code.

use scraper::{ElementRef, Selector};

use crate::error::{Result, StcError};

/// Finds one element inside a scope element.
pub trait Locate {
    /// Returns the first matching element under `scope`, if any.
    fn locate<'a>(&self, scope: ElementRef<'a>) -> Option<ElementRef<'a>>;
}

/// Parse a CSS selector, mapping the error into [`StcError`].
pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| StcError::Selector(format!("{css}: {e}")))
}

/// Concatenated text content of an element.
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// First element matching a CSS selector whose rendered text contains a
/// given substring.
#[derive(Debug, Clone)]
pub struct TextContains {
    selector: Selector,
    needle: String,
}

impl TextContains {
    pub fn new(css: &str, needle: impl Into<String>) -> Result<Self> {
        Ok(Self {
            selector: selector(css)?,
            needle: needle.into(),
        })
    }

    /// Inline `span` element containing `needle`.
    pub fn span(needle: impl Into<String>) -> Result<Self> {
        Self::new("span", needle)
    }

    /// Data table (`table.tabla`) containing `needle`.
    pub fn table(needle: impl Into<String>) -> Result<Self> {
        Self::new("table.tabla", needle)
    }
}

impl Locate for TextContains {
    fn locate<'a>(&self, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
        scope
            .select(&self.selector)
            .find(|element| element_text(*element).contains(&self.needle))
    }
}

/// First element under the scope matching a CSS selector.
#[derive(Debug, Clone)]
pub struct FirstMatch {
    selector: Selector,
}

impl FirstMatch {
    pub fn new(css: &str) -> Result<Self> {
        Ok(Self {
            selector: selector(css)?,
        })
    }

    /// First `div` that is the `position`-th (1-based) child of its parent.
    pub fn nth_div(position: usize) -> Result<Self> {
        Self::new(&format!("div:nth-child({position})"))
    }
}

impl Locate for FirstMatch {
    fn locate<'a>(&self, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
        scope.select(&self.selector).next()
    }
}
