pub mod cascade;
pub mod meta;
pub mod tables;

use tracing::{debug, warn};

use super::dom::Page;
use super::sections::SectionId;
use cascade::Strategy;

/// Rendered form of a field that could not be extracted.
pub const NOT_AVAILABLE: &str = "Information not available";
/// Log text for a field whose extraction hit an internal error.
pub const CONTENT_UNAVAILABLE: &str = "Content unavailable";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unavailable {
    /// No strategy found the section.
    NotFound,
    /// The cascade failed internally; the message is kept for diagnostics.
    Failed(String),
}

/// Outcome of extracting one section from one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Text(String),
    Unavailable(Unavailable),
}

impl Extraction {
    pub fn is_available(&self) -> bool {
        matches!(self, Extraction::Text(_))
    }

    /// Text for the public record. Both unavailable kinds render the same.
    pub fn into_field(self) -> String {
        match self {
            Extraction::Text(t) => t,
            Extraction::Unavailable(_) => NOT_AVAILABLE.to_string(),
        }
    }
}

/// Run the cascade for `id` against `page`. Never fails: internal errors are
/// logged and reported as [`Unavailable::Failed`].
pub fn extract(page: &Page, id: SectionId) -> Extraction {
    extract_traced(page, id).0
}

/// [`extract`] plus the strategy that produced the text, if any.
pub fn extract_traced(page: &Page, id: SectionId) -> (Extraction, Option<Strategy>) {
    match cascade::run(page, id) {
        Ok(Some((strategy, text))) => {
            debug!(section = %id, ?strategy, chars = text.chars().count(), "Section extracted");
            (Extraction::Text(text), Some(strategy))
        }
        Ok(None) => {
            debug!(section = %id, "{}", NOT_AVAILABLE);
            (Extraction::Unavailable(Unavailable::NotFound), None)
        }
        Err(e) => {
            warn!(section = %id, error = %e, "{}", CONTENT_UNAVAILABLE);
            (Extraction::Unavailable(Unavailable::Failed(e.to_string())), None)
        }
    }
}
