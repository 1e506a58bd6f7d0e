//! Content Normalizer: provider payloads in, section-tagged summaries out.

pub mod formatter;
pub mod parser;
pub mod sections;
pub mod templates;

pub use formatter::{NormalizedContent, Normalizer};
pub use parser::try_parse_structured_document;
pub use sections::{Section, SectionWindow};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Content has no usable sentences")]
    NoUsableSentences,
    #[error("Structured document has an empty summary")]
    EmptySummary,
}
