//! Structured-document parsing for chat model replies.

use crate::engine::retrieval::result::StructuredDocument;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static FENCED_JSON: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:json)?\s*(\{.*\})\s*```").ok());

/// Parses a reply that is supposed to be the canonical JSON document.
/// Tries a fenced block first, then the outermost `{…}` span. Returns `None`
/// when neither reads as a document with a non-blank summary, leaving the
/// degrade decision to the caller.
pub fn try_parse_structured_document(text: &str) -> Option<StructuredDocument> {
    json_candidates(text.trim())
        .into_iter()
        .find_map(parse_candidate)
}

fn parse_candidate(json: &str) -> Option<StructuredDocument> {
    match serde_json::from_str::<StructuredDocument>(json) {
        Ok(doc) if !doc.summary.trim().is_empty() => Some(doc),
        Ok(_) => {
            debug!("Structured reply has an empty summary");
            None
        }
        Err(e) => {
            debug!(error = %e, "Candidate is not a structured document");
            None
        }
    }
}

fn json_candidates(text: &str) -> Vec<&str> {
    let mut candidates = Vec::with_capacity(2);

    if let Some(body) = FENCED_JSON
        .as_ref()
        .and_then(|re| re.captures(text))
        .and_then(|c| c.get(1))
    {
        candidates.push(body.as_str());
    }

    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if end > start {
            let span = &text[start..=end];
            if !candidates.contains(&span) {
                candidates.push(span);
            }
        }
    }

    candidates
}
