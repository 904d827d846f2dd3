//! HTTP response types for term search endpoints.
//!
//! These types serialize to the JSON format expected by the glossary frontend.

use serde::Serialize;

use crate::domain::search::{Page, Suggestion, TermHit};

/// One term with its vote counts.
#[derive(Debug, Serialize)]
pub struct TermSummaryResponse {
    pub id: i32,
    pub term: String,
    pub language: String,
    pub domain: String,
    pub definition: String,
    pub upvotes: i64,
    pub downvotes: i64,
}

impl From<TermHit> for TermSummaryResponse {
    fn from(hit: TermHit) -> Self {
        Self {
            id: hit.term.id.as_i32(),
            term: hit.term.term,
            language: hit.term.language,
            domain: hit.term.domain,
            definition: hit.term.definition,
            upvotes: hit.votes.upvotes,
            downvotes: hit.votes.downvotes,
        }
    }
}

/// Response for the search and export endpoints.
#[derive(Debug, Serialize)]
pub struct TermPageResponse {
    pub items: Vec<TermSummaryResponse>,
    /// Matches before pagination
    pub total: usize,
}

impl From<Page<TermHit>> for TermPageResponse {
    fn from(page: Page<TermHit>) -> Self {
        Self {
            items: page.items.into_iter().map(Into::into).collect(),
            total: page.total,
        }
    }
}

/// Typeahead entry.
#[derive(Debug, Serialize)]
pub struct SuggestionResponse {
    pub id: i32,
    pub label: String,
}

impl From<Suggestion> for SuggestionResponse {
    fn from(suggestion: Suggestion) -> Self {
        Self {
            id: suggestion.id.as_i32(),
            label: suggestion.label,
        }
    }
}
