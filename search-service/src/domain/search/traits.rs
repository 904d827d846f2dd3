//! Trait definitions for search domain abstractions.
//!
//! These traits enable dependency injection and easy testing through mocking.

use async_trait::async_trait;

use super::composer::TermFilter;
use super::ranking::PageRequest;
use super::types::{Facets, Page, PopularityFormula, SortMode, Suggestion, TermHit};

/// Error type for search operations.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("invalid sort_by value '{0}', expected 'name' or 'popularity'")]
    InvalidSortMode(String),

    #[error("page must be at least 1, got {0}")]
    InvalidPage(i64),

    #[error("page_size must be between 1 and {max}, got {got}")]
    InvalidPageSize { got: i64, max: u32 },

    #[error("query must not be empty")]
    EmptyQuery,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for SearchError {
    fn from(e: sqlx::Error) -> Self {
        SearchError::DatabaseError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;

/// Read-only access to the term and vote stores.
///
/// Every method is a single round trip: vote counts are joined in the same
/// query that selects the terms, never fetched per term.
#[async_trait]
pub trait TermRepository: Send + Sync {
    /// Terms passing the store-side part of `filter`, each with its vote tally.
    ///
    /// Language, domain and substring predicates are applied by the store. A
    /// fuzzy text match is left to the caller, so the store returns every term
    /// passing the remaining filters.
    async fn candidates(&self, filter: &TermFilter) -> Result<Vec<TermHit>>;

    /// One ranked page of terms passing `filter`, with the total match count.
    ///
    /// Ordering and the page window are applied by the store, so only the
    /// requested rows leave it. Only valid for filters without a fuzzy text
    /// match; callers handle fuzzy filters through [`candidates`].
    ///
    /// [`candidates`]: TermRepository::candidates
    async fn ranked_page(
        &self,
        filter: &TermFilter,
        sort: SortMode,
        popularity: PopularityFormula,
        page: &PageRequest,
    ) -> Result<Page<TermHit>>;

    /// Up to `limit` terms whose text starts with `prefix`, case-insensitively,
    /// ordered by lowercased text then id.
    async fn suggest(&self, prefix: &str, limit: usize) -> Result<Vec<Suggestion>>;

    /// Distinct languages and domains with term counts.
    async fn facets(&self) -> Result<Facets>;

    /// Cheap connectivity check.
    async fn ping(&self) -> Result<()>;
}
