use async_trait::async_trait;

use crate::domain::search::{Facets, Page, Result, SearchParams, Suggestion, TermHit};

/// Inbound port for term search.
///
/// This trait defines the use cases that HTTP handlers can invoke. Every
/// operation is read-only and independent of other requests.
#[async_trait]
pub trait TermSearch: Send + Sync + 'static {
    /// Filtered, ranked and paginated search over the term corpus.
    async fn search(&self, params: SearchParams) -> Result<Page<TermHit>>;

    /// At most ten terms whose text starts with `query`.
    async fn suggest(&self, query: &str) -> Result<Vec<Suggestion>>;

    /// Every term with its vote tally, ordered by id.
    async fn export(&self) -> Result<Page<TermHit>>;

    /// Distinct languages and domains for filter pickers.
    async fn facets(&self) -> Result<Facets>;

    /// Check that the term store is reachable.
    async fn health(&self) -> Result<()>;
}
