//! Search service wiring the composer, vote aggregation and ranking together.

use async_trait::async_trait;

use super::composer::{compose, TermFilter};
use super::fuzzy::FuzzyMatcher;
use super::ranking::{paginate, rank, PageRequest};
use super::traits::{Result, SearchError, TermRepository};
use super::types::{Facets, Page, PopularityFormula, SearchParams, SortMode, Suggestion, TermHit};
use crate::domain::ports::inbound::TermSearch;

/// Hard cap on typeahead results, regardless of configuration.
pub const MAX_SUGGESTIONS: usize = 10;

/// Configuration for the search service.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Page size used when the caller does not give one
    pub default_page_size: u32,
    /// Largest page size a caller may request
    pub max_page_size: u32,
    /// Typeahead result count, capped at [`MAX_SUGGESTIONS`]
    pub suggestion_limit: usize,
    /// Score used by the popularity sort
    pub popularity: PopularityFormula,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
            suggestion_limit: MAX_SUGGESTIONS,
            popularity: PopularityFormula::Upvotes,
        }
    }
}

/// Term search over a [`TermRepository`].
///
/// Candidates come back with their vote tallies already joined. Substring
/// searches are ranked and paged by the store; fuzzy searches fetch every
/// candidate passing the remaining filters and are matched, ranked and paged
/// here.
pub struct SearchService<R>
where
    R: TermRepository,
{
    repository: R,
    matcher: Box<dyn FuzzyMatcher>,
    config: SearchConfig,
}

impl<R> SearchService<R>
where
    R: TermRepository,
{
    pub fn new(repository: R, matcher: Box<dyn FuzzyMatcher>, config: SearchConfig) -> Self {
        Self {
            repository,
            matcher,
            config,
        }
    }

    /// Create a search service with the default matcher and configuration.
    #[cfg(test)]
    pub fn with_defaults(repository: R) -> Self {
        Self::new(
            repository,
            Box::new(super::fuzzy::StrsimMatcher::default()),
            SearchConfig::default(),
        )
    }

    fn suggestion_limit(&self) -> usize {
        self.config.suggestion_limit.clamp(1, MAX_SUGGESTIONS)
    }
}

fn parse_sort_mode(sort_by: Option<&str>) -> Result<SortMode> {
    match sort_by.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(SortMode::default()),
        Some(value) => value
            .parse()
            .map_err(|_| SearchError::InvalidSortMode(value.to_string())),
    }
}

#[async_trait]
impl<R> TermSearch for SearchService<R>
where
    R: TermRepository + 'static,
{
    async fn search(&self, params: SearchParams) -> Result<Page<TermHit>> {
        let sort = parse_sort_mode(params.sort_by.as_deref())?;
        let page = PageRequest::new(
            params.page.unwrap_or(1),
            params
                .page_size
                .unwrap_or(i64::from(self.config.default_page_size)),
            self.config.max_page_size,
        )?;

        let filter = compose(
            &params.query,
            params.language.as_deref(),
            params.domain.as_deref(),
            params.fuzzy,
        );

        let page = if filter.is_fuzzy() {
            let mut hits = self.repository.candidates(&filter).await?;
            hits.retain(|hit| filter.admits(&hit.term, &*self.matcher));
            rank(&mut hits, sort, self.config.popularity);
            paginate(hits, &page)
        } else {
            self.repository
                .ranked_page(&filter, sort, self.config.popularity, &page)
                .await?
        };

        tracing::debug!(
            total = page.total,
            returned = page.items.len(),
            %sort,
            fuzzy = filter.is_fuzzy(),
            "term search completed"
        );

        Ok(page)
    }

    async fn suggest(&self, query: &str) -> Result<Vec<Suggestion>> {
        let prefix = query.trim();
        if prefix.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        let limit = self.suggestion_limit();
        let mut suggestions = self.repository.suggest(prefix, limit).await?;
        suggestions.truncate(limit);

        Ok(suggestions)
    }

    async fn export(&self) -> Result<Page<TermHit>> {
        let mut hits = self.repository.candidates(&TermFilter::all()).await?;
        hits.sort_by_key(|hit| hit.term.id);

        tracing::debug!(total = hits.len(), "term export completed");

        Ok(Page {
            total: hits.len(),
            items: hits,
        })
    }

    async fn facets(&self) -> Result<Facets> {
        self.repository.facets().await
    }

    async fn health(&self) -> Result<()> {
        self.repository.ping().await
    }
}
