//! Mock repository implementation for testing.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::domain::search::composer::{starts_with_ignore_case, TermFilter};
use crate::domain::search::ranking::{paginate, rank, PageRequest};
use crate::domain::search::traits::{Result, SearchError, TermRepository};
use crate::domain::search::types::{
    FacetCount, Facets, Page, PopularityFormula, SortMode, Suggestion, Term, TermId, TermHit,
    Vote, VoteDirection,
};
use crate::domain::search::votes::{aggregate, attach_tallies};

/// Mock term repository keeping terms and raw votes in memory.
///
/// Votes are aggregated on every query the same way the SQL join does, so
/// tests exercise the zero-count default.
///
/// # Examples
///
/// ```ignore
/// let repo = MockTermRepository::new()
///     .with_term(1, "Agricultural Statistics", "English", "Agriculture")
///     .with_votes(1, &[VoteDirection::Upvote]);
/// ```
#[derive(Clone, Default)]
pub struct MockTermRepository {
    terms: Arc<RwLock<BTreeMap<TermId, Term>>>,
    votes: Arc<RwLock<Vec<Vote>>>,
    unavailable: bool,
    ranked_calls: Arc<AtomicUsize>,
}

impl MockTermRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_term(self, id: i32, term: &str, language: &str, domain: &str) -> Self {
        let term = Term {
            id: TermId::new(id),
            term: term.to_string(),
            language: language.to_string(),
            domain: domain.to_string(),
            definition: format!("Definition of {term}"),
            owner_id: Some(1),
        };
        self.terms.write().unwrap().insert(term.id, term);
        self
    }

    /// Record one vote per direction, each from a distinct user.
    pub fn with_votes(self, term_id: i32, directions: &[VoteDirection]) -> Self {
        {
            let mut votes = self.votes.write().unwrap();
            for direction in directions {
                let id = votes.len() as i32 + 1;
                votes.push(Vote {
                    id,
                    term_id: TermId::new(term_id),
                    user_id: id,
                    direction: *direction,
                });
            }
        }
        self
    }

    /// Make every call fail as if the store were down.
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    /// Number of pages ranked by the store so far.
    pub fn ranked_calls(&self) -> usize {
        self.ranked_calls.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable {
            return Err(SearchError::DatabaseError("connection refused".to_string()));
        }
        Ok(())
    }
}

fn facet_counts<'a>(values: impl Iterator<Item = &'a str>) -> Vec<FacetCount> {
    let mut counts: BTreeMap<&str, i64> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(value, count)| FacetCount {
            value: value.to_string(),
            count,
        })
        .collect()
}

#[async_trait]
impl TermRepository for MockTermRepository {
    async fn candidates(&self, filter: &TermFilter) -> Result<Vec<TermHit>> {
        self.check_available()?;

        let terms = self.terms.read().unwrap();
        let votes = self.votes.read().unwrap();
        let tallies = aggregate(votes.iter());

        let matched = terms
            .values()
            .filter(|term| filter.admits_store_side(term))
            .cloned();

        Ok(attach_tallies(matched, &tallies))
    }

    async fn ranked_page(
        &self,
        filter: &TermFilter,
        sort: SortMode,
        popularity: PopularityFormula,
        page: &PageRequest,
    ) -> Result<Page<TermHit>> {
        self.ranked_calls.fetch_add(1, Ordering::SeqCst);

        let mut hits = self.candidates(filter).await?;
        rank(&mut hits, sort, popularity);
        Ok(paginate(hits, page))
    }

    async fn suggest(&self, prefix: &str, limit: usize) -> Result<Vec<Suggestion>> {
        self.check_available()?;

        let terms = self.terms.read().unwrap();
        let mut matched: Vec<&Term> = terms
            .values()
            .filter(|term| starts_with_ignore_case(&term.term, prefix))
            .collect();
        matched.sort_by_cached_key(|term| (term.term.to_lowercase(), term.id));

        Ok(matched
            .into_iter()
            .take(limit)
            .map(|term| Suggestion {
                id: term.id,
                label: term.term.clone(),
            })
            .collect())
    }

    async fn facets(&self) -> Result<Facets> {
        self.check_available()?;

        let terms = self.terms.read().unwrap();
        Ok(Facets {
            languages: facet_counts(terms.values().map(|t| t.language.as_str())),
            domains: facet_counts(terms.values().map(|t| t.domain.as_str())),
        })
    }

    async fn ping(&self) -> Result<()> {
        self.check_available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::search::composer::compose;
    use crate::domain::search::types::VoteTally;

    #[tokio::test]
    async fn candidates_join_vote_tallies() {
        let repo = MockTermRepository::new()
            .with_term(1, "Agricultural Statistics", "English", "Agriculture")
            .with_term(2, "Landbou Statistiek", "Afrikaans", "Agriculture")
            .with_votes(2, &[VoteDirection::Upvote, VoteDirection::Downvote]);

        let hits = repo.candidates(&TermFilter::all()).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].votes, VoteTally::new(0, 0));
        assert_eq!(hits[1].votes, VoteTally::new(1, 1));
    }

    #[tokio::test]
    async fn candidates_skip_fuzzy_text() {
        let repo = MockTermRepository::new()
            .with_term(1, "Agricultural Statistics", "English", "Agriculture")
            .with_term(2, "Landbou Statistiek", "Afrikaans", "Agriculture");

        let filter = compose("zzz", Some("English"), None, true);
        let hits = repo.candidates(&filter).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].term.id, TermId::new(1));
    }

    #[tokio::test]
    async fn ranked_page_keeps_total() {
        let repo = MockTermRepository::new()
            .with_term(1, "Beta", "English", "General")
            .with_term(2, "alpha", "English", "General")
            .with_term(3, "Gamma", "English", "General")
            .with_votes(3, &[VoteDirection::Upvote]);

        let page = repo
            .ranked_page(
                &TermFilter::all(),
                SortMode::Popularity,
                PopularityFormula::Upvotes,
                &PageRequest::new(1, 2, 100).unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(page.total, 3);
        let ids: Vec<i32> = page.items.iter().map(|h| h.term.id.as_i32()).collect();
        assert_eq!(ids, vec![3, 2]);
        assert_eq!(repo.ranked_calls(), 1);
    }

    #[tokio::test]
    async fn suggest_orders_by_lowercased_text() {
        let repo = MockTermRepository::new()
            .with_term(1, "service level agreement", "English", "Business")
            .with_term(2, "Server Maintenance", "English", "IT")
            .with_term(3, "Observer", "English", "IT");

        let suggestions = repo.suggest("SERV", 10).await.unwrap();
        let ids: Vec<i32> = suggestions.iter().map(|s| s.id.as_i32()).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn unavailable_store_errors() {
        let repo = MockTermRepository::new().unavailable();
        assert!(repo.ping().await.is_err());
        assert!(repo.facets().await.is_err());
    }
}
