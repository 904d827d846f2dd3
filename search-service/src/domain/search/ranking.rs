//! Ranking and pagination of matched terms.
//!
//! Both sort modes are total orders. Name order compares the lowercased term
//! text bytewise, then the raw text, then the id. Popularity order sorts by
//! descending score and falls back to name order on ties.

use std::cmp::Reverse;

use super::traits::{Result, SearchError};
use super::types::{Page, PopularityFormula, SortMode, TermHit};

/// A validated page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    /// Validate a 1-based page number and a page size in `1..=max_page_size`.
    pub fn new(page: i64, page_size: i64, max_page_size: u32) -> Result<Self> {
        let page = u32::try_from(page)
            .ok()
            .filter(|p| *p >= 1)
            .ok_or(SearchError::InvalidPage(page))?;
        let page_size = u32::try_from(page_size)
            .ok()
            .filter(|s| (1..=max_page_size).contains(s))
            .ok_or(SearchError::InvalidPageSize {
                got: page_size,
                max: max_page_size,
            })?;

        Ok(Self { page, page_size })
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn offset(&self) -> usize {
        (self.page as usize - 1).saturating_mul(self.page_size as usize)
    }
}

pub fn popularity_score(hit: &TermHit, formula: PopularityFormula) -> i64 {
    match formula {
        PopularityFormula::Upvotes => hit.votes.upvotes,
        PopularityFormula::NetScore => hit.votes.net_score(),
    }
}

/// Sort hits in place by the given mode.
pub fn rank(hits: &mut [TermHit], sort: SortMode, formula: PopularityFormula) {
    match sort {
        SortMode::Name => hits.sort_by_cached_key(|hit| {
            (hit.term.term.to_lowercase(), hit.term.term.clone(), hit.term.id)
        }),
        SortMode::Popularity => hits.sort_by_cached_key(|hit| {
            (
                Reverse(popularity_score(hit, formula)),
                hit.term.term.to_lowercase(),
                hit.term.term.clone(),
                hit.term.id,
            )
        }),
    }
}

/// Slice a ranked result set, keeping the pre-pagination total.
pub fn paginate<T>(items: Vec<T>, request: &PageRequest) -> Page<T> {
    let total = items.len();
    let items = items
        .into_iter()
        .skip(request.offset())
        .take(request.page_size() as usize)
        .collect();

    Page { items, total }
}
