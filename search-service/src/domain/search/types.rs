//! Core types for the term search domain.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A validated term identifier.
///
/// Wraps i32 to match the database SERIAL type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TermId(i32);

impl TermId {
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    pub fn as_i32(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for TermId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for TermId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

/// A terminology entry in the glossary corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub id: TermId,
    /// The term text itself, e.g. "Agricultural Statistics"
    pub term: String,
    /// Language name or code, stored canonically by the term-addition service
    pub language: String,
    /// Domain/category the term belongs to
    pub domain: String,
    pub definition: String,
    /// User who added the term
    pub owner_id: Option<i32>,
}

/// Direction of a single user's vote on a term.
#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "vote_direction", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VoteDirection {
    Upvote,
    Downvote,
}

/// A single vote row as stored by the vote service.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct Vote {
    pub id: i32,
    pub term_id: TermId,
    pub user_id: i32,
    pub direction: VoteDirection,
}

/// Aggregated vote counts for one term. Zero when no votes exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoteTally {
    pub upvotes: i64,
    pub downvotes: i64,
}

/// A term joined with its vote tally, ready for ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermHit {
    pub term: Term,
    pub votes: VoteTally,
}

/// A reduced term projection for typeahead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub id: TermId,
    pub label: String,
}

/// One slice of a ranked result set.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Number of matches before pagination
    pub total: usize,
}

/// How matched terms are ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
pub enum SortMode {
    #[default]
    #[strum(ascii_case_insensitive, serialize = "name")]
    Name,
    #[strum(ascii_case_insensitive, serialize = "popularity")]
    Popularity,
}

/// Which score the popularity sort ranks by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PopularityFormula {
    /// Raw upvote count
    #[default]
    Upvotes,
    /// Upvotes minus downvotes
    NetScore,
}

/// Caller-supplied search parameters, before validation.
#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    pub query: String,
    pub language: Option<String>,
    pub domain: Option<String>,
    pub sort_by: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub fuzzy: bool,
}

/// A distinct filter value and how many terms carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetCount {
    pub value: String,
    pub count: i64,
}

/// Distinct languages and domains across the corpus.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Facets {
    pub languages: Vec<FacetCount>,
    pub domains: Vec<FacetCount>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn sort_mode_parses_case_insensitively() {
        assert_eq!(SortMode::from_str("name").unwrap(), SortMode::Name);
        assert_eq!(SortMode::from_str("Popularity").unwrap(), SortMode::Popularity);
        assert!(SortMode::from_str("relevance").is_err());
    }

    #[test]
    fn sort_mode_display() {
        assert_eq!(SortMode::Name.to_string(), "name");
        assert_eq!(SortMode::Popularity.to_string(), "popularity");
    }

    #[test]
    fn vote_tally_defaults_to_zero() {
        let tally = VoteTally::default();
        assert_eq!(tally.upvotes, 0);
        assert_eq!(tally.downvotes, 0);
    }
}
