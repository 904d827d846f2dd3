//! Term search over the glossary corpus.
//!
//! A search request flows through three stages:
//!
//! - **Query composition** ([`compose`]) turns the query text, language and
//!   domain filters and the fuzzy flag into a [`TermFilter`]
//! - **Vote aggregation** joins upvote and downvote counts onto every candidate
//!   in the same store query, defaulting to zero
//! - **Ranking and pagination** orders candidates by name or popularity and
//!   slices out the requested page, keeping the pre-pagination total. The store
//!   does this in SQL unless the query is fuzzy
//!
//! # Architecture
//!
//! - [`TermRepository`] - Store access (PostgreSQL, mocks)
//! - [`FuzzyMatcher`] - Approximate text matching (`strsim` strategies)
//! - [`SearchService`] - Implements the [`TermSearch`] inbound port
//!
//! # Example
//!
//! ```ignore
//! use search_service::domain::search::{
//!     PgTermRepository, SearchConfig, SearchParams, SearchService, StrsimMatcher,
//! };
//!
//! let service = SearchService::new(
//!     PgTermRepository::new(pool),
//!     Box::new(StrsimMatcher::default()),
//!     SearchConfig::default(),
//! );
//! let page = service.search(SearchParams { query: "agri".into(), ..Default::default() }).await?;
//! ```
//!
//! [`TermSearch`]: crate::domain::ports::inbound::TermSearch

mod composer;
mod fuzzy;
mod ranking;
mod service;
mod traits;
mod types;
mod votes;

pub mod repository;

pub use composer::{compose, TermFilter, TextMatch};
pub use fuzzy::{FuzzyMatcher, FuzzyStrategy, StrsimMatcher};
pub use ranking::PageRequest;
pub use repository::PgTermRepository;
pub use service::{SearchConfig, SearchService, MAX_SUGGESTIONS};
pub use traits::{Result, SearchError, TermRepository};
pub use types::*;
