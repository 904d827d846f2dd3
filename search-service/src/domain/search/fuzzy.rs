//! Approximate term matching.
//!
//! The composer only depends on [`FuzzyMatcher`], so the similarity algorithm
//! can be swapped through configuration.

use serde::Deserialize;

/// Scores how closely a candidate term resembles a query.
pub trait FuzzyMatcher: Send + Sync {
    /// Similarity in `0.0..=1.0`, higher is closer.
    fn score(&self, candidate: &str, query: &str) -> f64;

    /// Minimum score for a candidate to count as a match.
    fn threshold(&self) -> f64;

    fn matches(&self, candidate: &str, query: &str) -> bool {
        self.score(candidate, query) >= self.threshold()
    }
}

/// Similarity algorithm backing [`StrsimMatcher`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuzzyStrategy {
    #[default]
    Levenshtein,
    JaroWinkler,
}

/// Edit-distance style matcher built on `strsim`.
///
/// A candidate containing the query scores 1.0. Otherwise the score is the
/// best similarity against the whole candidate or any of its words, so a
/// misspelt single word still finds a multi-word term.
#[derive(Debug, Clone)]
pub struct StrsimMatcher {
    strategy: FuzzyStrategy,
    threshold: f64,
}

impl StrsimMatcher {
    pub fn new(strategy: FuzzyStrategy, threshold: f64) -> Self {
        Self {
            strategy,
            threshold: threshold.clamp(0.0, 1.0),
        }
    }

    fn similarity(&self, a: &str, b: &str) -> f64 {
        match self.strategy {
            FuzzyStrategy::Levenshtein => strsim::normalized_levenshtein(a, b),
            FuzzyStrategy::JaroWinkler => strsim::jaro_winkler(a, b),
        }
    }
}

impl Default for StrsimMatcher {
    fn default() -> Self {
        Self::new(FuzzyStrategy::default(), 0.75)
    }
}

impl FuzzyMatcher for StrsimMatcher {
    fn score(&self, candidate: &str, query: &str) -> f64 {
        let candidate = candidate.to_lowercase();
        let query = query.trim().to_lowercase();

        if query.is_empty() || candidate.contains(&query) {
            return 1.0;
        }

        std::iter::once(candidate.as_str())
            .chain(candidate.split_whitespace())
            .map(|part| self.similarity(part, &query))
            .fold(0.0, f64::max)
    }

    fn threshold(&self) -> f64 {
        self.threshold
    }
}
