//! Vote aggregation: per-term upvote and downvote counts.

#[cfg(test)]
use std::collections::HashMap;

use super::types::VoteTally;
#[cfg(test)]
use super::types::{Term, TermHit, TermId, Vote, VoteDirection};

impl VoteTally {
    pub fn new(upvotes: i64, downvotes: i64) -> Self {
        Self { upvotes, downvotes }
    }

    #[cfg(test)]
    pub fn record(&mut self, direction: VoteDirection) {
        match direction {
            VoteDirection::Upvote => self.upvotes += 1,
            VoteDirection::Downvote => self.downvotes += 1,
        }
    }

    pub fn net_score(&self) -> i64 {
        self.upvotes - self.downvotes
    }
}

/// Group votes by term and direction in one pass.
///
/// Terms without votes are absent from the map; [`attach_tallies`] fills them
/// in with zero counts. The Postgres repository does the same grouping in SQL.
#[cfg(test)]
pub fn aggregate<'a>(votes: impl IntoIterator<Item = &'a Vote>) -> HashMap<TermId, VoteTally> {
    let mut tallies: HashMap<TermId, VoteTally> = HashMap::new();
    for vote in votes {
        tallies.entry(vote.term_id).or_default().record(vote.direction);
    }
    tallies
}

/// Join terms with their tallies, defaulting to zero counts.
#[cfg(test)]
pub fn attach_tallies(
    terms: impl IntoIterator<Item = Term>,
    tallies: &HashMap<TermId, VoteTally>,
) -> Vec<TermHit> {
    terms
        .into_iter()
        .map(|term| {
            let votes = tallies.get(&term.id).copied().unwrap_or_default();
            TermHit { term, votes }
        })
        .collect()
}
