//! Query composition: turns caller parameters into a term predicate.

use super::fuzzy::FuzzyMatcher;
use super::types::Term;

/// Text constraint on the term text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextMatch {
    /// No text constraint
    Any,
    /// Case-insensitive substring
    Contains(String),
    /// Approximate match through a [`FuzzyMatcher`]
    Fuzzy(String),
}

/// Conjunction of every active filter on the term corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermFilter {
    pub text: TextMatch,
    /// Exact, case-sensitive language match
    pub language: Option<String>,
    /// Exact, case-sensitive domain match
    pub domain: Option<String>,
}

impl TermFilter {
    /// Filter admitting the whole corpus.
    pub fn all() -> Self {
        Self {
            text: TextMatch::Any,
            language: None,
            domain: None,
        }
    }

    /// True when part of the filter must be evaluated outside the store.
    pub fn is_fuzzy(&self) -> bool {
        matches!(self.text, TextMatch::Fuzzy(_))
    }

    /// The part of the filter a store evaluates: language, domain and substring.
    pub fn admits_store_side(&self, term: &Term) -> bool {
        if let Some(ref language) = self.language {
            if &term.language != language {
                return false;
            }
        }
        if let Some(ref domain) = self.domain {
            if &term.domain != domain {
                return false;
            }
        }
        match &self.text {
            TextMatch::Contains(query) => contains_ignore_case(&term.term, query),
            TextMatch::Any | TextMatch::Fuzzy(_) => true,
        }
    }

    /// The full predicate, including the fuzzy text match.
    pub fn admits(&self, term: &Term, matcher: &dyn FuzzyMatcher) -> bool {
        if !self.admits_store_side(term) {
            return false;
        }
        match &self.text {
            TextMatch::Fuzzy(query) => matcher.matches(&term.term, query),
            TextMatch::Any | TextMatch::Contains(_) => true,
        }
    }
}

/// Build a filter from raw query text and optional filters.
///
/// The query is trimmed; a blank query places no constraint on the text.
/// Empty language or domain values are treated as absent. Any other value is
/// kept verbatim for an exact match; unknown values simply match nothing.
pub fn compose(
    query: &str,
    language: Option<&str>,
    domain: Option<&str>,
    fuzzy: bool,
) -> TermFilter {
    let query = query.trim();
    let text = if query.is_empty() {
        TextMatch::Any
    } else if fuzzy {
        TextMatch::Fuzzy(query.to_string())
    } else {
        TextMatch::Contains(query.to_string())
    };

    TermFilter {
        text,
        language: non_empty(language),
        domain: non_empty(domain),
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
pub fn starts_with_ignore_case(haystack: &str, prefix: &str) -> bool {
    haystack.to_lowercase().starts_with(&prefix.to_lowercase())
}

/// Escape `LIKE` wildcards so user text is matched literally (escape char `\`).
pub fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
