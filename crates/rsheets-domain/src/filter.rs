//! Sheet title filtering.
//!
//! Optional post-processing applied to title lists returned by the title
//! endpoints. All comparisons are case-insensitive.

use serde::Deserialize;

/// Predicate set applied to a list of sheet titles.
///
/// A title is kept when it satisfies every configured predicate group:
/// - `include`: at least one entry is a substring of the title (if any set)
/// - `exclude`: no entry is a substring of the title
/// - `matches`: at least one entry equals the title exactly (if any set)
/// - `does_not_match`: no entry equals the title exactly
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TitleFilter {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub matches: Vec<String>,
    pub does_not_match: Vec<String>,
}

impl TitleFilter {
    /// True when no predicate is configured and `apply` would be identity.
    pub fn is_noop(&self) -> bool {
        self.include.is_empty()
            && self.exclude.is_empty()
            && self.matches.is_empty()
            && self.does_not_match.is_empty()
    }

    fn keeps(&self, title: &str) -> bool {
        let title = title.to_lowercase();

        if !self.include.is_empty()
            && !self
                .include
                .iter()
                .any(|s| title.contains(&s.to_lowercase()))
        {
            return false;
        }
        if self
            .exclude
            .iter()
            .any(|s| title.contains(&s.to_lowercase()))
        {
            return false;
        }
        if !self.matches.is_empty() && !self.matches.iter().any(|s| title == s.to_lowercase()) {
            return false;
        }
        if self
            .does_not_match
            .iter()
            .any(|s| title == s.to_lowercase())
        {
            return false;
        }

        true
    }

    /// Filters `titles`, preserving their original order.
    pub fn apply(&self, titles: Vec<String>) -> Vec<String> {
        if self.is_noop() {
            return titles;
        }
        titles.into_iter().filter(|t| self.keeps(t)).collect()
    }
}
