//! Headline classification against a [`KeywordRuleSet`].
//!
//! The three outcomes are distinct: a filtered title counts towards
//! `filtered_count`, a rejected one (must words unsatisfied) does not, and an
//! evaluated title may still have zero keyword hits.

use serde::Serialize;

use crate::keywords::KeywordRuleSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "matches", rename_all = "snake_case")]
pub enum Classification {
    /// A filter word is contained in the title.
    Filtered,
    /// At least one must word is missing.
    Rejected,
    /// Frequency words contained in the title, in configured order (may be empty).
    Evaluated(Vec<String>),
}

impl Classification {
    pub fn is_filtered(&self) -> bool {
        matches!(self, Classification::Filtered)
    }

    /// Primary keyword: the first frequency word hit, if any.
    pub fn primary(&self) -> Option<&str> {
        match self {
            Classification::Evaluated(m) => m.first().map(String::as_str),
            _ => None,
        }
    }

    /// Flatten into `(matched_keywords, is_filtered)`.
    pub fn into_parts(self) -> (Vec<String>, bool) {
        match self {
            Classification::Filtered => (Vec::new(), true),
            Classification::Rejected => (Vec::new(), false),
            Classification::Evaluated(m) => (m, false),
        }
    }
}

/// Classify one title. Filter words win over everything, then must words,
/// then the frequency scan.
pub fn classify(title: &str, rules: &KeywordRuleSet) -> Classification {
    if title.is_empty() {
        return Classification::Evaluated(Vec::new());
    }
    let folded = title.to_lowercase();

    if rules
        .folded_filter()
        .iter()
        .any(|w| folded.contains(w.as_str()))
    {
        return Classification::Filtered;
    }

    let must = rules.folded_must();
    if !must.is_empty() && !must.iter().all(|w| folded.contains(w.as_str())) {
        return Classification::Rejected;
    }

    let matches = rules
        .frequency_pairs()
        .filter(|(_, f)| folded.contains(f))
        .map(|(orig, _)| orig.to_string())
        .collect();
    Classification::Evaluated(matches)
}
