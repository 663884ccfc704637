//! Whole-word, case-insensitive term matching

use regex::{Regex, RegexBuilder};
use tracing::warn;

/// Compiled matcher for one literal term
#[derive(Debug, Clone)]
pub struct WholeWord {
    term: String,
    pattern: Regex,
}

impl WholeWord {
    /// `None` when the term is blank or the pattern cannot be compiled
    pub fn new(term: &str) -> Option<Self> {
        if term.trim().is_empty() {
            return None;
        }

        match RegexBuilder::new(&format!(r"\b{}\b", regex::escape(term)))
            .case_insensitive(true)
            .build()
        {
            Ok(pattern) => Some(Self {
                term: term.to_string(),
                pattern,
            }),
            Err(e) => {
                warn!(term = %term, error = %e, "Skipping unmatchable term");
                None
            }
        }
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// One-off whole-word test
pub fn contains_whole_word(text: &str, term: &str) -> bool {
    WholeWord::new(term).is_some_and(|w| w.is_match(text))
}
