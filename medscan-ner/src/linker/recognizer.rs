//! Entity span recognition
//!
//! [`DictionaryRecognizer`] matches every knowledge-base name against the
//! text with an Aho-Corasick automaton, keeps whole-word hits only, and
//! resolves overlaps leftmost-longest. Matching is ASCII case-insensitive.

use super::knowledge_base::KnowledgeBase;
use super::{LinkerError, LinkerResult};
use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use std::collections::HashMap;

/// A recognized span (byte offsets into the input text)
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySpan {
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub label: Option<String>,
}

/// Finds entity spans in free text
pub trait EntityRecognizer: Send + Sync {
    fn recognize(&self, text: &str) -> Vec<EntitySpan>;
}

/// Dictionary-backed recognizer built from knowledge-base names
pub struct DictionaryRecognizer {
    automaton: AhoCorasick,
    /// Label per pattern id
    labels: Vec<Option<String>>,
}

impl DictionaryRecognizer {
    pub fn from_knowledge_base(kb: &KnowledgeBase) -> LinkerResult<Self> {
        // One pattern per name distinct under the automaton's ASCII case
        // folding; the first concept declaring a name decides its label.
        let mut patterns: Vec<String> = Vec::new();
        let mut labels: Vec<Option<String>> = Vec::new();
        let mut seen: HashMap<String, usize> = HashMap::new();

        for concept in kb.concepts() {
            for name in concept.names() {
                let key = name.to_ascii_lowercase();
                if seen.contains_key(&key) {
                    continue;
                }
                seen.insert(key, patterns.len());
                patterns.push(name.to_string());
                labels.push(concept.label().map(str::to_string));
            }
        }

        let automaton = AhoCorasickBuilder::new()
            .match_kind(MatchKind::Standard)
            .ascii_case_insensitive(true)
            .build(&patterns)
            .map_err(|e| LinkerError::KnowledgeBase(format!("Failed to build automaton: {}", e)))?;

        tracing::debug!(patterns = patterns.len(), "Dictionary recognizer built");

        Ok(Self { automaton, labels })
    }
}

impl EntityRecognizer for DictionaryRecognizer {
    fn recognize(&self, text: &str) -> Vec<EntitySpan> {
        if text.is_empty() {
            return Vec::new();
        }

        // Overlapping search so a shorter whole-word hit survives when the
        // longest candidate at the same position is not word-bounded.
        let mut hits: Vec<(usize, usize, usize)> = self
            .automaton
            .find_overlapping_iter(text)
            .filter(|m| is_whole_word(text, m.start(), m.end()))
            .map(|m| (m.start(), m.end(), m.pattern().as_usize()))
            .collect();

        hits.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| (b.1 - b.0).cmp(&(a.1 - a.0))));

        let mut spans = Vec::new();
        let mut last_end = 0;
        for (start, end, pattern) in hits {
            if start < last_end {
                continue;
            }
            last_end = end;
            spans.push(EntitySpan {
                start,
                end,
                text: text[start..end].to_string(),
                label: self.labels.get(pattern).cloned().flatten(),
            });
        }

        spans
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// True when the match is not glued to a word character on either side
fn is_whole_word(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}
