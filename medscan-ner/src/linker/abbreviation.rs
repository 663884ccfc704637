//! Abbreviation detection for `Long Form (SF)` definitions
//!
//! The short form's letters and digits must appear, in order, inside the
//! words preceding the parenthesis, and its first character must start a
//! word of the long form. The shortest long form satisfying that is taken.

use std::collections::HashMap;

/// A short form defined in the text together with its long form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Abbreviation {
    pub short_form: String,
    pub long_form: String,
}

/// Find all `Long Form (SF)` definitions in `text`
pub fn detect_abbreviations(text: &str) -> Vec<Abbreviation> {
    let mut found = Vec::new();
    let mut search_from = 0;

    while let Some(open_rel) = text[search_from..].find('(') {
        let open = search_from + open_rel;
        let Some(close_rel) = text[open + 1..].find(')') else {
            break;
        };
        let close = open + 1 + close_rel;
        search_from = close + 1;

        let short_form = text[open + 1..close].trim();
        if !is_short_form_candidate(short_form) {
            continue;
        }

        let short_len = short_form.chars().count();
        let max_words = (short_len + 5).min(short_len * 2);
        let words: Vec<&str> = text[..open].split_whitespace().collect();
        let window = words[words.len().saturating_sub(max_words)..].join(" ");

        if let Some(long_form) = best_long_form(short_form, &window) {
            if long_form.chars().count() > short_len
                && !found.iter().any(|a: &Abbreviation| a.short_form == short_form)
            {
                found.push(Abbreviation {
                    short_form: short_form.to_string(),
                    long_form,
                });
            }
        }
    }

    found
}

/// Short form → long form lookup for one text
pub fn abbreviation_map(abbreviations: &[Abbreviation]) -> HashMap<&str, &str> {
    abbreviations
        .iter()
        .map(|a| (a.short_form.as_str(), a.long_form.as_str()))
        .collect()
}

fn is_short_form_candidate(candidate: &str) -> bool {
    let len = candidate.chars().count();
    (2..=10).contains(&len)
        && !candidate.chars().any(char::is_whitespace)
        && candidate.chars().next().is_some_and(char::is_alphanumeric)
        && candidate.chars().any(char::is_alphabetic)
}

fn same_letter(a: char, b: char) -> bool {
    a.to_lowercase().eq(b.to_lowercase())
}

fn best_long_form(short_form: &str, candidate: &str) -> Option<String> {
    let short: Vec<char> = short_form.chars().collect();
    let long: Vec<char> = candidate.chars().collect();

    let mut s_idx = short.len() as isize - 1;
    let mut l_idx = long.len() as isize - 1;

    while s_idx >= 0 {
        let c = short[s_idx as usize];
        if !c.is_alphanumeric() {
            s_idx -= 1;
            continue;
        }

        while l_idx >= 0 {
            let lc = long[l_idx as usize];
            let starts_word = l_idx == 0 || !long[(l_idx - 1) as usize].is_alphanumeric();
            if same_letter(lc, c) && (s_idx > 0 || starts_word) {
                break;
            }
            l_idx -= 1;
        }

        if l_idx < 0 {
            return None;
        }

        l_idx -= 1;
        s_idx -= 1;
    }

    let first = (l_idx + 1) as usize;
    let start = long[..first]
        .iter()
        .rposition(|c| c.is_whitespace())
        .map(|p| p + 1)
        .unwrap_or(0);

    let long_form: String = long[start..].iter().collect();
    Some(long_form.trim().to_string())
}
