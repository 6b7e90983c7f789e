use std::collections::HashSet;
use std::sync::Arc;

use log::debug;

use crate::dictionary::{Dictionary, DictionaryEntry};
use crate::tokenizer::{PosTag, TextToken};

// @module: Greedy longest-span dictionary matching

/// Configuration for the pronunciation-keyed fallback lookup.
///
/// The length guard avoids pathological single-character pronunciation
/// collisions, very common in kana dictionaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PronunciationLookup {
    /// Whether the pronunciation index is consulted at all
    pub enabled: bool,
    /// Minimum character count of the candidate's canonical form
    pub min_chars: usize,
}

impl Default for PronunciationLookup {
    fn default() -> Self {
        PronunciationLookup {
            enabled: true,
            min_chars: 2,
        }
    }
}

/// A contiguous run of tokens that together resolve to one or more
/// dictionary entries.
///
/// The word separator used to join token forms is stored with the match
/// so derived accessors reproduce exactly the keys that were looked up.
/// Never mutated after the matcher emits it.
#[derive(Debug, Clone)]
pub struct DictionaryMatch {
    tokens: Vec<TextToken>,
    entries: Vec<Arc<DictionaryEntry>>,
    word_separator: &'static str,
}

impl DictionaryMatch {
    pub fn new(
        tokens: Vec<TextToken>,
        entries: Vec<Arc<DictionaryEntry>>,
        word_separator: &'static str,
    ) -> Self {
        debug_assert!(!tokens.is_empty(), "a match spans at least one token");
        DictionaryMatch {
            tokens,
            entries,
            word_separator,
        }
    }

    /// Tokens covered by this match, in caption order
    pub fn tokens(&self) -> &[TextToken] {
        &self.tokens
    }

    /// Dictionary entries this span resolved to
    pub fn entries(&self) -> &[Arc<DictionaryEntry>] {
        &self.entries
    }

    /// Separator used to join token forms for lookups
    pub fn word_separator(&self) -> &'static str {
        self.word_separator
    }

    /// Concatenated surface form
    pub fn text_form(&self) -> String {
        self.join(TextToken::text_form)
    }

    /// Concatenated primary canonical form
    pub fn first_canonical_form(&self) -> String {
        self.join(TextToken::first_canonical_form)
    }

    /// Concatenated secondary canonical form
    pub fn second_canonical_form(&self) -> String {
        self.join(TextToken::second_canonical_form)
    }

    /// True if any constituent token is tagged as a verb
    pub fn has_verb(&self) -> bool {
        self.tokens.iter().any(|t| t.pos() == PosTag::Verb)
    }

    /// Union of the tags of every resolved entry.
    ///
    /// A multi-sense match is treated as carrying every tag of every
    /// sense it matched. This is a deliberate simplification.
    pub fn tags(&self) -> HashSet<&str> {
        self.entries
            .iter()
            .filter_map(|e| e.tags())
            .flat_map(|tags| tags.iter().map(String::as_str))
            .collect()
    }

    fn join(&self, accessor: impl Fn(&TextToken) -> &str) -> String {
        self.tokens
            .iter()
            .map(|t| accessor(t))
            .collect::<Vec<_>>()
            .join(self.word_separator)
    }
}

/// Greedy longest-span matcher over a tagged token sequence.
///
/// Starting from each position, the longest prefix that resolves to a
/// non-empty entry list is accepted and never reconsidered, even when a
/// different segmentation would cover more tokens overall. This is a
/// deliberate simplicity/performance trade-off preserved from the
/// original engine.
pub struct Matcher<'a> {
    dictionary: &'a Dictionary,
    word_separator: &'static str,
    pronunciation_lookup: PronunciationLookup,
}

impl<'a> Matcher<'a> {
    pub fn new(
        dictionary: &'a Dictionary,
        word_separator: &'static str,
        pronunciation_lookup: PronunciationLookup,
    ) -> Self {
        Matcher {
            dictionary,
            word_separator,
            pronunciation_lookup,
        }
    }

    /// Produce the ordered, non-overlapping matches for one caption's
    /// token sequence. Tokens tagged as not-a-word (PUNCT, SYM, NUM, X)
    /// never start or join a match; tokens that participate in no match
    /// are silently skipped.
    pub fn find_matches(&self, tokens: &[TextToken]) -> Vec<DictionaryMatch> {
        let mut matches = Vec::new();
        let mut start = 0;
        while start < tokens.len() {
            if tokens[start].pos().is_not_a_word() {
                start += 1;
                continue;
            }

            // Start with the full remaining sequence and shrink from the
            // right until a lookup succeeds
            let mut end = tokens.len();
            let mut found = None;
            while end > start {
                if let Some(entries) = self.lookup_span(&tokens[start..end]) {
                    found = Some(entries);
                    break;
                }
                end -= 1;
            }

            match found {
                Some(entries) => {
                    matches.push(DictionaryMatch::new(
                        tokens[start..end].to_vec(),
                        entries,
                        self.word_separator,
                    ));
                    start = end;
                }
                None => start += 1,
            }
        }
        debug!(
            "dictionary matches: {}",
            matches
                .iter()
                .map(|m| m.text_form())
                .collect::<Vec<_>>()
                .join(", ")
        );
        matches
    }

    /// Look up one candidate span, trying each key strategy in order
    /// until one yields entries. All returned entries are attached to
    /// the match; no scoring or disambiguation is performed.
    fn lookup_span(&self, span: &[TextToken]) -> Option<Vec<Arc<DictionaryEntry>>> {
        if span.is_empty() {
            return None;
        }

        let first_canonical = self.join_forms(span, TextToken::first_canonical_form);
        let entries = self.dictionary.lookup_by_lemma(&first_canonical);
        if !entries.is_empty() {
            return Some(entries.to_vec());
        }

        // If there is no entry for the canonical form, search the exact text
        let text_form = span
            .iter()
            .map(|t| t.text_form().to_lowercase())
            .collect::<Vec<_>>()
            .join(self.word_separator);
        let entries = self.dictionary.lookup_by_lemma(&text_form);
        if !entries.is_empty() {
            return Some(entries.to_vec());
        }

        // If still no entry, search the second canonical form
        let second_canonical = self.join_forms(span, TextToken::second_canonical_form);
        let entries = self.dictionary.lookup_by_lemma(&second_canonical);
        if !entries.is_empty() {
            return Some(entries.to_vec());
        }

        // Optional last resort: the pronunciation index, guarded by a
        // minimum length to avoid single-character collisions
        if self.pronunciation_lookup.enabled
            && first_canonical.chars().count() >= self.pronunciation_lookup.min_chars
        {
            let entries = self.dictionary.lookup_by_pronunciation(&first_canonical);
            if !entries.is_empty() {
                return Some(entries.to_vec());
            }
        }

        None
    }

    fn join_forms(&self, span: &[TextToken], accessor: impl Fn(&TextToken) -> &str) -> String {
        span.iter()
            .map(|t| accessor(t))
            .collect::<Vec<_>>()
            .join(self.word_separator)
    }
}
