use isolang::Language;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::matcher::DictionaryMatch;
use crate::tokenizer::{PosTag, TextToken};

// @module: Per-language annotation policy

/// Language-specific rules applied while annotating captions.
///
/// Every method has a neutral default, so a language without specific
/// rules behaves as identity merge / always valid / never ignored.
pub trait LangRules: Send + Sync {
    /// Structural rewrite of the token sequence before matching,
    /// e.g. merging a verb with a following conjunctive particle.
    fn filter_tokens(&self, tokens: Vec<TextToken>) -> Vec<TextToken> {
        tokens
    }

    /// Reject a candidate match outright.
    fn is_valid_match(&self, _dictionary_match: &DictionaryMatch) -> bool {
        true
    }

    /// Suppress a match from annotation without rejecting it from
    /// span-consumption accounting.
    fn is_ignored_match(&self, _dictionary_match: &DictionaryMatch, _ignore_tags: &[String]) -> bool {
        false
    }
}

/// Resolve the rules for a language. This registry is the single place
/// where languages are mapped to rule implementations.
pub fn rules_for(language: Language) -> Option<Box<dyn LangRules>> {
    match language.to_639_3() {
        "jpn" => {
            debug!("Using Japanese specific annotation rules");
            Some(Box::new(JapaneseRules))
        }
        _ => {
            debug!(
                "No specific annotation rules found for language {}",
                language.to_name()
            );
            None
        }
    }
}

/// Conjunctive particles that attach to a preceding verb or auxiliary,
/// merged so that e.g. 見つけ-て appears as one word in the subtitles
const PART_OF_VERB_CONJUNCTIONS: [&str; 3] = ["て", "で", "ちゃ"];

static IS_HIRAGANA_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{Hiragana}\u{30FC}]+$").unwrap());
static IS_KATAKANA_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{Katakana}\u{30FC}]+$").unwrap());

/// Japanese specific rules used when annotating subtitles.
pub struct JapaneseRules;

impl LangRules for JapaneseRules {
    /// Merge some SCONJ with the previous VERB/AUX so conjugated verbs
    /// read as one word. The merged token keeps the verb's canonical
    /// forms since those are the dictionary keys.
    fn filter_tokens(&self, tokens: Vec<TextToken>) -> Vec<TextToken> {
        let mut filtered: Vec<TextToken> = Vec::with_capacity(tokens.len());
        for token in tokens {
            let is_part_of_verb_conj = token.pos() == PosTag::Sconj
                && PART_OF_VERB_CONJUNCTIONS.contains(&token.text_form());
            if is_part_of_verb_conj {
                if let Some(last) = filtered.last() {
                    if matches!(last.pos(), PosTag::Aux | PosTag::Verb) {
                        let merged = TextToken::new(
                            last.pos(),
                            format!("{}{}", last.text_form(), token.text_form()),
                            Some(last.first_canonical_form().to_string()),
                            Some(last.second_canonical_form().to_string()),
                        );
                        // The merged text form can never be empty here
                        if let Ok(merged) = merged {
                            *filtered.last_mut().unwrap() = merged;
                            continue;
                        }
                    }
                }
            }
            filtered.push(token);
        }
        filtered
    }

    /// Reject short hiragana-only matches: they are most likely a wrong
    /// grouping of independent grammar conjunctions, not an unusual word
    /// worth defining. Verbs are exempt.
    fn is_valid_match(&self, dictionary_match: &DictionaryMatch) -> bool {
        let text_form = dictionary_match.text_form();
        let is_short = text_form.chars().count() <= 3;
        if is_short && IS_HIRAGANA_REGEX.is_match(&text_form) && !dictionary_match.has_verb() {
            return false;
        }
        true
    }

    /// Ignore all-kana matches unless they contain a verb.
    fn is_ignored_match(&self, dictionary_match: &DictionaryMatch, _ignore_tags: &[String]) -> bool {
        let text_form = dictionary_match.text_form();
        let all_kana =
            IS_HIRAGANA_REGEX.is_match(&text_form) || IS_KATAKANA_REGEX.is_match(&text_form);
        all_kana && !dictionary_match.has_verb()
    }
}
