use std::collections::HashSet;

use log::debug;

use crate::lang_rules::LangRules;
use crate::matcher::DictionaryMatch;

// @module: Match filter pipeline

/// Filtering policy built from user configuration. All lists empty by
/// default, which lets every match through (apart from language rules).
#[derive(Debug, Clone, Default)]
pub struct FilterPolicy {
    /// Matches carrying any of these dictionary tags are dropped
    pub ignore_tags: Vec<String>,
    /// Words never annotated, compared against text and canonical forms
    pub ignore_words: Vec<String>,
    /// Frequency ranks considered too common to annotate
    pub ignore_frequencies: Vec<u32>,
}

/// Drop matches the user or the language rules consider not worth
/// annotating. Pure function of its inputs, the relative order of the
/// surviving matches is preserved.
pub fn filter_matches(
    matches: Vec<DictionaryMatch>,
    policy: &FilterPolicy,
    lang_rules: Option<&dyn LangRules>,
) -> Vec<DictionaryMatch> {
    matches
        .into_iter()
        .filter(|m| should_annotate(m, policy, lang_rules))
        .collect()
}

fn should_annotate(
    dictionary_match: &DictionaryMatch,
    policy: &FilterPolicy,
    lang_rules: Option<&dyn LangRules>,
) -> bool {
    if has_ignored_tag(dictionary_match, &policy.ignore_tags) {
        return false;
    }

    if dictionary_match
        .tokens()
        .iter()
        .all(|t| t.pos().is_ignorable_grammar())
    {
        debug!(
            "Ignoring grammar-only match {}",
            dictionary_match.text_form()
        );
        return false;
    }

    if is_ignored_word(dictionary_match, &policy.ignore_words) {
        debug!("Ignoring word {}", dictionary_match.text_form());
        return false;
    }

    if has_only_ignored_frequencies(dictionary_match, &policy.ignore_frequencies) {
        debug!(
            "Ignoring too frequent word {}",
            dictionary_match.text_form()
        );
        return false;
    }

    if let Some(rules) = lang_rules {
        if !rules.is_valid_match(dictionary_match) {
            debug!("Invalid match {}", dictionary_match.text_form());
            return false;
        }
        if rules.is_ignored_match(dictionary_match, &policy.ignore_tags) {
            debug!(
                "Ignoring match {} per language rules",
                dictionary_match.text_form()
            );
            return false;
        }
    }

    true
}

fn has_ignored_tag(dictionary_match: &DictionaryMatch, ignore_tags: &[String]) -> bool {
    if ignore_tags.is_empty() {
        return false;
    }
    let tags: HashSet<&str> = dictionary_match.tags();
    let ignored: Vec<&str> = ignore_tags
        .iter()
        .map(String::as_str)
        .filter(|t| tags.contains(t))
        .collect();
    if ignored.is_empty() {
        false
    } else {
        debug!(
            "Ignoring match {} with tags {:?}",
            dictionary_match.text_form(),
            ignored
        );
        true
    }
}

fn is_ignored_word(dictionary_match: &DictionaryMatch, ignore_words: &[String]) -> bool {
    if ignore_words.is_empty() {
        return false;
    }
    let text_form = dictionary_match.text_form();
    let first = dictionary_match.first_canonical_form();
    let second = dictionary_match.second_canonical_form();
    ignore_words
        .iter()
        .any(|w| *w == text_form || *w == first || *w == second)
}

fn has_only_ignored_frequencies(
    dictionary_match: &DictionaryMatch,
    ignore_frequencies: &[u32],
) -> bool {
    if ignore_frequencies.is_empty() {
        return false;
    }
    // An entry without a frequency rank is never considered too common
    dictionary_match.entries().iter().all(|entry| {
        entry
            .frequency()
            .is_some_and(|f| ignore_frequencies.contains(&f))
    })
}
