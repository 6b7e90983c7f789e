/*!
 * Tests for the match filter pipeline
 */

use std::sync::Arc;

use glossub::filter::{filter_matches, FilterPolicy};
use glossub::lang_rules::JapaneseRules;
use glossub::matcher::DictionaryMatch;
use glossub::tokenizer::PosTag;

use crate::common;

fn word_match(text: &str, entry: glossub::dictionary::DictionaryEntry) -> DictionaryMatch {
    DictionaryMatch::new(
        vec![common::token(PosTag::Noun, text)],
        vec![Arc::new(entry)],
        " ",
    )
}

#[test]
fn test_filter_matches_withEmptyPolicy_shouldKeepEverything() {
    let matches = vec![
        word_match("bank", common::entry(&["bank"], &["a bank"])),
        word_match("school", common::entry(&["school"], &["a school"])),
    ];

    let kept = filter_matches(matches, &FilterPolicy::default(), None);
    assert_eq!(kept.len(), 2);
    assert_eq!(kept[0].text_form(), "bank");
    assert_eq!(kept[1].text_form(), "school");
}

#[test]
fn test_filter_matches_withIgnoredTag_shouldDropMatch() {
    let tagged = common::entry_full(&["bank"], &["a bank"], None, &["slang"]);
    let matches = vec![
        word_match("bank", tagged),
        word_match("school", common::entry(&["school"], &["a school"])),
    ];
    let policy = FilterPolicy {
        ignore_tags: vec!["slang".to_string()],
        ..Default::default()
    };

    let kept = filter_matches(matches, &policy, None);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].text_form(), "school");
}

#[test]
fn test_filter_matches_withGrammarOnlyTokens_shouldDropMatch() {
    let grammar_match = DictionaryMatch::new(
        vec![
            common::token(PosTag::Part, "の"),
            common::token(PosTag::Aux, "だ"),
        ],
        vec![Arc::new(common::entry(&["のだ"], &["explanatory"]))],
        "",
    );
    let mixed_match = DictionaryMatch::new(
        vec![
            common::token(PosTag::Noun, "学校"),
            common::token(PosTag::Part, "に"),
        ],
        vec![Arc::new(common::entry(&["学校に"], &["to school"]))],
        "",
    );

    let kept = filter_matches(
        vec![grammar_match, mixed_match],
        &FilterPolicy::default(),
        None,
    );
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].text_form(), "学校に");
}

#[test]
fn test_filter_matches_withIgnoredWord_shouldCompareAllForms() {
    // "ran" is only reachable through its canonical form "run"
    let conjugated = DictionaryMatch::new(
        vec![common::token_with_canonical(PosTag::Verb, "ran", "run")],
        vec![Arc::new(common::entry(&["run"], &["to run"]))],
        " ",
    );
    let policy = FilterPolicy {
        ignore_words: vec!["run".to_string()],
        ..Default::default()
    };

    assert!(filter_matches(vec![conjugated], &policy, None).is_empty());
}

#[test]
fn test_filter_matches_withIgnoredTextForm_shouldDropMatch() {
    let matches = vec![word_match("bank", common::entry(&["bank"], &["a bank"]))];
    let policy = FilterPolicy {
        ignore_words: vec!["bank".to_string()],
        ..Default::default()
    };

    assert!(filter_matches(matches, &policy, None).is_empty());
}

#[test]
fn test_filter_matches_withIgnoredFrequency_shouldDropCommonWord() {
    let common_word = common::entry_full(&["the"], &["article"], None, &["freq1"]);
    let policy = FilterPolicy {
        ignore_frequencies: vec![1],
        ..Default::default()
    };

    assert!(filter_matches(vec![word_match("the", common_word)], &policy, None).is_empty());
}

#[test]
fn test_filter_matches_withUnrankedEntry_shouldNeverDropIt() {
    // One entry is too common, the other has no rank at all. The match
    // survives because at least one definition is worth showing.
    let ranked = common::entry_full(&["bank"], &["a bank"], None, &["freq1"]);
    let unranked = common::entry(&["bank"], &["river edge"]);
    let bank = DictionaryMatch::new(
        vec![common::token(PosTag::Noun, "bank")],
        vec![Arc::new(ranked), Arc::new(unranked)],
        " ",
    );
    let policy = FilterPolicy {
        ignore_frequencies: vec![1],
        ..Default::default()
    };

    assert_eq!(filter_matches(vec![bank], &policy, None).len(), 1);
}

#[test]
fn test_filter_matches_withLanguageRules_shouldApplyThem() {
    let kana_noun = DictionaryMatch::new(
        vec![common::token(PosTag::Noun, "ともだち")],
        vec![Arc::new(common::entry(&["友達"], &["friend"]))],
        "",
    );
    let kanji_noun = DictionaryMatch::new(
        vec![common::token(PosTag::Noun, "学校")],
        vec![Arc::new(common::entry(&["学校"], &["school"]))],
        "",
    );

    let kept = filter_matches(
        vec![kana_noun, kanji_noun],
        &FilterPolicy::default(),
        Some(&JapaneseRules),
    );
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].text_form(), "学校");
}

#[test]
fn test_filter_matches_withFilteredOutput_shouldBeIdempotent() {
    let matches = vec![
        word_match("bank", common::entry_full(&["bank"], &["a bank"], None, &["freq1"])),
        word_match("school", common::entry(&["school"], &["a school"])),
    ];
    let policy = FilterPolicy {
        ignore_frequencies: vec![1],
        ..Default::default()
    };

    let once = filter_matches(matches, &policy, None);
    let kept_texts: Vec<String> = once.iter().map(|m| m.text_form()).collect();
    let twice = filter_matches(once, &policy, None);
    let twice_texts: Vec<String> = twice.iter().map(|m| m.text_form()).collect();
    assert_eq!(kept_texts, twice_texts);
}
