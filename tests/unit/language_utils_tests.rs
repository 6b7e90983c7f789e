/*!
 * Tests for language resolution utilities
 */

use glossub::language_utils::{language_name, resolve_language, word_separator};

#[test]
fn test_resolve_language_withEnglishName_shouldResolve() {
    let language = resolve_language("Japanese").unwrap();
    assert_eq!(language.to_639_3(), "jpn");
}

#[test]
fn test_resolve_language_withTwoLetterCode_shouldResolve() {
    let language = resolve_language("ja").unwrap();
    assert_eq!(language.to_639_3(), "jpn");
}

#[test]
fn test_resolve_language_withThreeLetterCode_shouldResolve() {
    let language = resolve_language("jpn").unwrap();
    assert_eq!(language.to_639_3(), "jpn");
}

#[test]
fn test_resolve_language_withDifferentSpellings_shouldAgree() {
    let by_name = resolve_language("English").unwrap();
    let by_code = resolve_language("en").unwrap();
    assert_eq!(by_name, by_code);
}

#[test]
fn test_resolve_language_withUnknownName_shouldFail() {
    assert!(resolve_language("klingon").is_err());
    assert!(resolve_language("").is_err());
}

#[test]
fn test_word_separator_withSpacelessLanguages_shouldBeEmpty() {
    assert_eq!(word_separator(resolve_language("ja").unwrap()), "");
    assert_eq!(word_separator(resolve_language("zh").unwrap()), "");
    assert_eq!(word_separator(resolve_language("vi").unwrap()), "");
}

#[test]
fn test_word_separator_withSpacedLanguages_shouldBeSpace() {
    assert_eq!(word_separator(resolve_language("en").unwrap()), " ");
    assert_eq!(word_separator(resolve_language("fr").unwrap()), " ");
}

#[test]
fn test_language_name_withResolvedLanguage_shouldBeReadable() {
    assert_eq!(language_name(resolve_language("ja").unwrap()), "Japanese");
    assert_eq!(language_name(resolve_language("en").unwrap()), "English");
}
