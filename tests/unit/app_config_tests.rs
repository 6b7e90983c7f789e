/*!
 * Tests for application configuration functionality
 */

use glossub::app_config::{Config, LogLevel};

#[test]
fn test_default_config_shouldHaveExpectedValues() {
    let config = Config::default();
    assert!(config.dictionary.is_empty());
    assert_eq!(config.annotation.highlight_colors, vec!["#FFFFFF"]);
    assert!(!config.annotation.display_other_lemma);
    assert!(config.annotation.ignore_words.is_empty());
    assert!(config.annotation.ignore_tags.is_empty());
    assert!(config.annotation.ignore_frequencies.is_empty());
    assert!(config.annotation.pronunciation_lookup.enabled);
    assert_eq!(config.annotation.pronunciation_lookup.min_chars, 2);
    assert_eq!(config.log_level, LogLevel::Info);
}

#[test]
fn test_deserialize_withMinimalJson_shouldFillDefaults() {
    let config: Config = serde_json::from_str(r#"{ "dictionary": "dict.json" }"#).unwrap();
    assert_eq!(config.dictionary, "dict.json");
    assert_eq!(config.annotation.highlight_colors, vec!["#FFFFFF"]);
    assert!(config.annotation.pronunciation_lookup.enabled);
    assert_eq!(config.log_level, LogLevel::Info);
}

#[test]
fn test_deserialize_withFullJson_shouldReadEverySetting() {
    let json = r##"{
        "dictionary": "jmdict.json",
        "annotation": {
            "highlight_colors": ["#FFAAAA", "#AAFFAA"],
            "display_other_lemma": true,
            "ignore_words": ["する", "ある"],
            "ignore_tags": ["slang"],
            "ignore_frequencies": [1, 2],
            "dictionary_cleanup_regex": "\\(P\\)",
            "pronunciation_lookup": { "enabled": false, "min_chars": 3 }
        },
        "log_level": "debug"
    }"##;
    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.annotation.highlight_colors.len(), 2);
    assert!(config.annotation.display_other_lemma);
    assert_eq!(config.annotation.ignore_words, vec!["する", "ある"]);
    assert_eq!(config.annotation.ignore_frequencies, vec![1, 2]);
    assert!(!config.annotation.pronunciation_lookup.enabled);
    assert_eq!(config.annotation.pronunciation_lookup.min_chars, 3);
    assert_eq!(config.log_level, LogLevel::Debug);
}

#[test]
fn test_validate_withEmptyDictionary_shouldFail() {
    let config = Config::default();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withDictionarySet_shouldPass() {
    let config = Config {
        dictionary: "dict.json".to_string(),
        ..Default::default()
    };
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_withBadHighlightColor_shouldFail() {
    let mut config = Config {
        dictionary: "dict.json".to_string(),
        ..Default::default()
    };
    config.annotation.highlight_colors = vec!["red".to_string()];
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withEmptyColorList_shouldFail() {
    let mut config = Config {
        dictionary: "dict.json".to_string(),
        ..Default::default()
    };
    config.annotation.highlight_colors = Vec::new();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withInvalidCleanupRegex_shouldFail() {
    let mut config = Config {
        dictionary: "dict.json".to_string(),
        ..Default::default()
    };
    config.annotation.dictionary_cleanup_regex = Some("(unclosed".to_string());
    assert!(config.validate().is_err());
}

#[test]
fn test_dictionary_cleanup_regex_withValidPattern_shouldCompile() {
    let mut config = Config::default();
    config.annotation.dictionary_cleanup_regex = Some("【例】.*".to_string());
    let regex = config.dictionary_cleanup_regex().unwrap().unwrap();
    assert!(regex.is_match("【例】example"));
}

#[test]
fn test_filter_policy_shouldMirrorAnnotationSettings() {
    let mut config = Config::default();
    config.annotation.ignore_words = vec!["する".to_string()];
    config.annotation.ignore_tags = vec!["slang".to_string()];
    config.annotation.ignore_frequencies = vec![1];

    let policy = config.filter_policy();
    assert_eq!(policy.ignore_words, vec!["する"]);
    assert_eq!(policy.ignore_tags, vec!["slang"]);
    assert_eq!(policy.ignore_frequencies, vec![1]);
}

#[test]
fn test_pronunciation_lookup_shouldMirrorAnnotationSettings() {
    let mut config = Config::default();
    config.annotation.pronunciation_lookup.enabled = false;
    config.annotation.pronunciation_lookup.min_chars = 4;

    let lookup = config.pronunciation_lookup();
    assert!(!lookup.enabled);
    assert_eq!(lookup.min_chars, 4);
}

#[test]
fn test_serialize_roundTrip_shouldPreserveConfig() {
    let mut config = Config {
        dictionary: "dict.json".to_string(),
        ..Default::default()
    };
    config.annotation.ignore_frequencies = vec![1];
    config.log_level = LogLevel::Trace;

    let json = serde_json::to_string_pretty(&config).unwrap();
    let reloaded: Config = serde_json::from_str(&json).unwrap();
    assert_eq!(reloaded.dictionary, "dict.json");
    assert_eq!(reloaded.annotation.ignore_frequencies, vec![1]);
    assert_eq!(reloaded.log_level, LogLevel::Trace);
}
