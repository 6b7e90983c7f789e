use anyhow::{anyhow, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::default::Default;

use crate::filter::FilterPolicy;
use crate::matcher::PronunciationLookup;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
static HTML_COLOR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").unwrap());

/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Path to the dictionary file (JIJI JSON format)
    pub dictionary: String,

    /// Annotation config
    #[serde(default)]
    pub annotation: AnnotationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Annotation settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AnnotationConfig {
    /// Colors used successively to highlight the defined words in a caption
    #[serde(default = "default_highlight_colors")]
    pub highlight_colors: Vec<String>,

    /// Display all lemmas of a defined word, not just the matched one
    #[serde(default)]
    pub display_other_lemma: bool,

    /// Words that should never be annotated
    #[serde(default)]
    pub ignore_words: Vec<String>,

    /// Dictionary tags whose entries should never be annotated
    #[serde(default)]
    pub ignore_tags: Vec<String>,

    /// Frequency ranks considered too common to annotate
    #[serde(default)]
    pub ignore_frequencies: Vec<u32>,

    /// Extra regex applied to every dictionary sense before display,
    /// e.g. to strip example sentences
    #[serde(default)]
    pub dictionary_cleanup_regex: Option<String>,

    /// Pronunciation-keyed fallback lookup
    #[serde(default)]
    pub pronunciation_lookup: PronunciationLookupConfig,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            highlight_colors: default_highlight_colors(),
            display_other_lemma: false,
            ignore_words: Vec::new(),
            ignore_tags: Vec::new(),
            ignore_frequencies: Vec::new(),
            dictionary_cleanup_regex: None,
            pronunciation_lookup: PronunciationLookupConfig::default(),
        }
    }
}

/// Pronunciation fallback settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PronunciationLookupConfig {
    /// Whether the pronunciation index is consulted at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Minimum word length for the fallback to apply
    #[serde(default = "default_pronunciation_min_chars")]
    pub min_chars: usize,
}

impl Default for PronunciationLookupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_chars: default_pronunciation_min_chars(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_highlight_colors() -> Vec<String> {
    vec!["#FFFFFF".to_string()]
}

fn default_true() -> bool {
    true
}

fn default_pronunciation_min_chars() -> usize {
    2
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.dictionary.trim().is_empty() {
            return Err(anyhow!("A dictionary file must be configured"));
        }

        if self.annotation.highlight_colors.is_empty() {
            return Err(anyhow!("highlight_colors should not be empty"));
        }
        for color in &self.annotation.highlight_colors {
            if !HTML_COLOR_REGEX.is_match(color) {
                return Err(anyhow!(
                    "Invalid highlight color '{}', expected #RRGGBB",
                    color
                ));
            }
        }

        // Make sure the cleanup regex compiles before the dictionary load
        if let Some(pattern) = &self.annotation.dictionary_cleanup_regex {
            Regex::new(pattern)
                .map_err(|e| anyhow!("Invalid dictionary_cleanup_regex '{}': {}", pattern, e))?;
        }

        Ok(())
    }

    /// Compiled sense cleanup regex, if configured
    pub fn dictionary_cleanup_regex(&self) -> Result<Option<Regex>> {
        match &self.annotation.dictionary_cleanup_regex {
            Some(pattern) => Ok(Some(Regex::new(pattern).map_err(|e| {
                anyhow!("Invalid dictionary_cleanup_regex '{}': {}", pattern, e)
            })?)),
            None => Ok(None),
        }
    }

    /// Build the match filter policy from the annotation settings
    pub fn filter_policy(&self) -> FilterPolicy {
        FilterPolicy {
            ignore_tags: self.annotation.ignore_tags.clone(),
            ignore_words: self.annotation.ignore_words.clone(),
            ignore_frequencies: self.annotation.ignore_frequencies.clone(),
        }
    }

    /// Build the pronunciation lookup settings
    pub fn pronunciation_lookup(&self) -> PronunciationLookup {
        PronunciationLookup {
            enabled: self.annotation.pronunciation_lookup.enabled,
            min_chars: self.annotation.pronunciation_lookup.min_chars,
        }
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            dictionary: String::new(),
            annotation: AnnotationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
