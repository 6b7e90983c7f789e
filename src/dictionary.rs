use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use isolang::Language;
use log::{debug, error, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::errors::DictionaryError;
use crate::language_utils;

// @module: Dictionary entries and the lemma/pronunciation index

/// Prefix of the tag that encodes an entry's frequency rank, e.g. "freq2"
const FREQUENCY_TAG_PREFIX: &str = "freq";

/// Header key carrying the dictionary metadata
const DICT_INFO_KEY: &str = "_about_this_dictionary";

/// Splitter for comma-separated lemma keys, pronunciations and tags
static LIST_SPLIT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*,\s*").unwrap());

/// Default cleanup applied to every sense before it is displayed,
/// mostly to strip example sentences from Japanese dictionaries.
static DEFAULT_SENSE_CLEANUP: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new("【例】.*").unwrap(),
        Regex::new(r"\(用例\).*").unwrap(),
    ]
});

/// One indexed definition group: several headwords sharing the same
/// senses, with optional pronunciations and free-form tags.
///
/// The frequency rank is derived once at construction from the single
/// `freq<N>` tag if present. More than one frequency tag is a data error:
/// it is logged and the frequency left unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryEntry {
    lemmas: Vec<String>,
    senses: Vec<String>,
    pronunciations: Option<Vec<String>>,
    tags: Option<HashSet<String>>,
    frequency: Option<u32>,
}

impl DictionaryEntry {
    /// Build a validated entry. Lemmas and senses must be non-empty.
    pub fn new(
        lemmas: Vec<String>,
        senses: Vec<String>,
        pronunciations: Option<Vec<String>>,
        tags: Option<HashSet<String>>,
    ) -> Result<Self, DictionaryError> {
        if lemmas.is_empty() {
            return Err(DictionaryError::InvalidEntry {
                key: String::from("<unnamed>"),
                reason: String::from("entry has no lemma"),
            });
        }
        if senses.is_empty() {
            return Err(DictionaryError::InvalidEntry {
                key: lemmas.join(", "),
                reason: String::from("entry has no sense defined"),
            });
        }
        let frequency = Self::frequency_from_tags(&lemmas, tags.as_ref());
        Ok(DictionaryEntry {
            lemmas,
            senses,
            pronunciations,
            tags,
            frequency,
        })
    }

    fn frequency_from_tags(lemmas: &[String], tags: Option<&HashSet<String>>) -> Option<u32> {
        let tags = tags?;
        let mut frequency_tags: Vec<&String> = tags
            .iter()
            .filter(|t| t.starts_with(FREQUENCY_TAG_PREFIX))
            .collect();
        frequency_tags.sort();
        match frequency_tags.as_slice() {
            [] => None,
            [single] => match single[FREQUENCY_TAG_PREFIX.len()..].parse::<u32>() {
                Ok(freq) => Some(freq),
                Err(_) => {
                    warn!(
                        "Dictionary entry {} has an unparsable frequency tag '{}'",
                        lemmas.join(", "),
                        single
                    );
                    None
                }
            },
            _ => {
                error!(
                    "Dictionary entry {} has multiple frequency tags",
                    lemmas.join(", ")
                );
                None
            }
        }
    }

    /// Surface headwords, in dictionary order
    pub fn lemmas(&self) -> &[String] {
        &self.lemmas
    }

    /// Gloss strings, in dictionary order
    pub fn senses(&self) -> &[String] {
        &self.senses
    }

    /// Pronunciations, when the dictionary provides them
    pub fn pronunciations(&self) -> Option<&[String]> {
        self.pronunciations.as_deref()
    }

    /// Free-form labels attached to this entry
    pub fn tags(&self) -> Option<&HashSet<String>> {
        self.tags.as_ref()
    }

    /// Frequency rank parsed from the `freq<N>` tag, if any
    pub fn frequency(&self) -> Option<u32> {
        self.frequency
    }
}

/// Lemma- and pronunciation-indexed dictionary.
///
/// Both indexes map a key to one or more entries; a miss yields an empty
/// slice, never an error. Entries are shared between keys since one entry
/// is indexed under each of its lemmas and pronunciations.
#[derive(Debug)]
pub struct Dictionary {
    title: String,
    language: Language,
    by_lemma: HashMap<String, Vec<Arc<DictionaryEntry>>>,
    by_pronunciation: HashMap<String, Vec<Arc<DictionaryEntry>>>,
}

impl Dictionary {
    /// Create an empty dictionary, mostly useful as a builder in tests
    pub fn new(title: impl Into<String>, language: Language) -> Self {
        Dictionary {
            title: title.into(),
            language,
            by_lemma: HashMap::new(),
            by_pronunciation: HashMap::new(),
        }
    }

    /// Title declared in the dictionary header
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Source language the dictionary glosses from
    pub fn language(&self) -> Language {
        self.language
    }

    /// Number of distinct lemma keys
    pub fn lemma_count(&self) -> usize {
        self.by_lemma.len()
    }

    /// Index an entry under each of its lemmas and pronunciations
    pub fn add_entry(&mut self, entry: DictionaryEntry) {
        let entry = Arc::new(entry);
        for lemma in entry.lemmas() {
            self.by_lemma
                .entry(lemma.clone())
                .or_default()
                .push(Arc::clone(&entry));
        }
        if let Some(pronunciations) = entry.pronunciations() {
            for pronunciation in pronunciations {
                self.by_pronunciation
                    .entry(pronunciation.clone())
                    .or_default()
                    .push(Arc::clone(&entry));
            }
        }
    }

    /// Search for a lemma. A miss returns an empty slice.
    pub fn lookup_by_lemma(&self, key: &str) -> &[Arc<DictionaryEntry>] {
        self.by_lemma.get(key).map_or(&[], |entries| entries.as_slice())
    }

    /// Search for a pronunciation. A miss returns an empty slice.
    pub fn lookup_by_pronunciation(&self, key: &str) -> &[Arc<DictionaryEntry>] {
        self.by_pronunciation
            .get(key)
            .map_or(&[], |entries| entries.as_slice())
    }

    /// Load a jiji-style dictionary from a JSON file.
    pub fn load<P: AsRef<Path>>(
        path: P,
        cleanup_regex: Option<&Regex>,
    ) -> Result<Self, DictionaryError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| DictionaryError::ReadFailed(format!("{:?}: {}", path, e)))?;
        Self::parse(&content, cleanup_regex)
    }

    /// Parse a jiji-style dictionary document.
    ///
    /// The document is a JSON object with an `_about_this_dictionary`
    /// header (title, source language) and one object per headword group:
    /// the key is a comma-separated lemma list, the value carries `sense`
    /// or `senses`, and optionally comma-separated `pronunciation` and
    /// `tags` strings. Entries with no sense are skipped with an error
    /// log; the file as a whole still loads.
    pub fn parse(content: &str, cleanup_regex: Option<&Regex>) -> Result<Self, DictionaryError> {
        let document: Value = serde_json::from_str(content)
            .map_err(|e| DictionaryError::ParseError(e.to_string()))?;
        let map = document
            .as_object()
            .ok_or_else(|| DictionaryError::ParseError(String::from("document is not an object")))?;

        let (title, language) = Self::parse_header(map.get(DICT_INFO_KEY))?;
        info!(
            "Using {} dictionary '{}'",
            language_utils::language_name(language),
            title
        );

        let mut dictionary = Dictionary::new(title, language);
        for (key, value) in map {
            if key == DICT_INFO_KEY {
                continue;
            }
            match Self::parse_entry(key, value, cleanup_regex) {
                Ok(entry) => dictionary.add_entry(entry),
                Err(e) => error!("Skipping dictionary entry: {}", e),
            }
        }
        debug!("Dictionary loaded with {} lemma keys", dictionary.lemma_count());
        Ok(dictionary)
    }

    fn parse_header(header: Option<&Value>) -> Result<(String, Language), DictionaryError> {
        let header = header.ok_or_else(|| {
            DictionaryError::InvalidHeader(format!("missing '{}' key", DICT_INFO_KEY))
        })?;
        let title = header
            .get("title")
            .and_then(|v| v.as_str())
            .ok_or_else(|| DictionaryError::InvalidHeader(String::from("missing title")))?
            .to_string();
        let language_str = header
            .get("languages")
            .and_then(|l| l.get("from"))
            .and_then(|v| v.as_str())
            .ok_or_else(|| DictionaryError::InvalidHeader(String::from("missing source language")))?;
        let language = language_utils::resolve_language(language_str)
            .map_err(|_| DictionaryError::UnsupportedLanguage(language_str.to_string()))?;
        Ok((title, language))
    }

    fn parse_entry(
        key: &str,
        value: &Value,
        cleanup_regex: Option<&Regex>,
    ) -> Result<DictionaryEntry, DictionaryError> {
        let object = value.as_object().ok_or_else(|| DictionaryError::InvalidEntry {
            key: key.to_string(),
            reason: String::from("entry is not an object"),
        })?;

        let mut senses: Vec<String> = Vec::new();
        if let Some(sense) = object.get("sense").and_then(|v| v.as_str()) {
            senses.push(sense.to_string());
        } else if let Some(list) = object.get("senses").and_then(|v| v.as_array()) {
            senses.extend(list.iter().filter_map(|v| v.as_str()).map(String::from));
        }
        if senses.is_empty() {
            return Err(DictionaryError::InvalidEntry {
                key: key.to_string(),
                reason: String::from("entry has no sense defined"),
            });
        }
        let senses = cleanup_senses(senses, cleanup_regex);

        let pronunciations = object
            .get("pronunciation")
            .and_then(|v| v.as_str())
            .map(split_list);

        let tags: Option<HashSet<String>> = object
            .get("tags")
            .and_then(|v| v.as_str())
            .map(|s| split_list(s).into_iter().collect());

        let lemmas = split_list(key);
        DictionaryEntry::new(lemmas, senses, pronunciations, tags)
    }
}

fn split_list(value: &str) -> Vec<String> {
    LIST_SPLIT_REGEX
        .split(value.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Strip example sentences and user-configured noise from senses
/// before they ever reach the screen.
fn cleanup_senses(senses: Vec<String>, cleanup_regex: Option<&Regex>) -> Vec<String> {
    senses
        .into_iter()
        .map(|sense| {
            let mut cleaned = sense;
            for re in DEFAULT_SENSE_CLEANUP.iter() {
                cleaned = re.replace_all(&cleaned, "").into_owned();
            }
            if let Some(re) = cleanup_regex {
                cleaned = re.replace_all(&cleaned, "").into_owned();
            }
            cleaned.trim().to_string()
        })
        .collect()
}
