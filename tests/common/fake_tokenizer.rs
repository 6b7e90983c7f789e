/*!
 * A deterministic lexicon-based tokenizer for integration tests
 */

use anyhow::{anyhow, Result};
use isolang::Language;

use glossub::tokenizer::{PosTag, TextToken, Tokenizer};

/// One known word: its surface form, its tag and an optional canonical
/// form (the dictionary key when the surface form is conjugated).
#[derive(Debug, Clone)]
pub struct LexiconWord {
    pub text: String,
    pub pos: PosTag,
    pub canonical: Option<String>,
}

/// Greedy longest-prefix segmenter over a fixed lexicon, standing in for
/// a real part-of-speech tagger. Characters not covered by the lexicon
/// become single UNKNOWN tokens.
pub struct FakeTokenizer {
    language: Language,
    lexicon: Vec<LexiconWord>,
    fail_on: Option<String>,
}

impl FakeTokenizer {
    pub fn new(language: Language, words: &[(&str, PosTag, Option<&str>)]) -> Self {
        let mut lexicon: Vec<LexiconWord> = words
            .iter()
            .map(|(text, pos, canonical)| LexiconWord {
                text: text.to_string(),
                pos: *pos,
                canonical: canonical.map(str::to_string),
            })
            .collect();
        // Longest words first so the segmenter is greedy
        lexicon.sort_by_key(|w| std::cmp::Reverse(w.text.chars().count()));
        FakeTokenizer {
            language,
            lexicon,
            fail_on: None,
        }
    }

    /// Makes tokenize fail whenever the text contains the given marker
    pub fn failing_on(mut self, marker: &str) -> Self {
        self.fail_on = Some(marker.to_string());
        self
    }
}

impl Tokenizer for FakeTokenizer {
    fn language(&self) -> Language {
        self.language
    }

    fn tokenize(&self, text: &str) -> Result<Vec<TextToken>> {
        if let Some(marker) = &self.fail_on {
            if text.contains(marker.as_str()) {
                return Err(anyhow!("tagger crashed on '{}'", marker));
            }
        }

        let mut tokens = Vec::new();
        let mut rest = text;
        while !rest.is_empty() {
            if let Some(word) = self.lexicon.iter().find(|w| rest.starts_with(&w.text)) {
                tokens.push(TextToken::new(
                    word.pos,
                    word.text.clone(),
                    word.canonical.clone(),
                    None,
                )?);
                rest = &rest[word.text.len()..];
                continue;
            }
            // Unknown leading character becomes its own token
            let ch = rest.chars().next().unwrap();
            if !ch.is_whitespace() {
                tokens.push(TextToken::new(PosTag::Unknown, ch.to_string(), None, None)?);
            }
            rest = &rest[ch.len_utf8()..];
        }
        Ok(tokens)
    }
}
