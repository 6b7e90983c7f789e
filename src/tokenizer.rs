use std::fmt;

use anyhow::{anyhow, Result};
use isolang::Language;

use crate::language_utils;

// @module: Text tokens and the tokenizer collaborator contract

/// Universal part-of-speech tags.
/// See http://universaldependencies.org/u/pos/all.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PosTag {
    /// adjective
    Adj,
    /// adverb
    Adv,
    /// interjection
    Intj,
    /// noun
    Noun,
    /// proper noun
    Propn,
    /// verb
    Verb,
    /// adposition
    Adp,
    /// auxiliary
    Aux,
    /// coordinating conjunction
    Cconj,
    /// determiner
    Det,
    /// numeral
    Num,
    /// particle
    Part,
    /// pronoun
    Pron,
    /// subordinating conjunction
    Sconj,
    /// punctuation
    Punct,
    /// symbol
    Sym,
    /// other
    X,
    /// tag missing or not recognized by the tagger
    Unknown,
}

impl PosTag {
    /// True for tags that never form part of a dictionary match
    /// (punctuation, symbols, numerals, unclassified junk).
    pub fn is_not_a_word(self) -> bool {
        matches!(self, PosTag::Punct | PosTag::Sym | PosTag::Num | PosTag::X)
    }

    /// True for purely grammatical tags that carry no dictionary
    /// interest on their own (particles, determiners, conjunctions,
    /// auxiliaries).
    pub fn is_ignorable_grammar(self) -> bool {
        matches!(
            self,
            PosTag::Part | PosTag::Det | PosTag::Cconj | PosTag::Sconj | PosTag::Aux
        )
    }
}

impl fmt::Display for PosTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PosTag::Adj => "ADJ",
            PosTag::Adv => "ADV",
            PosTag::Intj => "INTJ",
            PosTag::Noun => "NOUN",
            PosTag::Propn => "PROPN",
            PosTag::Verb => "VERB",
            PosTag::Adp => "ADP",
            PosTag::Aux => "AUX",
            PosTag::Cconj => "CCONJ",
            PosTag::Det => "DET",
            PosTag::Num => "NUM",
            PosTag::Part => "PART",
            PosTag::Pron => "PRON",
            PosTag::Sconj => "SCONJ",
            PosTag::Punct => "PUNCT",
            PosTag::Sym => "SYM",
            PosTag::X => "X",
            PosTag::Unknown => "UNKNOWN",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for PosTag {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "ADJ" => Ok(PosTag::Adj),
            "ADV" => Ok(PosTag::Adv),
            "INTJ" => Ok(PosTag::Intj),
            "NOUN" => Ok(PosTag::Noun),
            "PROPN" => Ok(PosTag::Propn),
            "VERB" => Ok(PosTag::Verb),
            "ADP" => Ok(PosTag::Adp),
            "AUX" => Ok(PosTag::Aux),
            "CCONJ" => Ok(PosTag::Cconj),
            "DET" => Ok(PosTag::Det),
            "NUM" => Ok(PosTag::Num),
            "PART" => Ok(PosTag::Part),
            "PRON" => Ok(PosTag::Pron),
            "SCONJ" => Ok(PosTag::Sconj),
            "PUNCT" => Ok(PosTag::Punct),
            "SYM" => Ok(PosTag::Sym),
            "X" => Ok(PosTag::X),
            "UNKNOWN" => Ok(PosTag::Unknown),
            _ => Err(anyhow!("Invalid part-of-speech tag: {}", s)),
        }
    }
}

/// One tagged unit of text produced by a tokenizer.
///
/// A token carries the surface form as it appeared in the caption plus up
/// to two canonical (dictionary) forms. When the tokenizer supplies no
/// canonical form, the lower-cased surface form is used instead, so both
/// canonical accessors are always non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextToken {
    pos: PosTag,
    text_form: String,
    first_canonical_form: String,
    second_canonical_form: String,
}

impl TextToken {
    /// Create a validated token. An empty text form is a contract
    /// violation in the tokenizer, not a recoverable input error.
    pub fn new(
        pos: PosTag,
        text_form: impl Into<String>,
        first_canonical_form: Option<String>,
        second_canonical_form: Option<String>,
    ) -> Result<Self> {
        let text_form = text_form.into();
        if text_form.is_empty() {
            return Err(anyhow!("Cannot create a text token from an empty string"));
        }
        let fallback = text_form.to_lowercase();
        let first_canonical_form = first_canonical_form
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| fallback.clone());
        let second_canonical_form = second_canonical_form
            .filter(|s| !s.is_empty())
            .unwrap_or(fallback);
        Ok(TextToken {
            pos,
            text_form,
            first_canonical_form,
            second_canonical_form,
        })
    }

    /// Part-of-speech tag assigned by the tokenizer
    pub fn pos(&self) -> PosTag {
        self.pos
    }

    /// Surface form, exactly as it appeared in the caption
    pub fn text_form(&self) -> &str {
        &self.text_form
    }

    /// Primary canonical form used for dictionary lookups
    pub fn first_canonical_form(&self) -> &str {
        &self.first_canonical_form
    }

    /// Secondary canonical form used for dictionary lookups
    pub fn second_canonical_form(&self) -> &str {
        &self.second_canonical_form
    }
}

/// The tokenizer collaborator contract.
///
/// A tokenizer turns raw caption text into an ordered sequence of tagged
/// tokens for one language. Real part-of-speech taggers live outside this
/// crate and plug in through this trait; they must never return a token
/// with an empty text form.
pub trait Tokenizer: Send + Sync {
    /// The language this tokenizer handles
    fn language(&self) -> Language;

    /// Split text into an ordered token sequence
    fn tokenize(&self, text: &str) -> Result<Vec<TextToken>>;

    /// The string used to join token forms for dictionary lookups:
    /// empty for languages written without inter-word spaces, a single
    /// space otherwise.
    fn word_separator(&self) -> &'static str {
        language_utils::word_separator(self.language())
    }
}

/// Fallback tokenizer used when no language-specific tagger is wired in.
///
/// It splits on whitespace, peels punctuation off word boundaries, and
/// tags numbers and punctuation; everything else is UNKNOWN with the
/// lower-cased surface form as both canonical forms. Good enough for
/// space-separated languages with a surface-form dictionary; a real
/// tagger is required for lemma-based lookups.
#[derive(Debug)]
pub struct WhitespaceTokenizer {
    language: Language,
}

impl WhitespaceTokenizer {
    pub fn new(language: Language) -> Self {
        WhitespaceTokenizer { language }
    }

    fn classify(word: &str) -> PosTag {
        if word.chars().all(|c| c.is_ascii_digit()) {
            PosTag::Num
        } else if word.chars().all(|c| !c.is_alphanumeric()) {
            PosTag::Punct
        } else {
            PosTag::Unknown
        }
    }

    fn push_word(tokens: &mut Vec<TextToken>, word: &str) -> Result<()> {
        if word.is_empty() {
            return Ok(());
        }
        tokens.push(TextToken::new(Self::classify(word), word, None, None)?);
        Ok(())
    }
}

impl Tokenizer for WhitespaceTokenizer {
    fn language(&self) -> Language {
        self.language
    }

    fn tokenize(&self, text: &str) -> Result<Vec<TextToken>> {
        let mut tokens = Vec::new();
        for chunk in text.split_whitespace() {
            // Peel leading and trailing punctuation into their own tokens
            let core = chunk.trim_matches(|c: char| c.is_ascii_punctuation());
            if core.is_empty() {
                Self::push_word(&mut tokens, chunk)?;
                continue;
            }
            let core_start = chunk.find(core).unwrap_or(0);
            Self::push_word(&mut tokens, &chunk[..core_start])?;
            Self::push_word(&mut tokens, core)?;
            Self::push_word(&mut tokens, &chunk[core_start + core.len()..])?;
        }
        Ok(tokens)
    }
}
