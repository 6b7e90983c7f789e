use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for dictionary language handling
///
/// This module resolves the language a dictionary declares (by English
/// name or ISO code) to an `isolang::Language`, and knows which languages
/// are written without inter-word spaces.
/// Languages written without spaces between words (ISO 639-3 codes).
/// Tokens of these languages are joined with an empty separator for
/// dictionary lookups.
const LANGUAGES_WITHOUT_SPACES: [&str; 3] = ["jpn", "zho", "vie"];

/// Resolve a language from an English name ("Japanese") or an ISO 639-1/
/// 639-3 code ("ja", "jpn").
pub fn resolve_language(name_or_code: &str) -> Result<Language> {
    let trimmed = name_or_code.trim();

    if let Some(lang) = Language::from_name(trimmed) {
        return Ok(lang);
    }

    let lowered = trimmed.to_lowercase();
    match lowered.len() {
        2 => {
            if let Some(lang) = Language::from_639_1(&lowered) {
                return Ok(lang);
            }
        }
        3 => {
            if let Some(lang) = Language::from_639_3(&lowered) {
                return Ok(lang);
            }
        }
        _ => {}
    }

    Err(anyhow!("Unsupported language: {}", name_or_code))
}

/// The string used to join token forms before a dictionary lookup:
/// empty for languages written without inter-word spacing, a single
/// space otherwise.
pub fn word_separator(language: Language) -> &'static str {
    if LANGUAGES_WITHOUT_SPACES.contains(&language.to_639_3()) {
        ""
    } else {
        " "
    }
}

/// Get the English language name from a resolved language
pub fn language_name(language: Language) -> &'static str {
    language.to_name()
}
