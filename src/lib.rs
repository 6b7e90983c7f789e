/*!
 * # glossub - dictionary definitions inside your subtitles
 *
 * A Rust library for annotating subtitle files with dictionary
 * definitions, aimed at language learners who want to watch without
 * pausing to look words up.
 *
 * ## Features
 *
 * - Parse and write SRT subtitle files
 * - Look up caption words in a JIJI-format JSON dictionary
 * - Greedy longest-match grouping of tokens into dictionary words
 * - Pronunciation-keyed fallback lookup for kana dictionaries
 * - Per-language annotation rules (Japanese supported out of the box)
 * - Configurable filtering by tag, word list and frequency rank
 * - Highlighted words and per-caption definition captions
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `dictionary`: Dictionary entries and the lemma/pronunciation index
 * - `tokenizer`: Part-of-speech tagged tokens and the tokenizer seam
 * - `matcher`: Greedy longest-span dictionary matching
 * - `lang_rules`: Per-language annotation policy
 * - `filter`: Match filter pipeline
 * - `renderer`: Definition lines, highlighting, frequency glyphs
 * - `annotator`: Caption annotation orchestrator
 * - `subtitle_processor`: Subtitle file handling and processing
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod annotator;
pub mod app_config;
pub mod app_controller;
pub mod dictionary;
pub mod errors;
pub mod file_utils;
pub mod filter;
pub mod lang_rules;
pub mod language_utils;
pub mod matcher;
pub mod renderer;
pub mod subtitle_processor;
pub mod tokenizer;

// Re-export main types for easier usage
pub use annotator::CaptionAnnotator;
pub use app_config::Config;
pub use dictionary::{Dictionary, DictionaryEntry};
pub use matcher::{DictionaryMatch, Matcher, PronunciationLookup};
pub use subtitle_processor::{SubtitleCollection, SubtitleEntry};
pub use tokenizer::{PosTag, TextToken, Tokenizer, WhitespaceTokenizer};
pub use errors::{AnnotationError, AppError, DictionaryError, SubtitleError};
