use log::{debug, error};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::dictionary::Dictionary;
use crate::errors::AnnotationError;
use crate::filter::{self, FilterPolicy};
use crate::lang_rules::{self, LangRules};
use crate::matcher::{Matcher, PronunciationLookup};
use crate::renderer::{RenderedCaption, Renderer};
use crate::subtitle_processor::{AnnotationCaption, SubtitleCollection};
use crate::tokenizer::Tokenizer;

// @module: Caption annotation orchestrator

static HTML_TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());
static CONSECUTIVE_DOTS_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.+").unwrap());

/// Drives one caption through the full annotation pipeline:
/// clean, tokenize, match, filter, render.
pub struct CaptionAnnotator {
    tokenizer: Box<dyn Tokenizer>,
    dictionary: Dictionary,
    pronunciation_lookup: PronunciationLookup,
    filter_policy: FilterPolicy,
    renderer: Renderer,
    lang_rules: Option<Box<dyn LangRules>>,
    word_separator: &'static str,
}

impl CaptionAnnotator {
    pub fn new(
        tokenizer: Box<dyn Tokenizer>,
        dictionary: Dictionary,
        pronunciation_lookup: PronunciationLookup,
        filter_policy: FilterPolicy,
        renderer: Renderer,
    ) -> Self {
        let word_separator = tokenizer.word_separator();
        let lang_rules = lang_rules::rules_for(dictionary.language());
        CaptionAnnotator {
            tokenizer,
            dictionary,
            pronunciation_lookup,
            filter_policy,
            renderer,
            lang_rules,
            word_separator,
        }
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Annotate one caption. The returned annotation lines are empty when
    /// nothing in the caption was worth defining.
    ///
    /// The seq_num only identifies the caption in errors and logs.
    pub fn annotate_caption(
        &self,
        seq_num: usize,
        caption_markup: &str,
    ) -> Result<RenderedCaption, AnnotationError> {
        let cleaned = self.clean_caption_text(caption_markup);

        let mut tokens =
            self.tokenizer
                .tokenize(&cleaned)
                .map_err(|err| AnnotationError::Caption {
                    seq_num,
                    message: err.to_string(),
                })?;
        if let Some(rules) = &self.lang_rules {
            tokens = rules.filter_tokens(tokens);
        }

        let matcher = Matcher::new(
            &self.dictionary,
            self.word_separator,
            self.pronunciation_lookup,
        );
        let matches = matcher.find_matches(&tokens);
        let matches = filter::filter_matches(
            matches,
            &self.filter_policy,
            self.lang_rules.as_deref(),
        );
        if matches.is_empty() {
            debug!("No dictionary match for caption {}", seq_num);
        }

        Ok(self
            .renderer
            .render_caption(caption_markup, &matches, self.word_separator))
    }

    /// Annotate every caption of a subtitle collection in place.
    ///
    /// A caption that fails to annotate is logged and skipped, the rest
    /// of the file is still processed. Returns the number of captions
    /// that received definitions. When at least one did, the definition
    /// captions are slotted in and the signature caption is added.
    pub fn annotate_collection(&self, collection: &mut SubtitleCollection) -> usize {
        let mut annotations: Vec<AnnotationCaption> = Vec::new();
        for entry in &mut collection.entries {
            let rendered = match self.annotate_caption(entry.seq_num, &entry.text) {
                Ok(rendered) => rendered,
                Err(err) => {
                    error!("{}", err);
                    continue;
                }
            };
            if rendered.annotation_lines.is_empty() {
                continue;
            }
            entry.text = rendered.highlighted_text;
            annotations.push(AnnotationCaption {
                start_time_ms: entry.start_time_ms,
                end_time_ms: entry.end_time_ms,
                text: rendered.annotation_lines.join("\n"),
            });
        }

        let annotated_count = annotations.len();
        if annotated_count > 0 {
            collection.insert_annotations(annotations);
            collection.add_signature_caption(self.dictionary.title());
        }
        annotated_count
    }

    /// Normalize the caption markup into plain text the tokenizer can
    /// work with.
    fn clean_caption_text(&self, caption: &str) -> String {
        let cleaned = caption.trim();
        // Soft line breaks inside a caption are just word separators
        let cleaned = cleaned.replace('\n', self.word_separator);
        let cleaned = HTML_TAG_REGEX.replace_all(&cleaned, "");
        // Ellipses confuse sentence segmentation, keep a single dot
        CONSECUTIVE_DOTS_REGEX
            .replace_all(&cleaned, ".")
            .into_owned()
    }
}
