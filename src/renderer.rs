use std::collections::{HashSet, VecDeque};

use log::{debug, warn};
use regex::Regex;

use crate::matcher::DictionaryMatch;

// @module: Annotation rendering

/// Unicode base for the frequency rank display, '①' .. '⑳'
pub const CIRCLED_DIGIT_ONE: char = '\u{2460}';

/// Highest frequency rank that has a circled digit glyph.
const MAX_GLYPH_RANK: u32 = 20;

/// Map a frequency rank to its circled digit glyph.
pub fn frequency_glyph(rank: u32) -> Option<char> {
    if (1..=MAX_GLYPH_RANK).contains(&rank) {
        char::from_u32(CIRCLED_DIGIT_ONE as u32 + rank - 1)
    } else {
        warn!("Frequency rank {} has no display glyph", rank);
        None
    }
}

/// Wrap text in SRT font color markup.
pub fn color_text(text: &str, html_hex_color: &str) -> String {
    format!("<font color=\"{}\">{}</font>", html_hex_color, text)
}

/// Wrap text in SRT bold markup.
pub fn bold_text(text: &str) -> String {
    format!("<b>{}</b>", text)
}

/// The outcome of rendering one caption's matches.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedCaption {
    /// One definition line per dictionary entry of each annotated match
    pub annotation_lines: Vec<String>,
    /// Caption text with the annotated words highlighted where possible
    pub highlighted_text: String,
}

/// Renders dictionary matches into definition lines and highlights the
/// matched words inside the caption markup.
#[derive(Debug, Clone)]
pub struct Renderer {
    highlight_colors: Vec<String>,
    display_other_lemma: bool,
}

impl Renderer {
    pub fn new(highlight_colors: Vec<String>, display_other_lemma: bool) -> Self {
        let highlight_colors = if highlight_colors.is_empty() {
            vec!["#FFFFFF".to_string()]
        } else {
            highlight_colors
        };
        Renderer {
            highlight_colors,
            display_other_lemma,
        }
    }

    /// Render the matches of one caption. Each caption starts from the
    /// same color sequence so the output is deterministic, and a word is
    /// only defined once per caption even when matched several times.
    pub fn render_caption(
        &self,
        caption_markup: &str,
        matches: &[DictionaryMatch],
        word_separator: &str,
    ) -> RenderedCaption {
        let mut colors: VecDeque<&str> = self.highlight_colors.iter().map(String::as_str).collect();
        let mut already_defined: HashSet<String> = HashSet::new();
        let mut annotation_lines: Vec<String> = Vec::new();
        let mut highlighted_text = caption_markup.to_string();

        for dictionary_match in matches {
            // The deque is never empty, there is at least the default color
            let color = *colors.front().unwrap();
            let text_form = dictionary_match.text_form();
            let lines = self.render_match(dictionary_match, color);
            if lines.is_empty() || already_defined.contains(&text_form) {
                continue;
            }
            annotation_lines.extend(lines);
            if let Some(updated) =
                highlight_word(&highlighted_text, &text_form, color, word_separator)
            {
                highlighted_text = updated;
            }
            colors.rotate_left(1);
            already_defined.insert(text_form);
        }

        RenderedCaption {
            annotation_lines,
            highlighted_text,
        }
    }

    /// Render one definition line per dictionary entry of the match.
    fn render_match(&self, dictionary_match: &DictionaryMatch, color: &str) -> Vec<String> {
        let mut lines = Vec::with_capacity(dictionary_match.entries().len());
        for entry in dictionary_match.entries() {
            // Show the lemma corresponding to the subtitle word in color,
            // and the other lemmas depending on user preference
            let lemmas = entry
                .lemmas()
                .iter()
                .filter_map(|lemma| {
                    if is_matched_lemma(lemma, dictionary_match) {
                        Some(color_text(lemma, color))
                    } else if self.display_other_lemma {
                        Some(lemma.clone())
                    } else {
                        None
                    }
                })
                .collect::<Vec<_>>()
                .join(", ");

            let frequency_str = match entry.frequency().and_then(frequency_glyph) {
                Some(glyph) => format!(" {} ", bold_text(&glyph.to_string())),
                None => " ".to_string(),
            };

            // Pronunciation is omitted when already visible in the lemmas.
            // When the matched word is absent from the lemmas the match
            // must have come from a pronunciation, so colorize it instead.
            let mut pronunciation_str = String::new();
            if let Some(pronunciations) = entry.pronunciations() {
                let in_lemmas = pronunciations.iter().any(|p| lemmas.contains(p.as_str()));
                if !in_lemmas {
                    pronunciation_str = format!(" [{}] ", pronunciations.join(", "));
                    if !contains_matched_lemma(&lemmas, dictionary_match) {
                        pronunciation_str = color_text(&pronunciation_str, color);
                    }
                }
            }

            // We don't know which sense corresponds to the subtitle word,
            // so all senses are shown
            lines.push(format!(
                "★ {}{}{}{}",
                lemmas,
                pronunciation_str,
                frequency_str,
                entry.senses().join(" --- ")
            ));
        }
        lines
    }
}

fn is_matched_lemma(lemma: &str, dictionary_match: &DictionaryMatch) -> bool {
    lemma == dictionary_match.first_canonical_form()
        || lemma == dictionary_match.second_canonical_form()
        || lemma == dictionary_match.text_form()
}

fn contains_matched_lemma(text: &str, dictionary_match: &DictionaryMatch) -> bool {
    text.contains(&dictionary_match.first_canonical_form())
        || text.contains(&dictionary_match.second_canonical_form())
        || text.contains(&dictionary_match.text_form())
}

/// Build a regex that finds a word inside caption markup even when it is
/// spread over several lines.
fn find_word_regex(expression: &str, word_separator: &str) -> String {
    if word_separator.is_empty() {
        // Allow a soft line break after every character except the last
        let escaped: Vec<String> = expression
            .chars()
            .map(|c| regex::escape(&c.to_string()))
            .collect();
        escaped.join("(?:\n)*")
    } else {
        // Same idea but line breaks only happen at word boundaries
        let escaped: Vec<String> = expression.split(' ').map(regex::escape).collect();
        format!(r"\b{}\b", escaped.join(r"\s+"))
    }
}

/// Highlight one word inside the caption markup. Returns the updated
/// markup, or None when the word cannot be located unambiguously.
pub fn highlight_word(
    caption_markup: &str,
    expression: &str,
    html_hex_color: &str,
    word_separator: &str,
) -> Option<String> {
    let pattern = find_word_regex(expression, word_separator);
    let regex = match Regex::new(&pattern) {
        Ok(regex) => regex,
        Err(err) => {
            debug!("Couldn't build highlight regex for {}: {}", expression, err);
            return None;
        }
    };

    let mut matches = regex.find_iter(caption_markup);
    let Some(first) = matches.next() else {
        debug!(
            "Couldn't highlight word {} because it wasn't found in {}",
            expression, caption_markup
        );
        return None;
    };
    // A second occurrence means we can't tell which one was annotated
    if matches.next().is_some() {
        debug!(
            "Couldn't highlight word {} because there are several matches in {}",
            expression, caption_markup
        );
        return None;
    }

    let mut highlighted = String::with_capacity(caption_markup.len() + 32);
    highlighted.push_str(&caption_markup[..first.start()]);
    highlighted.push_str(&color_text(first.as_str(), html_hex_color));
    highlighted.push_str(&caption_markup[first.end()..]);
    Some(highlighted)
}
