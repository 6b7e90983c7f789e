/*!
 * End-to-end tests running captions through the full annotation pipeline
 */

use glossub::annotator::CaptionAnnotator;
use glossub::filter::FilterPolicy;
use glossub::matcher::PronunciationLookup;
use glossub::renderer::Renderer;
use glossub::subtitle_processor::{SubtitleCollection, SubtitleEntry, GLOSSUB_SIGNATURE};
use glossub::tokenizer::{PosTag, Tokenizer, WhitespaceTokenizer};

use crate::common;
use crate::common::fake_tokenizer::FakeTokenizer;

fn japanese_tagger() -> FakeTokenizer {
    FakeTokenizer::new(
        common::japanese(),
        &[
            ("走っ", PosTag::Verb, Some("走る")),
            ("学校", PosTag::Noun, None),
            ("銀行", PosTag::Noun, None),
            ("がっこう", PosTag::Noun, None),
            ("昨日", PosTag::Noun, None),
            ("て", PosTag::Sconj, None),
            ("た", PosTag::Aux, None),
            ("に", PosTag::Part, None),
            ("は", PosTag::Part, None),
        ],
    )
}

fn japanese_annotator(tokenizer: FakeTokenizer, policy: FilterPolicy) -> CaptionAnnotator {
    CaptionAnnotator::new(
        Box::new(tokenizer),
        common::japanese_dictionary(),
        PronunciationLookup::default(),
        policy,
        Renderer::new(vec!["#FF0000".to_string()], false),
    )
}

#[test]
fn test_annotate_caption_withConjugatedVerb_shouldDefineItsLemma() {
    let annotator = japanese_annotator(japanese_tagger(), FilterPolicy::default());

    let rendered = annotator.annotate_caption(1, "昨日走った").unwrap();
    assert_eq!(
        rendered.annotation_lines,
        vec!["★ <font color=\"#FF0000\">走る</font> [はしる]  to run"]
    );
    assert_eq!(
        rendered.highlighted_text,
        "昨日<font color=\"#FF0000\">走っ</font>た"
    );
}

#[test]
fn test_annotate_caption_withConjunctiveParticle_shouldMergeAndStillMatch() {
    let annotator = japanese_annotator(japanese_tagger(), FilterPolicy::default());

    // 走っ + て merge into one word that matches through its lemma
    let rendered = annotator.annotate_caption(1, "走って学校に").unwrap();
    assert_eq!(rendered.annotation_lines.len(), 2);
    assert!(rendered.annotation_lines[0].contains("走る"));
    assert!(rendered.annotation_lines[1].contains("学校"));
    assert!(rendered
        .highlighted_text
        .contains("<font color=\"#FF0000\">走って</font>"));
}

#[test]
fn test_annotate_caption_withSoftLineBreak_shouldMatchAcrossLines() {
    let annotator = japanese_annotator(japanese_tagger(), FilterPolicy::default());

    let rendered = annotator.annotate_caption(1, "昨日は\n走った").unwrap();
    assert_eq!(rendered.annotation_lines.len(), 1);
    assert!(rendered.annotation_lines[0].contains("走る"));
}

#[test]
fn test_annotate_caption_withKanaSpelling_shouldBeIgnoredByJapaneseRules() {
    let annotator = japanese_annotator(japanese_tagger(), FilterPolicy::default());

    // がっこう resolves through the pronunciation index, but an all-kana
    // noun is not worth annotating under the Japanese rules
    let rendered = annotator.annotate_caption(1, "がっこうに").unwrap();
    assert!(rendered.annotation_lines.is_empty());
}

#[test]
fn test_annotate_caption_withIgnoredWord_shouldSkipIt() {
    let policy = FilterPolicy {
        ignore_words: vec!["学校".to_string()],
        ..Default::default()
    };
    let annotator = japanese_annotator(japanese_tagger(), policy);

    let rendered = annotator.annotate_caption(1, "学校に走った").unwrap();
    assert_eq!(rendered.annotation_lines.len(), 1);
    assert!(rendered.annotation_lines[0].contains("走る"));
}

#[test]
fn test_annotate_caption_withIgnoredFrequency_shouldSkipCommonWords() {
    let policy = FilterPolicy {
        ignore_frequencies: vec![1],
        ..Default::default()
    };
    let annotator = japanese_annotator(japanese_tagger(), policy);

    // 銀行 carries freq1 in the test dictionary
    let rendered = annotator.annotate_caption(1, "銀行に走った").unwrap();
    assert_eq!(rendered.annotation_lines.len(), 1);
    assert!(rendered.annotation_lines[0].contains("走る"));
}

#[test]
fn test_annotate_caption_withEnglishSubtitle_shouldMatchMultiWordExpressions() {
    let annotator = CaptionAnnotator::new(
        Box::new(WhitespaceTokenizer::new(common::english())),
        common::english_dictionary(),
        PronunciationLookup::default(),
        FilterPolicy::default(),
        Renderer::new(vec!["#00FF00".to_string()], false),
    );

    let rendered = annotator
        .annotate_caption(1, "They make it up daily")
        .unwrap();
    assert_eq!(rendered.annotation_lines.len(), 1);
    assert!(rendered.annotation_lines[0].contains("to invent a story"));
    assert!(rendered
        .highlighted_text
        .contains("<font color=\"#00FF00\">make it up</font>"));
}

#[test]
fn test_annotate_collection_withJapaneseFile_shouldInsertDefinitionsAndSignature() {
    let annotator = japanese_annotator(japanese_tagger(), FilterPolicy::default());

    let mut collection = SubtitleCollection::new("episode.srt".into(), "ja".to_string());
    collection
        .entries
        .push(SubtitleEntry::new(1, 10_000, 12_000, "昨日走った".to_string()));
    collection
        .entries
        .push(SubtitleEntry::new(2, 20_000, 22_000, "学校に".to_string()));

    let annotated = annotator.annotate_collection(&mut collection);
    assert_eq!(annotated, 2);

    // Signature first, then each caption followed by its definitions
    assert_eq!(collection.entries.len(), 5);
    assert!(collection.entries[0].text.contains(GLOSSUB_SIGNATURE));
    assert!(collection.entries[0].text.contains("Test Japanese Dictionary"));
    assert!(collection.entries[1].text.contains("走っ"));
    assert!(collection.entries[2].text.starts_with("★"));
    assert!(collection.entries[2].text.contains("to run"));
    assert!(collection.entries[3].text.contains("学校"));
    assert!(collection.entries[4].text.contains("school"));
    let seq_nums: Vec<usize> = collection.entries.iter().map(|e| e.seq_num).collect();
    assert_eq!(seq_nums, vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_annotate_collection_withNoMatches_shouldLeaveFileAlone() {
    let annotator = japanese_annotator(japanese_tagger(), FilterPolicy::default());

    let mut collection = SubtitleCollection::new("episode.srt".into(), "ja".to_string());
    collection
        .entries
        .push(SubtitleEntry::new(1, 10_000, 12_000, "昨日に".to_string()));

    assert_eq!(annotator.annotate_collection(&mut collection), 0);
    assert_eq!(collection.entries.len(), 1);
    assert!(!collection.entries[0].text.contains(GLOSSUB_SIGNATURE));
}

#[test]
fn test_annotate_collection_withFailingCaption_shouldAnnotateTheRest() {
    let tokenizer = japanese_tagger().failing_on("故障");
    let annotator = japanese_annotator(tokenizer, FilterPolicy::default());

    let mut collection = SubtitleCollection::new("episode.srt".into(), "ja".to_string());
    collection
        .entries
        .push(SubtitleEntry::new(1, 10_000, 12_000, "故障した".to_string()));
    collection
        .entries
        .push(SubtitleEntry::new(2, 20_000, 22_000, "昨日走った".to_string()));

    assert_eq!(annotator.annotate_collection(&mut collection), 1);
}

#[test]
fn test_annotate_collection_withWrittenOutput_shouldBeDetectedAsAnnotated() {
    let annotator = japanese_annotator(japanese_tagger(), FilterPolicy::default());
    let temp_dir = common::create_temp_dir().unwrap();
    let output = temp_dir.path().join("episode.annotated.srt");

    let mut collection = SubtitleCollection::new("episode.srt".into(), "ja".to_string());
    collection
        .entries
        .push(SubtitleEntry::new(1, 10_000, 12_000, "昨日走った".to_string()));

    annotator.annotate_collection(&mut collection);
    collection.write_to_srt(&output).unwrap();

    let content = std::fs::read_to_string(&output).unwrap();
    assert!(SubtitleCollection::is_annotated(&content));
    let reparsed = SubtitleCollection::parse_srt_string(&content).unwrap();
    assert_eq!(reparsed.len(), 3);
}

#[test]
fn test_tokenizer_trait_withFakeTagger_shouldSegmentGreedily() {
    let tokenizer = japanese_tagger();
    let tokens = tokenizer.tokenize("昨日学校に走った").unwrap();
    let texts: Vec<&str> = tokens.iter().map(|t| t.text_form()).collect();
    assert_eq!(texts, vec!["昨日", "学校", "に", "走っ", "た"]);
}
