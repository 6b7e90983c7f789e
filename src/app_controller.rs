use anyhow::{Context, Result};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};

use crate::annotator::CaptionAnnotator;
use crate::app_config::Config;
use crate::dictionary::Dictionary;
use crate::errors::SubtitleError;
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::renderer::Renderer;
use crate::subtitle_processor::SubtitleCollection;
use crate::tokenizer::{Tokenizer, WhitespaceTokenizer};

// @module: Application controller for subtitle annotation

/// Suffix of the files we produce, also used to skip our own output
/// when processing a folder
const OUTPUT_SUFFIX: &str = "annotated";

/// Main application controller for subtitle annotation
pub struct Controller {
    // @field: Caption annotation pipeline, shared with worker tasks
    annotator: Arc<CaptionAnnotator>,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let cleanup_regex = config.dictionary_cleanup_regex()?;
        let dictionary = Dictionary::load(&config.dictionary, cleanup_regex.as_ref())
            .with_context(|| format!("Failed to load dictionary: {}", config.dictionary))?;
        info!(
            "Loaded dictionary '{}' ({} lemmas, language: {})",
            dictionary.title(),
            dictionary.lemma_count(),
            language_utils::language_name(dictionary.language())
        );

        let tokenizer: Box<dyn Tokenizer> =
            Box::new(WhitespaceTokenizer::new(dictionary.language()));
        let renderer = Renderer::new(
            config.annotation.highlight_colors.clone(),
            config.annotation.display_other_lemma,
        );
        let annotator = CaptionAnnotator::new(
            tokenizer,
            dictionary,
            config.pronunciation_lookup(),
            config.filter_policy(),
            renderer,
        );

        Ok(Self {
            annotator: Arc::new(annotator),
        })
    }

    /// Run the main workflow for a single subtitle file
    pub async fn run(&self, input_file: PathBuf, force_overwrite: bool) -> Result<()> {
        let start_time = std::time::Instant::now();

        if !input_file.exists() {
            return Err(anyhow::anyhow!("Input file does not exist: {:?}", input_file));
        }

        let output_path = FileManager::generate_output_path(&input_file, OUTPUT_SUFFIX, "srt");
        if output_path.exists() && !force_overwrite {
            warn!("Skipping file, annotated version already exists (use -f to force overwrite)");
            return Ok(());
        }

        let annotator = Arc::clone(&self.annotator);
        let written = tokio::task::spawn_blocking(move || {
            Self::annotate_file(&annotator, &input_file, &output_path)
        })
        .await
        .context("Annotation task panicked")??;

        match written {
            Some(path) => info!(
                "Success: {} ({})",
                path.display(),
                Self::format_duration(start_time.elapsed())
            ),
            None => info!("No annotation was added, nothing to write"),
        }

        Ok(())
    }

    /// Run the workflow in folder mode, annotating all subtitle files in
    /// a directory. Files we produced ourselves are skipped.
    pub async fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<()> {
        let start_time = std::time::Instant::now();

        if !input_dir.exists() {
            return Err(anyhow::anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let subtitle_files: Vec<PathBuf> = FileManager::find_files(&input_dir, "srt")?
            .into_iter()
            .filter(|path| !Self::is_own_output(path))
            .collect();

        if subtitle_files.is_empty() {
            return Err(anyhow::anyhow!(
                "No subtitle files found in directory: {:?}",
                input_dir
            ));
        }

        // Stop between files on Ctrl-C, never mid-file
        let interrupted = Arc::new(AtomicBool::new(false));
        {
            let interrupted = Arc::clone(&interrupted);
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    interrupted.store(true, Ordering::SeqCst);
                }
            });
        }

        let folder_pb = ProgressBar::new(subtitle_files.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));
        folder_pb.set_message("Annotating files");

        let mut success_count = 0;
        let mut error_count = 0;
        let mut skip_count = 0;

        for subtitle_file in subtitle_files {
            if interrupted.load(Ordering::SeqCst) {
                warn!("Interrupted, stopping before the next file");
                break;
            }

            let file_name = subtitle_file
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Annotating: {}", file_name));

            let output_path =
                FileManager::generate_output_path(&subtitle_file, OUTPUT_SUFFIX, "srt");
            if output_path.exists() && !force_overwrite {
                skip_count += 1;
                folder_pb.inc(1);
                continue;
            }

            let annotator = Arc::clone(&self.annotator);
            let result = tokio::task::spawn_blocking(move || {
                Self::annotate_file(&annotator, &subtitle_file, &output_path)
            })
            .await
            .context("Annotation task panicked")?;

            match result {
                Ok(Some(_)) => success_count += 1,
                Ok(None) => skip_count += 1,
                Err(e) => {
                    error!("Error processing file {}: {}", file_name, e);
                    error_count += 1;
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder processing complete");

        info!(
            "Folder processing completed in {}: {} annotated, {} skipped, {} errors",
            Self::format_duration(start_time.elapsed()),
            success_count,
            skip_count,
            error_count
        );

        Ok(())
    }

    /// Annotate one subtitle file. Returns the output path, or None when
    /// the file ended up with nothing to annotate.
    fn annotate_file(
        annotator: &CaptionAnnotator,
        input_file: &Path,
        output_path: &Path,
    ) -> Result<Option<PathBuf>> {
        let content = FileManager::read_to_string(input_file)?;
        if SubtitleCollection::is_annotated(&content) {
            return Err(
                SubtitleError::AlreadyAnnotated(input_file.display().to_string()).into(),
            );
        }

        let entries = SubtitleCollection::parse_srt_string(&content)
            .with_context(|| format!("Failed to parse subtitle file: {:?}", input_file))?;
        let mut collection = SubtitleCollection {
            source_file: input_file.to_path_buf(),
            entries,
            source_language: language_utils::language_name(
                annotator.dictionary().language(),
            )
            .to_string(),
        };

        let annotated_count = annotator.annotate_collection(&mut collection);
        if annotated_count == 0 {
            return Ok(None);
        }

        collection.write_to_srt(output_path)?;
        info!(
            "{} captions annotated in {:?}",
            annotated_count,
            input_file.file_name().unwrap_or_default()
        );
        Ok(Some(output_path.to_path_buf()))
    }

    fn is_own_output(path: &Path) -> bool {
        path.file_name()
            .map(|f| {
                f.to_string_lossy()
                    .ends_with(&format!(".{}.srt", OUTPUT_SUFFIX))
            })
            .unwrap_or(false)
    }

    // Format duration in a human-readable format (HH:MM:SS)
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
