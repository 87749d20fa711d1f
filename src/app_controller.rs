use anyhow::{anyhow, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::xml_tools::{
    split_translation_text, EventSink, Extraction, Extractor, MalformedEntryLog, PreviewDocument,
    SanitizedDocument, Sanitizer, Substituter, ValidationReport, Validator,
};

// @module: Session controller driving the XML passes

/// Extension of the files the folder mode picks up
pub const XML_EXTENSION: &str = "xml";

/// Extension of the extracted text files
pub const TEXT_EXTENSION: &str = "txt";

/// One document worked on from loading to saving.
///
/// Every public entry point clears the state it is about to rebuild, so a
/// failed step never leaves a stale result from an earlier run behind.
pub struct Session {
    // @field: App configuration
    config: Config,
    sanitizer: Sanitizer,
    extractor: Extractor,
    substituter: Substituter,
    validator: Validator,
    input_file: Option<PathBuf>,
    document: Option<SanitizedDocument>,
    extraction: Option<Extraction>,
    preview: Option<PreviewDocument>,
    report: Option<ValidationReport>,
}

/// Outcome of extracting a whole folder
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderSummary {
    pub written: Vec<PathBuf>,
    pub skipped: usize,
    pub failed: usize,
}

impl Session {
    // @method: Create a new session with the given configuration
    pub fn new(config: Config) -> Self {
        Self {
            sanitizer: Sanitizer::new(config.clone()),
            extractor: Extractor::new(&config),
            substituter: Substituter::new(&config),
            validator: Validator::new(&config),
            config,
            input_file: None,
            document: None,
            extraction: None,
            preview: None,
            report: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn reset(&mut self) {
        self.input_file = None;
        self.document = None;
        self.extraction = None;
        self.clear_preview();
    }

    fn clear_preview(&mut self) {
        self.preview = None;
        self.report = None;
    }

    /// Sanitize `path` and extract the configured source section.
    ///
    /// Returns `false` when the file could not be sanitized; the cause has
    /// been reported to `sink`.
    pub fn load<P: AsRef<Path>>(&mut self, path: P, sink: &mut dyn EventSink) -> bool {
        self.reset();
        let path = path.as_ref();

        let Some(document) = self.sanitizer.sanitize_file(path, sink) else {
            return false;
        };
        self.input_file = Some(path.to_path_buf());
        self.install(document);
        true
    }

    /// Like [`Session::load`] for content that does not come from a file
    pub fn load_str(&mut self, content: &str, source_name: &str, sink: &mut dyn EventSink) {
        self.reset();
        let document = self.sanitizer.sanitize_str(content, source_name, sink);
        self.input_file = Some(PathBuf::from(source_name));
        self.install(document);
    }

    fn install(&mut self, document: SanitizedDocument) {
        let extraction = self.extractor.extract(&document, &self.config.extract_lang_tag);
        self.document = Some(document);
        self.extraction = Some(extraction);
    }

    pub fn input_file(&self) -> Option<&Path> {
        self.input_file.as_deref()
    }

    pub fn sanitized(&self) -> Option<&SanitizedDocument> {
        self.document.as_ref()
    }

    pub fn extraction(&self) -> Option<&Extraction> {
        self.extraction.as_ref()
    }

    /// Malformed entries found while loading the current document
    pub fn malformed_entries(&self) -> &MalformedEntryLog {
        self.sanitizer.malformed_entries()
    }

    /// The text to hand to a translator, one line per non-empty entry
    pub fn extracted_text(&self) -> Option<String> {
        self.extraction.as_ref().map(Extraction::translation_source)
    }

    /// Apply a translator's answer, one translated line per extracted line
    pub fn apply_translation(&mut self, translation: &str, sink: &mut dyn EventSink) -> Option<ValidationReport> {
        self.apply_translations(&split_translation_text(translation), sink)
    }

    /// Substitute `translations` into the configured target section and
    /// validate the result. Returns `None` when no preview was produced.
    pub fn apply_translations(&mut self, translations: &[String], sink: &mut dyn EventSink) -> Option<ValidationReport> {
        self.clear_preview();

        let (Some(document), Some(extraction)) = (&self.document, &self.extraction) else {
            warn!("No document loaded, nothing to translate");
            return None;
        };

        let preview = self.substituter.substitute(
            &self.config.write_lang_tag,
            document,
            extraction,
            translations,
            sink,
        )?;
        let report = self.validator.validate_preview(
            &preview,
            &self.config.extract_lang_tag,
            &self.config.write_lang_tag,
            sink,
        );

        self.preview = Some(preview);
        self.report = Some(report.clone());
        Some(report)
    }

    pub fn preview(&self) -> Option<&PreviewDocument> {
        self.preview.as_ref()
    }

    pub fn report(&self) -> Option<&ValidationReport> {
        self.report.as_ref()
    }

    /// Where [`Session::save_preview`] writes inside `output_dir`
    pub fn output_path<P: AsRef<Path>>(&self, output_dir: P) -> Option<PathBuf> {
        self.input_file
            .as_ref()
            .map(|input| FileManager::prefixed_output_path(input, output_dir, &self.config.output_prefix))
    }

    /// Save the preview as `<output_prefix><input file name>` inside `output_dir`
    pub fn save_preview<P: AsRef<Path>>(&self, output_dir: P) -> Result<PathBuf, AppError> {
        let preview = self
            .preview
            .as_ref()
            .filter(|preview| !preview.is_empty())
            .ok_or(AppError::EmptyPreview)?;
        let output_path = self.output_path(&output_dir).ok_or(AppError::EmptyPreview)?;

        FileManager::write_to_file(&output_path, &preview.to_xml_string())
            .map_err(|e| AppError::File(format!("{:#}", e)))?;

        info!("Success: {}", output_path.display());
        Ok(output_path)
    }

    /// Validate an existing document, typically one saved earlier
    pub fn validate_file<P: AsRef<Path>>(&mut self, path: P, sink: &mut dyn EventSink) -> Option<ValidationReport> {
        self.reset();
        let document = self.sanitizer.sanitize_file(path, sink)?;
        let report = self.validator.validate_lines(
            &document.texts(),
            &[],
            &self.config.extract_lang_tag,
            &self.config.write_lang_tag,
            sink,
        );
        self.report = Some(report.clone());
        Some(report)
    }

    /// Extract the source section of every XML file below `input_dir`.
    ///
    /// Each file produces `<stem>.<tag>.txt` next to it, or inside
    /// `output_dir` when one is given. Files whose source section holds
    /// nothing to translate are skipped.
    pub fn extract_folder(
        &mut self,
        input_dir: &Path,
        output_dir: Option<&Path>,
        sink: &mut dyn EventSink,
    ) -> Result<FolderSummary> {
        let start_time = Instant::now();

        if !FileManager::dir_exists(input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let xml_files = FileManager::find_files(input_dir, XML_EXTENSION)?;
        if xml_files.is_empty() {
            return Err(anyhow!("No XML files found in directory: {:?}", input_dir));
        }

        let folder_pb = ProgressBar::new(xml_files.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));

        let mut summary = FolderSummary::default();
        for xml_file in &xml_files {
            let file_name = xml_file
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Processing: {}", file_name));

            let target_dir = match (output_dir, xml_file.parent()) {
                (Some(dir), _) => dir.to_path_buf(),
                (None, Some(parent)) => parent.to_path_buf(),
                (None, None) => input_dir.to_path_buf(),
            };

            match self.extract_file(xml_file, &target_dir, sink) {
                Ok(Some(path)) => summary.written.push(path),
                Ok(None) => summary.skipped += 1,
                Err(e) => {
                    error!("Error processing file {}: {:#}", file_name, e);
                    summary.failed += 1;
                }
            }
            folder_pb.inc(1);
        }
        folder_pb.finish_with_message("Folder processing complete");

        info!(
            "Folder processing completed: {} written, {} skipped, {} errors - Duration: {}",
            summary.written.len(),
            summary.skipped,
            summary.failed,
            format_duration(start_time.elapsed())
        );
        Ok(summary)
    }

    /// Extract one file into `output_dir`. `Ok(None)` means there was nothing to translate.
    pub fn extract_file(&mut self, input_file: &Path, output_dir: &Path, sink: &mut dyn EventSink) -> Result<Option<PathBuf>> {
        if !self.load(input_file, sink) {
            return Err(anyhow!("Failed to sanitize {:?}", input_file));
        }

        let text = self.extracted_text().unwrap_or_default();
        if text.is_empty() {
            warn!("Nothing to extract from {:?}", input_file);
            return Ok(None);
        }

        let output_path = FileManager::generate_output_path(
            input_file,
            output_dir,
            &self.config.extract_lang_tag,
            TEXT_EXTENSION,
        );
        FileManager::write_to_file(&output_path, &text)?;
        info!("Success: {}", output_path.display());
        Ok(Some(output_path))
    }
}

// Format duration in a human-readable format
pub fn format_duration(duration: Duration) -> String {
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
