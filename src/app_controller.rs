use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::cues::CueCollection;
use crate::detection::{AnnotationFile, DetectionSource, VideoIntelligenceClient};
use crate::errors::{AppError, SubtitleError};
use crate::file_utils::{FileManager, InputKind};
use crate::pipeline::{Pipeline, PipelineReport};
use crate::subtitle_writer::SubtitleWriter;

// @module: Application controller for OCR subtitle extraction

/// Runs one input through detection, consolidation and output
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Draw a progress bar while translating
    show_progress: bool,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Invalid configuration")?;
        Ok(Self {
            config,
            show_progress: true,
        })
    }

    /// Disable the terminal progress bar (tests, piped output)
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Output path for an input: the explicit one, the configured one, or a
    /// file next to the input named after it
    pub fn resolve_output_path(&self, input: &str, output: Option<&Path>) -> PathBuf {
        if let Some(output) = output {
            return output.to_path_buf();
        }
        if !self.config.output_file.is_empty() {
            return PathBuf::from(&self.config.output_file);
        }

        let language = self.config.translation.translate
            .then_some(self.config.translation.target_language.as_str());
        let extension = self.config.output_format.extension();

        match FileManager::detect_input_kind(input) {
            // gs://bucket/dir/video.mp4 -> ./video.vtt
            InputKind::CloudStorage => {
                let name = input.rsplit('/').next().unwrap_or(input);
                FileManager::generate_output_path(name, language, extension)
            }
            _ => FileManager::generate_output_path(input, language, extension),
        }
    }

    /// Run the whole workflow for one input
    pub async fn run(&self, input: &str, output: Option<PathBuf>, force_overwrite: bool) -> Result<PipelineReport> {
        let kind = FileManager::detect_input_kind(input);
        let output_path = self.resolve_output_path(input, output.as_deref());
        self.check_paths(input, kind, &output_path, force_overwrite)?;

        let source = self.detection_source(kind)?;
        self.run_with_source(source.as_ref(), input, &output_path).await
    }

    /// Run with an explicit detection source. Paths are not checked.
    pub async fn run_with_source(
        &self,
        source: &dyn DetectionSource,
        input: &str,
        output_path: &Path,
    ) -> Result<PipelineReport> {
        let start_time = Instant::now();
        info!("Processing {} with {}", input, source.name());

        let detections = source.detect(Path::new(input))
            .await
            .map_err(AppError::from)
            .with_context(|| format!("Failed to detect text in {}", input))?;
        info!("Received {} detections in {}", detections.len(), Self::format_duration(start_time.elapsed()));

        let mut pipeline = Pipeline::from_config(&self.config).map_err(AppError::from)?;
        let progress_bar = self.attach_progress(&mut pipeline);

        let (cues, report) = pipeline.run(detections).await;

        if let Some(progress_bar) = progress_bar {
            progress_bar.finish_with_message("done");
        }

        self.write_output(&cues, output_path)?;
        info!("{}", report.summary());
        info!("Finished {} in {}", input, Self::format_duration(start_time.elapsed()));

        Ok(report)
    }

    fn check_paths(&self, input: &str, kind: InputKind, output_path: &Path, force_overwrite: bool) -> Result<()> {
        if kind != InputKind::CloudStorage && !FileManager::file_exists(input) {
            return Err(AppError::File(format!("Input file does not exist: {}", input)).into());
        }

        if output_path.exists() {
            if !force_overwrite {
                return Err(SubtitleError::OutputExists(output_path.display().to_string()).into());
            }
            warn!("Overwriting existing output {}", output_path.display());
        }

        if kind != InputKind::AnnotationJson && self.config.video_intelligence.api_key.is_empty() {
            return Err(AppError::Config("video_intelligence.api_key is required to process videos".to_string()).into());
        }

        Ok(())
    }

    fn detection_source(&self, kind: InputKind) -> Result<Box<dyn DetectionSource>> {
        let source: Box<dyn DetectionSource> = match kind {
            InputKind::AnnotationJson => Box::new(AnnotationFile::new()),
            InputKind::Video | InputKind::CloudStorage => {
                let language = &self.config.detection.language;
                let hints = if language.detect_language {
                    language.language_hints.clone()
                } else {
                    Vec::new()
                };
                Box::new(VideoIntelligenceClient::new(&self.config.video_intelligence, hints))
            }
        };
        debug!("Using detection source: {}", source.name());
        Ok(source)
    }

    fn attach_progress(&self, pipeline: &mut Pipeline) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }
        let stage = pipeline.translation_mut()?;

        let progress_bar = ProgressBar::new(0);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} texts ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));
        progress_bar.set_message("translating");

        let bar = progress_bar.clone();
        stage.set_progress(Box::new(move |done, total| {
            bar.set_length(total as u64);
            bar.set_position(done as u64);
        }));

        Some(progress_bar)
    }

    fn write_output(&self, cues: &CueCollection, output_path: &Path) -> Result<()> {
        if cues.is_empty() {
            warn!("No subtitles survived consolidation, writing an empty file");
        }
        SubtitleWriter::write_to_file(cues, self.config.output_format, output_path)?;
        info!("Subtitles written to {}", output_path.display());
        Ok(())
    }

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
}

