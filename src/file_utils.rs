use anyhow::{Result, Context};
use std::fs;
use std::path::{Path, PathBuf};

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
        }
        Ok(())
    }

    // @generates: Output path next to the input
    // @params: input_file, language suffix (optional), extension
    pub fn generate_output_path<P: AsRef<Path>>(
        input_file: P,
        language: Option<&str>,
        extension: &str,
    ) -> PathBuf {
        let input_file = input_file.as_ref();
        let stem = input_file.file_stem().unwrap_or_default().to_string_lossy();

        let mut output_filename = stem.to_string();
        if let Some(language) = language.filter(|l| !l.is_empty()) {
            output_filename.push('.');
            output_filename.push_str(language);
        }
        output_filename.push('.');
        output_filename.push_str(extension);

        input_file
            .parent()
            .map(|dir| dir.join(&output_filename))
            .unwrap_or_else(|| PathBuf::from(&output_filename))
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Read a file to bytes
    pub fn read_bytes<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
        fs::read(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Classify an input by name. Remote `gs://` objects are never touched
    /// locally.
    pub fn detect_input_kind(input: &str) -> InputKind {
        if input.starts_with("gs://") {
            return InputKind::CloudStorage;
        }

        let is_json = Path::new(input)
            .extension()
            .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("json"));

        if is_json {
            InputKind::AnnotationJson
        } else {
            InputKind::Video
        }
    }
}

/// Where detections for a run come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Local video file, uploaded inline to the OCR service
    Video,
    /// Video already in Google Cloud Storage
    CloudStorage,
    /// Previously saved annotation response
    AnnotationJson,
}
