use std::path::Path;

use async_trait::async_trait;
use log::info;

use crate::detection::annotation::parse_annotation_json;
use crate::detection::{DetectionSource, RawDetection};
use crate::errors::DetectionError;
use crate::file_utils::FileManager;

/// Detection source backed by a saved annotation response (or operation)
/// JSON file
#[derive(Debug, Default, Clone)]
pub struct AnnotationFile;

impl AnnotationFile {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DetectionSource for AnnotationFile {
    async fn detect(&self, input: &Path) -> Result<Vec<RawDetection>, DetectionError> {
        let content = FileManager::read_to_string(input).map_err(|e| DetectionError::Input {
            path: input.display().to_string(),
            message: format!("{:#}", e),
        })?;

        info!("Loading saved annotations from {}", input.display());
        Ok(parse_annotation_json(&content)?.into_detections())
    }

    fn name(&self) -> &str {
        "annotation file"
    }
}
