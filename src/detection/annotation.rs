/*!
 * JSON model of Video Intelligence text detection results.
 *
 * Only the fields needed to build detections are modelled. Proto3 JSON
 * leaves out zero values, so nearly everything defaults.
 */

use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::cues::{BoundingRegion, Vertex};
use crate::detection::RawDetection;
use crate::errors::DetectionError;

// @const: protobuf JSON duration, e.g. "12.345678s"
static DURATION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+)(?:\.(\d{1,9}))?s$").unwrap()
});

/// Long running operation returned by `videos:annotate`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Status>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<AnnotateVideoResponse>,
}

/// google.rpc.Status
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Status {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotateVideoResponse {
    #[serde(default)]
    pub annotation_results: Vec<VideoAnnotationResults>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoAnnotationResults {
    #[serde(default)]
    pub input_uri: String,
    #[serde(default)]
    pub text_annotations: Vec<TextAnnotation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Status>,
}

/// One distinct piece of recognized text, possibly seen in several segments
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TextAnnotation {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub segments: Vec<TextSegment>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TextSegment {
    #[serde(default)]
    pub segment: VideoSegment,
    #[serde(default)]
    pub confidence: f32,
    #[serde(default)]
    pub frames: Vec<TextFrame>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSegment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time_offset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time_offset: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextFrame {
    #[serde(default)]
    pub rotated_bounding_box: NormalizedBoundingPoly,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_offset: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NormalizedBoundingPoly {
    #[serde(default)]
    pub vertices: Vec<Vertex>,
}

/// Parse a protobuf JSON duration into whole milliseconds, truncating
/// anything finer
pub fn parse_duration_ms(value: &str) -> Option<u64> {
    let caps = DURATION_REGEX.captures(value.trim())?;
    let seconds: u64 = caps.get(1)?.as_str().parse().ok()?;
    let millis = match caps.get(2) {
        Some(fraction) => {
            let digits: String = fraction.as_str().chars().chain(std::iter::repeat('0')).take(3).collect();
            digits.parse::<u64>().ok()?
        }
        None => 0,
    };
    seconds.checked_mul(1000)?.checked_add(millis)
}

fn offset_ms(offset: Option<&String>) -> Option<u64> {
    match offset {
        // zero durations are omitted from proto3 JSON
        None => Some(0),
        Some(value) => parse_duration_ms(value),
    }
}

impl TextSegment {
    /// Build a detection from this segment, or `None` if it is malformed
    fn to_detection(&self, text: &str) -> Option<RawDetection> {
        let start_ms = offset_ms(self.segment.start_time_offset.as_ref())?;
        let end_ms = offset_ms(self.segment.end_time_offset.as_ref())?;
        let frame = self.frames.first()?;
        let vertices: [Vertex; 4] = frame.rotated_bounding_box.vertices.as_slice().try_into().ok()?;

        Some(RawDetection::new(
            text,
            start_ms,
            end_ms.max(start_ms),
            BoundingRegion::new(vertices),
            self.confidence,
        ))
    }
}

impl AnnotateVideoResponse {
    /// Flatten every text segment into a detection. Malformed segments are
    /// logged and skipped.
    pub fn into_detections(self) -> Vec<RawDetection> {
        let mut detections = Vec::new();
        let mut dropped = 0usize;

        for result in &self.annotation_results {
            if let Some(status) = &result.error {
                warn!("Annotation result for '{}' carries an error: {}", result.input_uri, status.message);
            }
            info!("Total lines of text found: {}", result.text_annotations.len());

            for annotation in &result.text_annotations {
                for segment in &annotation.segments {
                    match segment.to_detection(&annotation.text) {
                        Some(detection) => detections.push(detection),
                        None => {
                            dropped += 1;
                            debug!("Dropping malformed segment for text '{}'", annotation.text);
                        }
                    }
                }
            }
        }

        if dropped > 0 {
            warn!("Dropped {} malformed text segments", dropped);
        }

        detections
    }
}

/// Parse either a full operation or a bare annotate response
pub fn parse_annotation_json(content: &str) -> Result<AnnotateVideoResponse, DetectionError> {
    let value: serde_json::Value =
        serde_json::from_str(content).map_err(|e| DetectionError::ParseError(e.to_string()))?;

    if value.get("response").is_some() || value.get("done").is_some() {
        let operation: Operation =
            serde_json::from_value(value).map_err(|e| DetectionError::ParseError(e.to_string()))?;
        return operation.into_response();
    }

    serde_json::from_value(value).map_err(|e| DetectionError::ParseError(e.to_string()))
}

impl Operation {
    /// Extract the response of a finished operation
    pub fn into_response(self) -> Result<AnnotateVideoResponse, DetectionError> {
        if let Some(status) = self.error {
            return Err(DetectionError::Service(format!("{} (code {})", status.message, status.code)));
        }
        self.response
            .ok_or_else(|| DetectionError::ParseError(format!("operation '{}' has no response", self.name)))
    }
}
