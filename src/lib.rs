/*!
 * # OCRSub - hardcoded subtitle extraction through OCR
 *
 * A Rust library that turns on-screen text detected in a video into a clean
 * subtitle file.
 *
 * ## Features
 *
 * - Text detection with Google Video Intelligence, or offline from a saved
 *   annotation response
 * - Filtering by confidence, script, language and screen area
 * - Merging of repeated lines, including near-duplicates
 * - Stacking of simultaneous lines into two-line cues
 * - Minimum on-screen duration
 * - Optional translation through Naver Papago or Google Cloud Translation
 * - WebVTT and SubRip output
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `timecode`: Millisecond timecodes and their display format
 * - `cues`: Cues, bounding regions and the ordered cue collection
 * - `detection`: Raw OCR detections and the sources producing them
 * - `pipeline`: Filter, merge, translate, stack and duration stages
 * - `translation`: Translation cache shared by the translate stage
 * - `providers`: Translation engine clients:
 *   - `providers::naver`: Naver Papago client
 *   - `providers::google`: Google Cloud Translation client
 *   - `providers::mock`: Scripted translator for tests
 * - `subtitle_writer`: WebVTT / SRT rendering
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod cues;
pub mod detection;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod pipeline;
pub mod providers;
pub mod subtitle_writer;
pub mod timecode;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use cues::{BoundingRegion, Cue, CueCollection, CueKey, Vertex};
pub use detection::{DetectionSource, RawDetection};
pub use pipeline::{Pipeline, PipelineReport};
pub use providers::Translator;
pub use subtitle_writer::{SubtitleFormat, SubtitleWriter};
pub use timecode::Timecode;
pub use language_utils::{language_codes_match, normalize_to_part2t, get_language_name};
pub use errors::{AppError, DetectionError, ProviderError, SubtitleError, TranslationError};
