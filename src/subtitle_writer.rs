use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::cues::CueCollection;
use crate::errors::SubtitleError;
use crate::file_utils::FileManager;

// @module: Subtitle file rendering

/// Output subtitle format
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleFormat {
    // @format: WebVTT
    #[default]
    Vtt,
    // @format: SubRip
    Srt,
}

impl SubtitleFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Vtt => "vtt",
            Self::Srt => "srt",
        }
    }
}

impl std::fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl std::str::FromStr for SubtitleFormat {
    type Err = SubtitleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('.').to_lowercase().as_str() {
            "vtt" | "webvtt" => Ok(Self::Vtt),
            "srt" => Ok(Self::Srt),
            other => Err(SubtitleError::UnknownFormat(other.to_string())),
        }
    }
}

/// Renders a finished cue collection
pub struct SubtitleWriter;

impl SubtitleWriter {
    /// Render the collection in the requested format, cues in key order
    pub fn render(cues: &CueCollection, format: SubtitleFormat) -> String {
        match format {
            SubtitleFormat::Vtt => Self::render_webvtt(cues),
            SubtitleFormat::Srt => Self::render_srt(cues),
        }
    }

    /// `WEBVTT` header, then a blank line, the timing line and the text per cue
    pub fn render_webvtt(cues: &CueCollection) -> String {
        let mut out = String::from("WEBVTT");
        for cue in cues.cues() {
            let _ = write!(
                out,
                "\n\n{} --> {}\n{}",
                cue.start.to_display_string(),
                cue.end.to_display_string(),
                cue.text
            );
        }
        out.push('\n');
        out
    }

    pub fn render_srt(cues: &CueCollection) -> String {
        let mut out = String::new();
        for (index, cue) in cues.cues().enumerate() {
            let _ = write!(
                out,
                "{}\n{} --> {}\n{}\n\n",
                index + 1,
                cue.start.format_with_separator(','),
                cue.end.format_with_separator(','),
                cue.text
            );
        }
        out
    }

    /// Write subtitles to a file, creating parent directories as needed
    pub fn write_to_file<P: AsRef<Path>>(cues: &CueCollection, format: SubtitleFormat, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = Self::render(cues, format);
        FileManager::write_to_file(path, &content)
            .map_err(|e| SubtitleError::Write(format!("{}: {:#}", path.display(), e)))
            .with_context(|| format!("Failed to write {} subtitles", format))?;
        debug!("Wrote {} cues ({} bytes) to {}", cues.len(), content.len(), path.display());
        Ok(())
    }
}
