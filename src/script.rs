/*!
 * Teleprompter script model.
 *
 * A script is JSON of the form
 * `{"chapters": [{"chapter": "Intro", "segments": [{"line": "..."}]}]}`.
 * Unknown fields are ignored. Segments are numbered from 1 across the whole
 * script, skipped ones included, so a segment keeps its output file name
 * whatever the provider and whatever lines are edited around it.
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::errors::ScriptError;

/// Line marking the end of the script
pub const END_MARKER: &str = "[end]";

/// A line holding only a beat
pub const LONE_BEAT: &str = "//";

/// A complete script
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Script {
    /// Chapters in reading order
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}

/// A named chapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
    /// Chapter name
    #[serde(rename = "chapter", default = "default_chapter_name")]
    pub name: String,

    /// Segments in reading order
    #[serde(default)]
    pub segments: Vec<Segment>,
}

/// One line of notation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Segment {
    /// Notation text
    #[serde(default)]
    pub line: String,
}

fn default_chapter_name() -> String {
    "unknown".to_string()
}

/// Why a segment is not sent for synthesis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Blank line
    Empty,
    /// The `[end]` sentinel
    EndMarker,
    /// A line that is only `//`
    LoneBeat,
    /// A bracketed stage direction
    StageDirection,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Empty => "empty line",
            Self::EndMarker => "end marker",
            Self::LoneBeat => "lone beat",
            Self::StageDirection => "stage direction",
        };
        write!(f, "{}", text)
    }
}

impl Segment {
    /// Create a segment from a line
    pub fn new(line: impl Into<String>) -> Self {
        Self { line: line.into() }
    }

    /// Reason this segment is skipped, or `None` if it should be spoken
    pub fn skip_reason(&self) -> Option<SkipReason> {
        let line = self.line.trim();
        if line.is_empty() {
            Some(SkipReason::Empty)
        } else if line == END_MARKER {
            Some(SkipReason::EndMarker)
        } else if line == LONE_BEAT {
            Some(SkipReason::LoneBeat)
        } else if line.starts_with('[') && line.ends_with(']') {
            Some(SkipReason::StageDirection)
        } else {
            None
        }
    }
}

/// A segment together with its position in the script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptLine<'a> {
    /// 1-based position across the whole script
    pub ordinal: usize,
    /// Name of the enclosing chapter
    pub chapter: &'a str,
    /// Notation text
    pub line: &'a str,
    /// Set when the line is not spoken
    pub skip: Option<SkipReason>,
}

impl Script {
    /// Load a script from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ScriptError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&content).map_err(|e| match e {
            ScriptError::Parse { message, .. } => ScriptError::Parse {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })
    }

    /// Parse a script from JSON text
    pub fn from_json(content: &str) -> Result<Self, ScriptError> {
        serde_json::from_str(content).map_err(|e| ScriptError::Parse {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })
    }

    /// Every segment in order, numbered across chapters
    pub fn lines(&self) -> impl Iterator<Item = ScriptLine<'_>> + '_ {
        self.chapters
            .iter()
            .flat_map(|chapter| chapter.segments.iter().map(move |segment| (chapter, segment)))
            .enumerate()
            .map(|(index, (chapter, segment))| ScriptLine {
                ordinal: index + 1,
                chapter: &chapter.name,
                line: &segment.line,
                skip: segment.skip_reason(),
            })
    }

    /// Total number of segments
    pub fn segment_count(&self) -> usize {
        self.chapters.iter().map(|c| c.segments.len()).sum()
    }
}
