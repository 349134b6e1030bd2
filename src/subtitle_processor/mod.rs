/*!
 * Subtitle decoding: raw file bytes to an ordered list of timed cues.
 *
 * - `srt`: dedicated grammar for numbered SubRip blocks
 * - `events`: shared decoder for event-based formats (WebVTT, ASS, SSA)
 * - `encoding`: text decoding of the raw bytes
 *
 * Parsing is pure: no logging, no global state. File reading happens in
 * `parse_file` before the grammar runs and the buffer is dropped on return.
 */

use std::fmt;
use std::path::Path;

use serde::{Serialize, Serializer};

use crate::errors::ParseError;
use crate::language_utils;
use crate::normalizer;

pub mod encoding;
mod events;
mod srt;

pub use encoding::TextEncoding;

// @struct: Fixed-point timestamp, exact milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timecode(u64);

impl Timecode {
    pub fn from_millis(ms: u64) -> Self {
        Timecode(ms)
    }

    /// Build a timecode from clock components, `None` when the total does
    /// not fit in milliseconds
    pub fn from_hms_millis(hours: u64, minutes: u64, seconds: u64, millis: u64) -> Option<Self> {
        hours
            .checked_mul(3_600_000)?
            .checked_add(minutes.checked_mul(60_000)?)?
            .checked_add(seconds.checked_mul(1_000)?)?
            .checked_add(millis)
            .map(Timecode)
    }

    pub fn as_millis(self) -> u64 {
        self.0
    }

    /// Seconds as a float, for reporting only. Comparisons stay on millis.
    pub fn as_seconds_f64(self) -> f64 {
        self.0 as f64 / 1000.0
    }

    /// Absolute distance to another timecode in milliseconds
    pub fn abs_diff(self, other: Timecode) -> u64 {
        self.0.abs_diff(other.0)
    }

    /// Signed span `other - self` in milliseconds, saturating at the i64 bounds
    pub fn span_to(self, other: Timecode) -> i64 {
        let span = i128::from(other.0) - i128::from(self.0);
        i64::try_from(span).unwrap_or(if span > 0 { i64::MAX } else { i64::MIN })
    }

    /// Format as an SRT clock (HH:MM:SS,mmm)
    pub fn to_srt_clock(self) -> String {
        let ms = self.0;
        format!(
            "{:02}:{:02}:{:02},{:03}",
            ms / 3_600_000,
            (ms % 3_600_000) / 60_000,
            (ms % 60_000) / 1_000,
            ms % 1_000
        )
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:03}", self.0 / 1000, self.0 % 1000)
    }
}

impl Serialize for Timecode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_seconds_f64())
    }
}

/// Parse a clock value of the form `[h:]mm:ss[.,]f` with one to three
/// fractional digits read as a fraction of a second.
pub(crate) fn parse_clock(value: &str, line: usize) -> Result<Timecode, ParseError> {
    let invalid = || ParseError::InvalidTimestamp {
        line,
        value: value.to_string(),
    };

    let (clock, fraction) = match value.find([',', '.']) {
        Some(pos) => (&value[..pos], &value[pos + 1..]),
        None => (value, ""),
    };

    if fraction.len() > 3 || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let millis = if fraction.is_empty() {
        0
    } else {
        format!("{:0<3}", fraction).parse::<u64>().map_err(|_| invalid())?
    };

    let parts: Vec<&str> = clock.split(':').collect();
    let numbers: Vec<u64> = parts
        .iter()
        .map(|p| {
            if p.is_empty() || !p.chars().all(|c| c.is_ascii_digit()) {
                Err(invalid())
            } else {
                p.parse::<u64>().map_err(|_| invalid())
            }
        })
        .collect::<Result<_, _>>()?;

    let (hours, minutes, seconds) = match numbers.as_slice() {
        [h, m, s] => (*h, *m, *s),
        [m, s] => (0, *m, *s),
        _ => return Err(invalid()),
    };

    if minutes >= 60 || seconds >= 60 {
        return Err(invalid());
    }

    Timecode::from_hms_millis(hours, minutes, seconds, millis).ok_or_else(invalid)
}

// @struct: Single timed cue of one language track
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cue {
    start_time: Timecode,
    end_time: Timecode,
    raw_text: String,
    normalized_text: String,
    sequence_index: usize,
}

impl Cue {
    /// Create a cue; the text is trimmed and normalized immediately.
    pub fn new(sequence_index: usize, start_time: Timecode, end_time: Timecode, text: &str) -> Self {
        let raw_text = text.trim().to_string();
        let normalized_text = normalizer::clean_text(&raw_text);
        Cue {
            start_time,
            end_time,
            raw_text,
            normalized_text,
            sequence_index,
        }
    }

    /// Convenience constructor from millisecond offsets
    pub fn from_millis(sequence_index: usize, start_ms: u64, end_ms: u64, text: &str) -> Self {
        Self::new(
            sequence_index,
            Timecode::from_millis(start_ms),
            Timecode::from_millis(end_ms),
            text,
        )
    }

    pub fn start_time(&self) -> Timecode {
        self.start_time
    }

    pub fn end_time(&self) -> Timecode {
        self.end_time
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn normalized_text(&self) -> &str {
        &self.normalized_text
    }

    pub fn sequence_index(&self) -> usize {
        self.sequence_index
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.sequence_index)?;
        writeln!(f, "{} --> {}", self.start_time.to_srt_clock(), self.end_time.to_srt_clock())?;
        writeln!(f, "{}", self.raw_text)?;
        writeln!(f)
    }
}

/// Supported subtitle container formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleFormat {
    /// SubRip numbered blocks, parsed by a dedicated grammar
    Srt,
    /// WebVTT
    WebVtt,
    /// Advanced SubStation Alpha
    Ass,
    /// SubStation Alpha
    Ssa,
}

impl SubtitleFormat {
    /// Every format the engine understands
    pub const ALL: [SubtitleFormat; 4] = [
        SubtitleFormat::Srt,
        SubtitleFormat::WebVtt,
        SubtitleFormat::Ass,
        SubtitleFormat::Ssa,
    ];

    /// Select a format from a file extension (with or without the dot)
    pub fn from_extension(extension: &str) -> Result<Self, ParseError> {
        match extension.trim_start_matches('.').to_lowercase().as_str() {
            "srt" => Ok(Self::Srt),
            "vtt" => Ok(Self::WebVtt),
            "ass" => Ok(Self::Ass),
            "ssa" => Ok(Self::Ssa),
            other => Err(ParseError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Select a format from a path's extension
    pub fn from_path(path: &Path) -> Result<Self, ParseError> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .ok_or_else(|| ParseError::UnsupportedFormat(path.display().to_string()))?;
        Self::from_extension(&extension)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Srt => "srt",
            Self::WebVtt => "vtt",
            Self::Ass => "ass",
            Self::Ssa => "ssa",
        }
    }
}

impl fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Decode raw subtitle bytes into cues in file order.
///
/// Empty or whitespace-only input yields an empty list; deciding whether that
/// is acceptable belongs to cue validation.
pub fn parse(bytes: &[u8], format: SubtitleFormat, encoding: TextEncoding) -> Result<Vec<Cue>, ParseError> {
    let content = encoding.decode(bytes)?;
    parse_str(&content, format)
}

/// Parse already-decoded subtitle text
pub fn parse_str(content: &str, format: SubtitleFormat) -> Result<Vec<Cue>, ParseError> {
    let content = content.trim_start_matches('\u{feff}');
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    match format {
        SubtitleFormat::Srt => srt::parse_srt(content),
        _ => {
            let events = events::decode_events(content, format)?;
            Ok(events
                .into_iter()
                .enumerate()
                .map(|(i, event)| Cue::new(i + 1, event.start, event.end, &event.text))
                .collect())
        }
    }
}

/// Read and parse a subtitle file, picking the format from its extension
pub fn parse_file<P: AsRef<Path>>(path: P, encoding: TextEncoding) -> Result<Vec<Cue>, ParseError> {
    let path = path.as_ref();
    let format = SubtitleFormat::from_path(path)?;
    let bytes = std::fs::read(path)?;
    parse(&bytes, format, encoding)
}

/// A parsed language track
#[derive(Debug, Clone, Serialize)]
pub struct SubtitleTrack {
    /// Language tag, ISO 639-1 when one exists
    pub language: String,
    /// Container format the cues came from
    pub format: SubtitleFormat,
    /// Cues in file order
    pub cues: Vec<Cue>,
}

impl SubtitleTrack {
    /// Parse raw bytes into a track tagged with a language.
    ///
    /// Unknown language tags are kept lowercased rather than rejected.
    pub fn parse(
        bytes: &[u8],
        format: SubtitleFormat,
        encoding: TextEncoding,
        language: &str,
    ) -> Result<Self, ParseError> {
        let cues = parse(bytes, format, encoding)?;
        Ok(Self::from_cues(language, format, cues))
    }

    pub fn from_cues(language: &str, format: SubtitleFormat, cues: Vec<Cue>) -> Self {
        let language = language_utils::normalize_to_part1_or_part2t(language)
            .unwrap_or_else(|_| language.trim().to_lowercase());
        SubtitleTrack {
            language,
            format,
            cues,
        }
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }
}

impl fmt::Display for SubtitleTrack {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Track")?;
        writeln!(f, "Language: {}", self.language)?;
        writeln!(f, "Format: {}", self.format)?;
        writeln!(f, "Cues: {}", self.cues.len())?;
        Ok(())
    }
}
