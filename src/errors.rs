/*!
 * Error types for the cinefluent engine.
 *
 * Parse errors are fatal to a single subtitle file. Validation problems are
 * never errors: they are reported through `CueReport`/`AlignmentReport`.
 */

use thiserror::Error;

/// Errors that can occur while decoding a subtitle file into cues
#[derive(Error, Debug)]
pub enum ParseError {
    /// The bytes are not valid under the declared text encoding
    #[error("Failed to decode subtitle content as {encoding}: {message}")]
    Decode {
        /// Encoding the caller declared
        encoding: String,
        /// Decoder diagnostic
        message: String,
    },

    /// The caller asked for an encoding the engine does not know
    #[error("Unsupported text encoding: {0}")]
    UnsupportedEncoding(String),

    /// The file extension does not map to a known subtitle format
    #[error("Unsupported subtitle format: {0}")]
    UnsupportedFormat(String),

    /// An SRT block does not start with a numeric index
    #[error("Expected a numeric cue index at line {line}, found '{found}'")]
    MissingIndex {
        line: usize,
        found: String,
    },

    /// A cue block has no `start --> end` timing line
    #[error("Missing '-->' timing line for cue at line {line}")]
    MissingTiming {
        line: usize,
    },

    /// A timestamp could not be read
    #[error("Invalid timestamp '{value}' at line {line}")]
    InvalidTimestamp {
        line: usize,
        value: String,
    },

    /// A WebVTT file without its `WEBVTT` signature
    #[error("Missing WEBVTT header")]
    MissingHeader,

    /// An ASS/SSA file without an `[Events]` section or its `Format:` line
    #[error("Missing event table: {0}")]
    MissingEventTable(String),

    /// A `Dialogue:` line with fewer fields than the `Format:` line declares
    #[error("Malformed event at line {line}: {message}")]
    MalformedEvent {
        line: usize,
        message: String,
    },

    /// Reading the subtitle file failed
    #[error("Failed to read subtitle file: {0}")]
    Io(#[from] std::io::Error),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from subtitle parsing
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
