//! Error enum
use std::fmt;
use std::path::PathBuf;

/// Why a frame could not be turned back into a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Corruption {
    /// the source ended inside the 4-byte length header.
    ShortHeader { got: usize },
    /// the source ended inside the payload.
    ShortPayload { expected: usize, got: usize },
    /// the length header announces more than [crate::io::codec::MAX_FRAME_BYTES].
    Oversized(u64),
    /// the payload could not be deserialized.
    Payload(String),
    /// the payload decoded but did not use all of its bytes.
    TrailingBytes(usize),
    /// a single-record buffer held more (or less) than one frame.
    FrameCount(usize),
}

/// Inconsistent input given to [crate::annotate::AnnotationMerge].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeViolation {
    EmptyTaggerName,
    /// token indices must be unique and increasing within a sentence.
    NonIncreasingIndex {
        sentence: usize,
        previous: i32,
        index: i32,
    },
    /// the tagger already has a layer and the merge policy forbids overwriting it.
    TaggerCollision(String),
}

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    /// malformed frame, fatal for the stream it was read from.
    Corruption {
        record_index: u64,
        byte_offset: u64,
        kind: Corruption,
    },
    ShapeViolation(ShapeViolation),
    Encode(bincode::error::EncodeError),
    Serde(serde_json::Error),
    Glob(glob::GlobError),
    GlobPattern(glob::PatternError),
    /// the writer already failed once, the logical length of its sink is unknown.
    Poisoned(Option<PathBuf>),
    Custom(String),
}

impl Error {
    /// Builds a corruption error for a frame starting at `byte_offset`.
    pub fn corruption(record_index: u64, byte_offset: u64, kind: Corruption) -> Self {
        Error::Corruption {
            record_index,
            byte_offset,
            kind,
        }
    }

    pub fn is_corruption(&self) -> bool {
        matches!(self, Error::Corruption { .. })
    }
}

impl fmt::Display for Corruption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Corruption::ShortHeader { got } => {
                write!(f, "truncated frame header ({got} of 4 bytes)")
            }
            Corruption::ShortPayload { expected, got } => {
                write!(f, "truncated payload ({got} of {expected} bytes)")
            }
            Corruption::Oversized(len) => write!(f, "frame length {len} is too large"),
            Corruption::Payload(e) => write!(f, "invalid payload: {e}"),
            Corruption::TrailingBytes(n) => write!(f, "{n} unused bytes in payload"),
            Corruption::FrameCount(n) => write!(f, "expected exactly one frame, got {n}"),
        }
    }
}

impl fmt::Display for ShapeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeViolation::EmptyTaggerName => write!(f, "tagger name is empty"),
            ShapeViolation::NonIncreasingIndex {
                sentence,
                previous,
                index,
            } => write!(
                f,
                "sentence {sentence}: token index {index} follows {previous}"
            ),
            ShapeViolation::TaggerCollision(name) => {
                write!(f, "tagger {name:?} already has a layer")
            }
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "io error: {e}"),
            Error::Corruption {
                record_index,
                byte_offset,
                kind,
            } => write!(
                f,
                "corrupt record #{record_index} at byte {byte_offset}: {kind}"
            ),
            Error::ShapeViolation(v) => write!(f, "shape violation: {v}"),
            Error::Encode(e) => write!(f, "encode error: {e}"),
            Error::Serde(e) => write!(f, "serde error: {e}"),
            Error::Glob(e) => write!(f, "glob error: {e}"),
            Error::GlobPattern(e) => write!(f, "glob pattern error: {e}"),
            Error::Poisoned(Some(p)) => write!(f, "writer for {p:?} failed earlier"),
            Error::Poisoned(None) => write!(f, "writer failed earlier"),
            Error::Custom(s) => write!(f, "{s}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::Io(e)
    }
}

impl From<bincode::error::EncodeError> for Error {
    fn from(e: bincode::error::EncodeError) -> Error {
        Error::Encode(e)
    }
}

impl From<ShapeViolation> for Error {
    fn from(v: ShapeViolation) -> Error {
        Error::ShapeViolation(v)
    }
}

impl From<glob::GlobError> for Error {
    fn from(e: glob::GlobError) -> Error {
        Error::Glob(e)
    }
}

impl From<glob::PatternError> for Error {
    fn from(e: glob::PatternError) -> Error {
        Error::GlobPattern(e)
    }
}

impl From<String> for Error {
    fn from(s: String) -> Error {
        Error::Custom(s)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Error {
        Error::Serde(e)
    }
}
