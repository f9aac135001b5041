use thiserror::Error;

/// Why the library refused to decode a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeFailure {
    /// The bitstream carried an end-of-stream marker.
    EndOfStream,
    /// The bitstream is corrupt.
    CorruptStream,
    /// Any other non-zero return code.
    Other(i32),
}

impl DecodeFailure {
    pub(crate) fn from_code(code: i32) -> Self {
        match code {
            crate::ffi::SPEEX_DECODE_END_OF_STREAM => Self::EndOfStream,
            crate::ffi::SPEEX_DECODE_CORRUPT => Self::CorruptStream,
            other => Self::Other(other),
        }
    }
}

impl std::fmt::Display for DecodeFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EndOfStream => write!(f, "end of stream"),
            Self::CorruptStream => write!(f, "corrupt stream"),
            Self::Other(code) => write!(f, "error code {}", code),
        }
    }
}

/// Errors returned by Speex operations.
#[derive(Debug, Error)]
pub enum SpeexError {
    #[error("speex: invalid mode {0} (expected 0, 1 or 2)")]
    InvalidMode(i32),

    #[error("speex: invalid quality {0} (expected 0..=10)")]
    InvalidQuality(i32),

    #[error("speex: invalid complexity {0} (expected 1..=10)")]
    InvalidComplexity(i32),

    #[error("speex: session is not open")]
    NotOpen,

    #[error("speex: session is already open")]
    AlreadyOpen,

    #[error("speex: close called on a session that is not open")]
    NotOpenForClose,

    #[error("speex: buffer too small: need {needed}, have {available}")]
    BufferTooSmall { needed: usize, available: usize },

    #[error("speex: {samples} samples is not a multiple of frame size {frame_size}")]
    PartialFrameDropped { samples: usize, frame_size: usize },

    #[error("speex: frame of {len} samples, encoder expects {frame_size}")]
    FrameLength { len: usize, frame_size: usize },

    #[error("speex: {0} PCM bytes is not a whole number of 16-bit samples")]
    OddByteLength(usize),

    #[error("speex: range {offset}+{count} out of bounds for {len} samples")]
    InvalidRange { offset: usize, count: usize, len: usize },

    #[error("speex: frame of {len} bytes exceeds {max} bytes")]
    FrameTooLarge { len: usize, max: usize },

    #[error("speex: decode failed: {0}")]
    DecodeFailed(DecodeFailure),

    #[error("speex: {0} init failed")]
    InitFailed(&'static str),

    #[error("speex: ctl request {request} failed with code {code}")]
    CtlFailed { request: i32, code: i32 },
}

impl SpeexError {
    /// Returns the stable negative code reported across the C boundary.
    ///
    /// `-1` (null argument) and `-100` (panic) are reserved by the bridge.
    pub fn code(&self) -> i32 {
        match self {
            Self::InvalidMode(_) => -2,
            Self::InvalidQuality(_) => -3,
            Self::NotOpen => -4,
            Self::AlreadyOpen => -5,
            Self::NotOpenForClose => -6,
            Self::BufferTooSmall { .. } => -7,
            Self::PartialFrameDropped { .. } => -8,
            Self::InvalidRange { .. } => -9,
            Self::FrameTooLarge { .. } => -10,
            Self::DecodeFailed(_) => -11,
            Self::InitFailed(_) => -12,
            Self::CtlFailed { .. } => -13,
            // Codes below -13 were appended later; existing codes never move.
            Self::InvalidComplexity(_) => -14,
            Self::FrameLength { .. } => -15,
            Self::OddByteLength(_) => -16,
        }
    }
}

/// Result type for Speex operations.
pub type Result<T> = std::result::Result<T, SpeexError>;
