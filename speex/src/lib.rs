//! Speex speech codec bindings.
//!
//! This crate wraps libspeex through hand-written FFI and exposes:
//!
//! - `CodecSession`: one encoder and one decoder for a mode, with an
//!   explicit open/closed lifecycle and typed errors
//! - `Encoder` / `Decoder`: the single-direction codec handles
//! - `bridge`: a C ABI over boxed sessions for host runtimes
//!
//! # Example
//!
//! ```no_run
//! use giztoy_speex::{CodecSession, Mode};
//!
//! let mut session = CodecSession::new();
//! session.open(Mode::Wideband, 8)?;
//!
//! let frame_size = session.frame_size()?;
//! let pcm = vec![0i16; frame_size * 3];
//! let mut encoded = vec![0u8; 3 * Mode::Wideband.max_frame_bytes()];
//! let result = session.encode(&pcm, 0, pcm.len(), &mut encoded)?;
//!
//! let mut decoded = vec![0i16; session.decode_frame_size()?];
//! let per_frame = result.bytes / result.frames;
//! session.decode(&encoded[..per_frame], &mut decoded)?;
//!
//! session.close()?;
//! # Ok::<(), giztoy_speex::SpeexError>(())
//! ```
//!
//! # Linking
//!
//! libspeex is linked dynamically. Set `SPEEX_LIB_DIR` at build time when
//! the library is not in the default search path.
//!
//! # Thread Safety
//!
//! Sessions are `Send` but not `Sync`. Independent sessions may be used from
//! different threads at the same time.

pub mod bridge;
mod bits;
mod config;
mod decoder;
mod encoder;
mod error;
mod ffi;
mod mode;
mod session;

pub use bits::Bits;
pub use config::{DEFAULT_QUALITY, SessionConfig};
pub use decoder::Decoder;
pub use encoder::Encoder;
pub use error::{DecodeFailure, Result, SpeexError};
pub use mode::{MAX_FRAME_BYTES, Mode};
pub use session::{CodecSession, Encoded};

/// Returns the libspeex version string.
pub fn version() -> String {
    ffi::version_string()
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_version() {
        let v = super::version();
        assert!(!v.is_empty());
        assert_ne!(v, "unknown");
    }
}
