//! C ABI for host runtimes.
//!
//! Hosts hold an opaque `*mut CodecSession` from [`speex_session_new`] and
//! release it with [`speex_session_free`]. Functions return a non-negative
//! value on success or a negative code: `-1` for a null pointer argument,
//! `-100` for a caught panic, otherwise [`SpeexError::code`].

use std::os::raw::c_char;
use std::panic::{self, AssertUnwindSafe};
use std::slice;

use crate::config::SessionConfig;
use crate::error::SpeexError;
use crate::ffi;
use crate::mode::Mode;
use crate::session::CodecSession;

/// Null pointer argument.
pub const ERR_NULL: i32 = -1;
/// A panic was caught at the boundary.
pub const ERR_PANIC: i32 = -100;

fn guard<F>(f: F) -> i32
where
    F: FnOnce() -> Result<i32, SpeexError>,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(n)) => n,
        Ok(Err(e)) => e.code(),
        Err(_) => ERR_PANIC,
    }
}

fn to_i32(n: usize) -> Result<i32, SpeexError> {
    i32::try_from(n).map_err(|_| SpeexError::BufferTooSmall {
        needed: n,
        available: i32::MAX as usize,
    })
}

fn to_usize(n: i32, len: usize) -> Result<usize, SpeexError> {
    usize::try_from(n).map_err(|_| SpeexError::InvalidRange {
        offset: 0,
        count: 0,
        len,
    })
}

/// Allocates a closed session.
#[unsafe(no_mangle)]
pub extern "C" fn speex_session_new() -> *mut CodecSession {
    Box::into_raw(Box::new(CodecSession::new()))
}

/// Releases a session, closing it first if it is still open.
///
/// # Safety
///
/// `session` must come from [`speex_session_new`] and not be used afterwards.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn speex_session_free(session: *mut CodecSession) {
    if session.is_null() {
        return;
    }
    let mut session = unsafe { Box::from_raw(session) };
    if session.is_open() {
        let _ = session.close();
    }
}

/// Opens the session. `mode` is 0 (narrowband), 1 (wideband) or 2 (ultra-wideband).
///
/// # Safety
///
/// `session` must be a live pointer from [`speex_session_new`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn speex_session_open(
    session: *mut CodecSession,
    mode: i32,
    quality: i32,
) -> i32 {
    let Some(session) = (unsafe { session.as_mut() }) else {
        return ERR_NULL;
    };
    guard(|| {
        session.open(Mode::try_from(mode)?, quality)?;
        Ok(0)
    })
}

/// Opens the session like [`speex_session_open`]. A non-zero `strict` makes
/// encode calls whose count is not a whole number of frames fail with the
/// partial-frame code instead of dropping the remainder.
///
/// # Safety
///
/// `session` must be a live pointer from [`speex_session_new`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn speex_session_open_strict(
    session: *mut CodecSession,
    mode: i32,
    quality: i32,
    strict: i32,
) -> i32 {
    let Some(session) = (unsafe { session.as_mut() }) else {
        return ERR_NULL;
    };
    guard(|| {
        let config = SessionConfig::new(Mode::try_from(mode)?)
            .with_quality(quality)
            .with_strict_frames(strict != 0);
        session.open_with(&config)?;
        Ok(0)
    })
}

/// Returns the encoder frame size in samples.
///
/// # Safety
///
/// `session` must be a live pointer from [`speex_session_new`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn speex_session_frame_size(session: *const CodecSession) -> i32 {
    let Some(session) = (unsafe { session.as_ref() }) else {
        return ERR_NULL;
    };
    guard(|| to_i32(session.frame_size()?))
}

/// Decodes one frame of `encoded_len` bytes into `out`. Returns samples written.
///
/// # Safety
///
/// `session` must be a live pointer from [`speex_session_new`]; `encoded`
/// must be valid for `encoded_len` bytes and `out` for `out_len` samples.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn speex_session_decode(
    session: *mut CodecSession,
    encoded: *const u8,
    encoded_len: i32,
    out: *mut i16,
    out_len: i32,
) -> i32 {
    let Some(session) = (unsafe { session.as_mut() }) else {
        return ERR_NULL;
    };
    if encoded.is_null() || out.is_null() {
        return ERR_NULL;
    }
    guard(|| {
        let encoded_len = to_usize(encoded_len, 0)?;
        let out_len = to_usize(out_len, 0)?;
        let frame = unsafe { slice::from_raw_parts(encoded, encoded_len) };
        let out = unsafe { slice::from_raw_parts_mut(out, out_len) };
        to_i32(session.decode(frame, out)?)
    })
}

/// Encodes `count` samples starting at `offset` into `out`. Returns bytes written.
///
/// Trailing samples that do not fill a frame are not encoded; their number is
/// stored in `dropped` when it is non-null. Sessions opened with
/// [`speex_session_open_strict`] reject such counts instead.
///
/// # Safety
///
/// `session` must be a live pointer from [`speex_session_new`]; `samples`
/// must be valid for `samples_len` samples, `out` for `out_len` bytes, and
/// `dropped` must be null or valid for one write.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn speex_session_encode(
    session: *mut CodecSession,
    samples: *const i16,
    samples_len: i32,
    offset: i32,
    count: i32,
    out: *mut u8,
    out_len: i32,
    dropped: *mut i32,
) -> i32 {
    let Some(session) = (unsafe { session.as_mut() }) else {
        return ERR_NULL;
    };
    if samples.is_null() || out.is_null() {
        return ERR_NULL;
    }
    guard(|| {
        let samples_len = to_usize(samples_len, 0)?;
        let offset = to_usize(offset, samples_len)?;
        let count = to_usize(count, samples_len)?;
        let out_len = to_usize(out_len, 0)?;
        let samples = unsafe { slice::from_raw_parts(samples, samples_len) };
        let out = unsafe { slice::from_raw_parts_mut(out, out_len) };
        let encoded = session.encode(samples, offset, count, out)?;
        let bytes = to_i32(encoded.bytes)?;
        if !dropped.is_null() {
            unsafe { *dropped = to_i32(encoded.dropped_samples)? };
        }
        Ok(bytes)
    })
}

/// Closes the session, releasing the codec state.
///
/// # Safety
///
/// `session` must be a live pointer from [`speex_session_new`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn speex_session_close(session: *mut CodecSession) -> i32 {
    let Some(session) = (unsafe { session.as_mut() }) else {
        return ERR_NULL;
    };
    guard(|| {
        session.close()?;
        Ok(0)
    })
}

/// Returns the libspeex version as a static NUL-terminated string, or null.
#[unsafe(no_mangle)]
pub extern "C" fn speex_version() -> *const c_char {
    ffi::version_ptr()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr;

    #[test]
    fn test_null_session() {
        unsafe {
            assert_eq!(speex_session_open(ptr::null_mut(), 0, 4), ERR_NULL);
            assert_eq!(speex_session_frame_size(ptr::null()), ERR_NULL);
            assert_eq!(speex_session_close(ptr::null_mut()), ERR_NULL);
            speex_session_free(ptr::null_mut());
        }
    }

    #[test]
    fn test_lifecycle() {
        let s = speex_session_new();
        unsafe {
            assert_eq!(speex_session_frame_size(s), SpeexError::NotOpen.code());
            assert_eq!(speex_session_open(s, 0, 4), 0);
            assert_eq!(speex_session_open(s, 0, 4), SpeexError::AlreadyOpen.code());
            assert_eq!(speex_session_frame_size(s), 160);
            assert_eq!(speex_session_close(s), 0);
            assert_eq!(speex_session_close(s), SpeexError::NotOpenForClose.code());
            speex_session_free(s);
        }
    }

    #[test]
    fn test_invalid_mode() {
        let s = speex_session_new();
        unsafe {
            assert_eq!(speex_session_open(s, 3, 4), SpeexError::InvalidMode(3).code());
            assert_eq!(speex_session_frame_size(s), SpeexError::NotOpen.code());
            speex_session_free(s);
        }
    }

    #[test]
    fn test_encode_decode() {
        let s = speex_session_new();
        let pcm = vec![0i16; 160 * 2 + 10];
        let mut encoded = vec![0u8; 256];
        let mut decoded = vec![0i16; 160];
        unsafe {
            assert_eq!(speex_session_open(s, 0, 4), 0);
            let n = speex_session_encode(
                s,
                pcm.as_ptr(),
                pcm.len() as i32,
                0,
                pcm.len() as i32,
                encoded.as_mut_ptr(),
                encoded.len() as i32,
                ptr::null_mut(),
            );
            assert!(n > 0 && n <= 2 * 160);

            let frame_bytes = n / 2;
            let m = speex_session_decode(
                s,
                encoded.as_ptr(),
                frame_bytes,
                decoded.as_mut_ptr(),
                decoded.len() as i32,
            );
            assert_eq!(m, 160);
            speex_session_free(s);
        }
    }

    #[test]
    fn test_encode_negative_args() {
        let s = speex_session_new();
        let pcm = vec![0i16; 160];
        let mut encoded = vec![0u8; 256];
        unsafe {
            assert_eq!(speex_session_open(s, 0, 4), 0);
            let n = speex_session_encode(
                s,
                pcm.as_ptr(),
                pcm.len() as i32,
                -1,
                160,
                encoded.as_mut_ptr(),
                encoded.len() as i32,
                ptr::null_mut(),
            );
            assert_eq!(n, SpeexError::InvalidRange { offset: 0, count: 0, len: 0 }.code());
            let n = speex_session_encode(
                s,
                ptr::null(),
                0,
                0,
                0,
                encoded.as_mut_ptr(),
                encoded.len() as i32,
                ptr::null_mut(),
            );
            assert_eq!(n, ERR_NULL);
            speex_session_free(s);
        }
    }

    #[test]
    fn test_encode_reports_dropped_samples() {
        let s = speex_session_new();
        let pcm = vec![0i16; 160 * 2 + 10];
        let mut encoded = vec![0u8; 256];
        let mut dropped = -1i32;
        unsafe {
            assert_eq!(speex_session_open(s, 0, 4), 0);
            let n = speex_session_encode(
                s,
                pcm.as_ptr(),
                pcm.len() as i32,
                0,
                pcm.len() as i32,
                encoded.as_mut_ptr(),
                encoded.len() as i32,
                &mut dropped,
            );
            assert!(n > 0);
            assert_eq!(dropped, 10);

            let n = speex_session_encode(
                s,
                pcm.as_ptr(),
                pcm.len() as i32,
                0,
                320,
                encoded.as_mut_ptr(),
                encoded.len() as i32,
                &mut dropped,
            );
            assert!(n > 0);
            assert_eq!(dropped, 0);
            speex_session_free(s);
        }
    }

    #[test]
    fn test_open_strict_rejects_partial_frames() {
        let s = speex_session_new();
        let pcm = vec![0i16; 160 * 2 + 10];
        let mut encoded = vec![0u8; 256];
        let mut dropped = -1i32;
        unsafe {
            assert_eq!(speex_session_open_strict(s, 0, 4, 1), 0);
            let n = speex_session_encode(
                s,
                pcm.as_ptr(),
                pcm.len() as i32,
                0,
                pcm.len() as i32,
                encoded.as_mut_ptr(),
                encoded.len() as i32,
                &mut dropped,
            );
            let partial = SpeexError::PartialFrameDropped { samples: 330, frame_size: 160 };
            assert_eq!(n, partial.code());
            assert_eq!(dropped, -1);
            assert_eq!(speex_session_open_strict(s, 0, 4, 1), SpeexError::AlreadyOpen.code());
            speex_session_free(s);
        }
    }

    #[test]
    fn test_open_strict_invalid_mode() {
        let s = speex_session_new();
        unsafe {
            assert_eq!(speex_session_open_strict(s, 5, 4, 1), SpeexError::InvalidMode(5).code());
            assert_eq!(speex_session_open_strict(ptr::null_mut(), 0, 4, 1), ERR_NULL);
            speex_session_free(s);
        }
    }

    #[test]
    fn test_version() {
        let v = speex_version();
        assert!(!v.is_null());
        let s = unsafe { std::ffi::CStr::from_ptr(v) };
        assert!(!s.to_bytes().is_empty());
    }
}
