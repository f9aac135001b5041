//! Speex decoder.

use std::os::raw::{c_int, c_void};
use std::ptr;

use crate::bits::Bits;
use crate::error::{DecodeFailure, Result, SpeexError};
use crate::ffi;
use crate::mode::{MAX_FRAME_BYTES, Mode};

/// Speex decoder bound to one mode.
pub struct Decoder {
    mode: Mode,
    frame_size: usize,
    handle: *mut c_void,
    bits: Bits,
}

// Safety: The decoder handle is not shared across threads.
unsafe impl Send for Decoder {}

impl Drop for Decoder {
    fn drop(&mut self) {
        if !self.handle.is_null() {
            unsafe { ffi::speex_decoder_destroy(self.handle) };
            self.handle = ptr::null_mut();
        }
    }
}

impl Decoder {
    /// Creates a new decoder for `mode` and queries its frame size.
    pub fn new(mode: Mode) -> Result<Self> {
        let profile = mode.profile();
        if profile.is_null() {
            return Err(SpeexError::InitFailed("mode"));
        }

        let handle = unsafe { ffi::speex_decoder_init(profile) };
        if handle.is_null() {
            return Err(SpeexError::InitFailed("decoder"));
        }

        let mut decoder = Self {
            mode,
            frame_size: 0,
            handle,
            bits: Bits::new(),
        };
        let frame_size = decoder.get_int(ffi::SPEEX_GET_FRAME_SIZE)?;
        if frame_size <= 0 {
            return Err(SpeexError::InitFailed("decoder frame size"));
        }
        decoder.frame_size = frame_size as usize;
        Ok(decoder)
    }

    /// Returns the mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the number of samples produced per frame.
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// Enables or disables the perceptual enhancer.
    pub fn set_enhancement(&mut self, enabled: bool) -> Result<()> {
        self.set_int(ffi::SPEEX_SET_ENH, enabled as i32)
    }

    /// Resets the decoder's adaptive state.
    pub fn reset(&mut self) -> Result<()> {
        self.ctl(ffi::SPEEX_RESET_STATE, ptr::null_mut())
    }

    /// Decodes one compressed frame into `out`. Returns the number of samples written.
    pub fn decode_frame(&mut self, frame: &[u8], out: &mut [i16]) -> Result<usize> {
        if frame.len() > MAX_FRAME_BYTES {
            return Err(SpeexError::FrameTooLarge { len: frame.len(), max: MAX_FRAME_BYTES });
        }
        self.check_output(out)?;

        self.bits.read_from(frame)?;
        let ret = unsafe {
            ffi::speex_decode_int(self.handle, self.bits.as_mut_ptr(), out.as_mut_ptr())
        };
        if ret != ffi::SPEEX_DECODE_OK {
            return Err(SpeexError::DecodeFailed(DecodeFailure::from_code(ret)));
        }
        Ok(self.frame_size)
    }

    /// Synthesizes one frame for a lost packet (packet loss concealment).
    pub fn decode_lost(&mut self, out: &mut [i16]) -> Result<usize> {
        self.check_output(out)?;

        let ret = unsafe { ffi::speex_decode_int(self.handle, ptr::null_mut(), out.as_mut_ptr()) };
        if ret != ffi::SPEEX_DECODE_OK {
            return Err(SpeexError::DecodeFailed(DecodeFailure::from_code(ret)));
        }
        Ok(self.frame_size)
    }

    fn check_output(&self, out: &[i16]) -> Result<()> {
        if out.len() < self.frame_size {
            return Err(SpeexError::BufferTooSmall {
                needed: self.frame_size,
                available: out.len(),
            });
        }
        Ok(())
    }

    fn ctl(&mut self, request: c_int, value: *mut c_void) -> Result<()> {
        let code = unsafe { ffi::speex_decoder_ctl(self.handle, request, value) };
        if code != 0 {
            return Err(SpeexError::CtlFailed { request, code });
        }
        Ok(())
    }

    fn set_int(&mut self, request: c_int, value: i32) -> Result<()> {
        let mut v: c_int = value;
        self.ctl(request, &mut v as *mut c_int as *mut c_void)
    }

    fn get_int(&mut self, request: c_int) -> Result<i32> {
        let mut v: c_int = 0;
        self.ctl(request, &mut v as *mut c_int as *mut c_void)?;
        Ok(v)
    }
}
