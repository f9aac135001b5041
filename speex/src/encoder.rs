//! Speex encoder.

use std::os::raw::{c_int, c_void};
use std::ptr;

use crate::bits::Bits;
use crate::error::{Result, SpeexError};
use crate::ffi;
use crate::mode::{MAX_FRAME_BYTES, Mode};

/// Speex encoder bound to one mode.
pub struct Encoder {
    mode: Mode,
    frame_size: usize,
    handle: *mut c_void,
    bits: Bits,
    input: Vec<i16>,
}

// Safety: The encoder handle is not shared across threads.
unsafe impl Send for Encoder {}

impl Drop for Encoder {
    fn drop(&mut self) {
        if !self.handle.is_null() {
            unsafe { ffi::speex_encoder_destroy(self.handle) };
            self.handle = ptr::null_mut();
        }
    }
}

impl Encoder {
    /// Creates a new encoder for `mode` and queries its frame size.
    pub fn new(mode: Mode) -> Result<Self> {
        let profile = mode.profile();
        if profile.is_null() {
            return Err(SpeexError::InitFailed("mode"));
        }

        let handle = unsafe { ffi::speex_encoder_init(profile) };
        if handle.is_null() {
            return Err(SpeexError::InitFailed("encoder"));
        }

        let mut encoder = Self {
            mode,
            frame_size: 0,
            handle,
            bits: Bits::new(),
            input: Vec::new(),
        };
        let frame_size = encoder.get_int(ffi::SPEEX_GET_FRAME_SIZE)?;
        if frame_size <= 0 {
            return Err(SpeexError::InitFailed("encoder frame size"));
        }
        encoder.frame_size = frame_size as usize;
        encoder.input = vec![0; encoder.frame_size];
        Ok(encoder)
    }

    /// Returns the mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the number of samples per frame.
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// Returns the sample rate reported by the library.
    pub fn sample_rate(&mut self) -> Result<u32> {
        self.get_int(ffi::SPEEX_GET_SAMPLING_RATE).map(|r| r as u32)
    }

    /// Returns the current bitrate in bits per second.
    pub fn bitrate(&mut self) -> Result<i32> {
        self.get_int(ffi::SPEEX_GET_BITRATE)
    }

    /// Sets the encoding quality (0-10).
    pub fn set_quality(&mut self, quality: i32) -> Result<()> {
        if !(0..=10).contains(&quality) {
            return Err(SpeexError::InvalidQuality(quality));
        }
        self.set_int(ffi::SPEEX_SET_QUALITY, quality)
    }

    /// Sets the encoder complexity (1-10).
    pub fn set_complexity(&mut self, complexity: i32) -> Result<()> {
        self.set_int(ffi::SPEEX_SET_COMPLEXITY, complexity)
    }

    /// Enables or disables variable bitrate.
    pub fn set_vbr(&mut self, enabled: bool) -> Result<()> {
        self.set_int(ffi::SPEEX_SET_VBR, enabled as i32)
    }

    /// Resets the encoder's adaptive state.
    pub fn reset(&mut self) -> Result<()> {
        self.ctl(ffi::SPEEX_RESET_STATE, ptr::null_mut())
    }

    /// Encodes exactly one frame into `out`. Returns the number of bytes written.
    ///
    /// `pcm` must hold `frame_size()` samples.
    pub fn encode_frame(&mut self, pcm: &[i16], out: &mut [u8]) -> Result<usize> {
        if pcm.len() != self.frame_size {
            return Err(SpeexError::FrameLength {
                len: pcm.len(),
                frame_size: self.frame_size,
            });
        }

        // speex_encode_int takes a mutable pointer; the caller's slice is never handed out.
        self.input.copy_from_slice(pcm);
        self.bits.reset();
        unsafe {
            ffi::speex_encode_int(self.handle, self.input.as_mut_ptr(), self.bits.as_mut_ptr())
        };

        let needed = self.bits.nbytes();
        if needed > MAX_FRAME_BYTES {
            return Err(SpeexError::FrameTooLarge { len: needed, max: MAX_FRAME_BYTES });
        }
        if needed > out.len() {
            return Err(SpeexError::BufferTooSmall { needed, available: out.len() });
        }
        Ok(self.bits.write(&mut out[..needed]))
    }

    fn ctl(&mut self, request: c_int, value: *mut c_void) -> Result<()> {
        let code = unsafe { ffi::speex_encoder_ctl(self.handle, request, value) };
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
