//! Speex bit-packing buffer.

use std::os::raw::{c_char, c_int};

use crate::error::{Result, SpeexError};
use crate::ffi::{self, SpeexBits};

/// Owned `SpeexBits` scratch buffer.
///
/// The struct is boxed so its address stays fixed while the library holds
/// pointers into it.
pub struct Bits {
    inner: Box<SpeexBits>,
}

// Safety: The bits buffer is owned exclusively and never shared.
unsafe impl Send for Bits {}

impl Bits {
    /// Allocates and initializes a bit buffer.
    pub fn new() -> Self {
        let mut inner = Box::new(SpeexBits::zeroed());
        unsafe { ffi::speex_bits_init(inner.as_mut()) };
        Self { inner }
    }

    pub(crate) fn as_mut_ptr(&mut self) -> *mut SpeexBits {
        self.inner.as_mut()
    }

    /// Clears the buffer before packing a new frame.
    pub fn reset(&mut self) {
        unsafe { ffi::speex_bits_reset(self.as_mut_ptr()) };
    }

    /// Loads compressed bytes for decoding, replacing the previous contents.
    pub fn read_from(&mut self, data: &[u8]) -> Result<()> {
        let len = c_int::try_from(data.len()).map_err(|_| SpeexError::FrameTooLarge {
            len: data.len(),
            max: c_int::MAX as usize,
        })?;
        unsafe {
            ffi::speex_bits_read_from(self.as_mut_ptr(), data.as_ptr() as *const c_char, len)
        };
        Ok(())
    }

    /// Returns the number of bytes needed to hold the packed bits.
    pub fn nbytes(&mut self) -> usize {
        let n = unsafe { ffi::speex_bits_nbytes(self.as_mut_ptr()) };
        n.max(0) as usize
    }

    /// Writes the packed bits into `buf`. Returns the number of bytes written.
    pub fn write(&mut self, buf: &mut [u8]) -> usize {
        let max_len = c_int::try_from(buf.len()).unwrap_or(c_int::MAX);
        let n = unsafe {
            ffi::speex_bits_write(self.as_mut_ptr(), buf.as_mut_ptr() as *mut c_char, max_len)
        };
        n.max(0) as usize
    }
}

impl Default for Bits {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Bits {
    fn drop(&mut self) {
        unsafe { ffi::speex_bits_destroy(self.inner.as_mut()) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_empty() {
        let mut bits = Bits::new();
        assert_eq!(bits.nbytes(), 0);
        let mut buf = [0u8; 16];
        assert_eq!(bits.write(&mut buf), 0);
    }

    #[test]
    fn test_bits_read_then_write() {
        let mut bits = Bits::new();
        let data = [0xA5u8, 0x5A, 0xFF, 0x01];
        bits.read_from(&data).unwrap();
        assert_eq!(bits.nbytes(), data.len());

        let mut buf = [0u8; 16];
        let n = bits.write(&mut buf);
        assert_eq!(&buf[..n], &data);
    }

    #[test]
    fn test_bits_write_bounded_by_buffer() {
        let mut bits = Bits::new();
        bits.read_from(&[0xA5u8, 0x5A, 0xFF, 0x01]).unwrap();
        let mut buf = [0u8; 2];
        assert_eq!(bits.write(&mut buf), 2);
        assert_eq!(buf, [0xA5, 0x5A]);
        assert!(bits.read_from(&[]).is_ok());
        assert_eq!(bits.nbytes(), 0);
    }

    #[test]
    fn test_bits_reset() {
        let mut bits = Bits::new();
        bits.read_from(&[1, 2, 3]).unwrap();
        bits.reset();
        assert_eq!(bits.nbytes(), 0);
    }
}
