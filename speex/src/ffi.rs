//! Raw FFI bindings for libspeex.
//!
//! These declarations match `speex/speex.h` and `speex/speex_bits.h`. We
//! hand-write them instead of using bindgen; only the entry points the
//! session layer forwards to are declared.

use std::os::raw::{c_char, c_int, c_void};

/// Opaque codec profile (`SpeexMode`).
pub enum SpeexMode {}

/// Bit-packing state (`SpeexBits`).
///
/// Layout must match `speex_bits.h` exactly; the library reads and writes
/// every field.
#[repr(C)]
pub struct SpeexBits {
    pub chars: *mut c_char,
    pub nb_bits: c_int,
    pub char_ptr: c_int,
    pub bit_ptr: c_int,
    pub owner: c_int,
    pub overflow: c_int,
    pub buf_size: c_int,
    pub reserved1: c_int,
    pub reserved2: *mut c_void,
}

impl SpeexBits {
    /// Returns a zeroed struct ready to be passed to `speex_bits_init`.
    pub const fn zeroed() -> Self {
        Self {
            chars: std::ptr::null_mut(),
            nb_bits: 0,
            char_ptr: 0,
            bit_ptr: 0,
            owner: 0,
            overflow: 0,
            buf_size: 0,
            reserved1: 0,
            reserved2: std::ptr::null_mut(),
        }
    }
}

// Mode ids for speex_lib_get_mode
pub const SPEEX_MODEID_NB: c_int = 0;
pub const SPEEX_MODEID_WB: c_int = 1;
pub const SPEEX_MODEID_UWB: c_int = 2;

// CTL request codes
pub const SPEEX_SET_ENH: c_int = 0;
pub const SPEEX_GET_FRAME_SIZE: c_int = 3;
pub const SPEEX_SET_QUALITY: c_int = 4;
pub const SPEEX_SET_VBR: c_int = 12;
pub const SPEEX_SET_COMPLEXITY: c_int = 16;
pub const SPEEX_GET_BITRATE: c_int = 19;
pub const SPEEX_GET_SAMPLING_RATE: c_int = 25;
pub const SPEEX_RESET_STATE: c_int = 26;

// Library CTL request codes
pub const SPEEX_LIB_GET_VERSION_STRING: c_int = 9;

// speex_decode_int return codes
pub const SPEEX_DECODE_OK: c_int = 0;
pub const SPEEX_DECODE_END_OF_STREAM: c_int = -1;
pub const SPEEX_DECODE_CORRUPT: c_int = -2;

unsafe extern "C" {
    // Library
    pub fn speex_lib_get_mode(mode: c_int) -> *const SpeexMode;
    pub fn speex_lib_ctl(request: c_int, ptr: *mut c_void) -> c_int;

    // Encoder
    pub fn speex_encoder_init(mode: *const SpeexMode) -> *mut c_void;
    pub fn speex_encoder_destroy(state: *mut c_void);
    pub fn speex_encode_int(state: *mut c_void, input: *mut i16, bits: *mut SpeexBits) -> c_int;
    pub fn speex_encoder_ctl(state: *mut c_void, request: c_int, ptr: *mut c_void) -> c_int;

    // Decoder
    pub fn speex_decoder_init(mode: *const SpeexMode) -> *mut c_void;
    pub fn speex_decoder_destroy(state: *mut c_void);
    pub fn speex_decode_int(state: *mut c_void, bits: *mut SpeexBits, out: *mut i16) -> c_int;
    pub fn speex_decoder_ctl(state: *mut c_void, request: c_int, ptr: *mut c_void) -> c_int;

    // Bits
    pub fn speex_bits_init(bits: *mut SpeexBits);
    pub fn speex_bits_destroy(bits: *mut SpeexBits);
    pub fn speex_bits_reset(bits: *mut SpeexBits);
    pub fn speex_bits_read_from(bits: *mut SpeexBits, bytes: *const c_char, len: c_int);
    pub fn speex_bits_write(bits: *mut SpeexBits, bytes: *mut c_char, max_len: c_int) -> c_int;
    pub fn speex_bits_nbytes(bits: *mut SpeexBits) -> c_int;
}

/// Returns the static, NUL-terminated libspeex version string, or null.
pub fn version_ptr() -> *const c_char {
    let mut ptr: *const c_char = std::ptr::null();
    let ret = unsafe {
        speex_lib_ctl(
            SPEEX_LIB_GET_VERSION_STRING,
            &mut ptr as *mut *const c_char as *mut c_void,
        )
    };
    if ret != 0 { std::ptr::null() } else { ptr }
}

/// Returns the libspeex version string.
pub fn version_string() -> String {
    let ptr = version_ptr();
    if ptr.is_null() {
        return String::from("unknown");
    }
    unsafe { std::ffi::CStr::from_ptr(ptr).to_string_lossy().into_owned() }
}
