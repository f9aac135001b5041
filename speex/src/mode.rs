//! Speex codec profiles.

use serde::{Deserialize, Serialize};

use crate::error::SpeexError;
use crate::ffi;

/// Upper bound on the size of one compressed frame in any mode.
///
/// Decode input and the per-frame encode scratch are sized in bytes by this
/// constant, never by the sample frame size.
pub const MAX_FRAME_BYTES: usize = 256;

/// Speex codec profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// 8 kHz.
    Narrowband = 0,
    /// 16 kHz.
    Wideband = 1,
    /// 32 kHz.
    UltraWideband = 2,
}

impl Mode {
    /// All supported modes.
    pub const ALL: [Mode; 3] = [Mode::Narrowband, Mode::Wideband, Mode::UltraWideband];

    /// Returns the mode id used by `speex_lib_get_mode`.
    pub fn id(&self) -> i32 {
        *self as i32
    }

    /// Returns the sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        match self {
            Self::Narrowband => 8000,
            Self::Wideband => 16000,
            Self::UltraWideband => 32000,
        }
    }

    /// Returns the nominal samples per 20ms frame.
    ///
    /// The authoritative value is queried from the library at open time.
    pub fn frame_size(&self) -> usize {
        self.sample_rate() as usize / 50
    }

    /// Worst-case compressed bytes for one frame at quality 10.
    pub fn max_frame_bytes(&self) -> usize {
        match self {
            // 24.6 kbps
            Self::Narrowband => 62,
            // 42.2 kbps
            Self::Wideband => 106,
            // 44.0 kbps
            Self::UltraWideband => 110,
        }
    }

    /// Returns the short lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Narrowband => "narrowband",
            Self::Wideband => "wideband",
            Self::UltraWideband => "ultra-wideband",
        }
    }

    pub(crate) fn profile(&self) -> *const ffi::SpeexMode {
        let id = match self {
            Self::Narrowband => ffi::SPEEX_MODEID_NB,
            Self::Wideband => ffi::SPEEX_MODEID_WB,
            Self::UltraWideband => ffi::SPEEX_MODEID_UWB,
        };
        unsafe { ffi::speex_lib_get_mode(id) }
    }
}

impl TryFrom<i32> for Mode {
    type Error = SpeexError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Narrowband),
            1 => Ok(Self::Wideband),
            2 => Ok(Self::UltraWideband),
            other => Err(SpeexError::InvalidMode(other)),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_try_from() {
        assert_eq!(Mode::try_from(0).unwrap(), Mode::Narrowband);
        assert_eq!(Mode::try_from(1).unwrap(), Mode::Wideband);
        assert_eq!(Mode::try_from(2).unwrap(), Mode::UltraWideband);
        assert!(matches!(Mode::try_from(3), Err(SpeexError::InvalidMode(3))));
        assert!(matches!(Mode::try_from(-1), Err(SpeexError::InvalidMode(-1))));
    }

    #[test]
    fn test_mode_properties() {
        assert_eq!(Mode::Narrowband.sample_rate(), 8000);
        assert_eq!(Mode::Narrowband.frame_size(), 160);
        assert_eq!(Mode::Wideband.frame_size(), 320);
        assert_eq!(Mode::UltraWideband.frame_size(), 640);
        for mode in Mode::ALL {
            assert_eq!(Mode::try_from(mode.id()).unwrap(), mode);
            assert!(mode.max_frame_bytes() <= MAX_FRAME_BYTES);
        }
    }

    #[test]
    fn test_mode_profile_not_null() {
        for mode in Mode::ALL {
            assert!(!mode.profile().is_null());
        }
    }

    #[test]
    fn test_mode_serde() {
        let json = serde_json::to_string(&Mode::UltraWideband).unwrap();
        assert_eq!(json, "\"ultra-wideband\"");
        let mode: Mode = serde_json::from_str("\"wideband\"").unwrap();
        assert_eq!(mode, Mode::Wideband);
        assert_eq!(Mode::Narrowband.to_string(), "narrowband");
    }
}
