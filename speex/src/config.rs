//! Session configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpeexError};
use crate::mode::Mode;

/// Default encoder quality.
pub const DEFAULT_QUALITY: i32 = 8;

/// Options applied when a session is opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Codec profile.
    pub mode: Mode,
    /// Encoder quality (0 = lowest bitrate, 10 = best).
    pub quality: i32,
    /// Encoder complexity (1-10). Library default if unset.
    pub complexity: Option<i32>,
    /// Variable bitrate.
    pub vbr: bool,
    /// Perceptual enhancer on the decoder.
    pub enhancement: bool,
    /// Reject sample counts that are not a whole number of frames instead
    /// of dropping the remainder.
    pub strict_frames: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Narrowband,
            quality: DEFAULT_QUALITY,
            complexity: None,
            vbr: false,
            enhancement: true,
            strict_frames: false,
        }
    }
}

impl SessionConfig {
    /// Creates a config for `mode` with default options.
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Sets the encoder quality.
    pub fn with_quality(mut self, quality: i32) -> Self {
        self.quality = quality;
        self
    }

    /// Sets the encoder complexity.
    pub fn with_complexity(mut self, complexity: i32) -> Self {
        self.complexity = Some(complexity);
        self
    }

    /// Enables or disables variable bitrate.
    pub fn with_vbr(mut self, vbr: bool) -> Self {
        self.vbr = vbr;
        self
    }

    /// Enables or disables the decoder enhancer.
    pub fn with_enhancement(mut self, enhancement: bool) -> Self {
        self.enhancement = enhancement;
        self
    }

    /// Rejects partial frames instead of dropping them.
    pub fn with_strict_frames(mut self, strict: bool) -> Self {
        self.strict_frames = strict;
        self
    }

    /// Checks the ranges the library does not validate itself.
    pub fn validate(&self) -> Result<()> {
        if !(0..=10).contains(&self.quality) {
            return Err(SpeexError::InvalidQuality(self.quality));
        }
        if let Some(c) = self.complexity {
            if !(1..=10).contains(&c) {
                return Err(SpeexError::InvalidComplexity(c));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = SessionConfig::default();
        assert_eq!(cfg.mode, Mode::Narrowband);
        assert_eq!(cfg.quality, DEFAULT_QUALITY);
        assert!(cfg.enhancement);
        assert!(!cfg.strict_frames);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let cfg = SessionConfig::new(Mode::Wideband)
            .with_quality(10)
            .with_complexity(4)
            .with_vbr(true)
            .with_enhancement(false)
            .with_strict_frames(true);
        assert_eq!(cfg.mode, Mode::Wideband);
        assert_eq!(cfg.quality, 10);
        assert_eq!(cfg.complexity, Some(4));
        assert!(cfg.vbr);
        assert!(!cfg.enhancement);
        assert!(cfg.strict_frames);
    }

    #[test]
    fn test_validate() {
        assert!(matches!(
            SessionConfig::default().with_quality(11).validate(),
            Err(SpeexError::InvalidQuality(11))
        ));
        assert!(matches!(
            SessionConfig::default().with_quality(-3).validate(),
            Err(SpeexError::InvalidQuality(-3))
        ));
        assert!(matches!(
            SessionConfig::default().with_complexity(0).validate(),
            Err(SpeexError::InvalidComplexity(0))
        ));
        assert!(SessionConfig::default().with_complexity(10).validate().is_ok());
    }

    #[test]
    fn test_from_json() {
        let cfg: SessionConfig =
            serde_json::from_str(r#"{"mode": "ultra-wideband", "quality": 5}"#).unwrap();
        assert_eq!(cfg.mode, Mode::UltraWideband);
        assert_eq!(cfg.quality, 5);
        assert_eq!(cfg.complexity, None);
        assert!(cfg.enhancement);
    }

    #[test]
    fn test_from_yaml() {
        let yaml = "mode: wideband\nquality: 10\nvbr: true\nstrict_frames: true\n";
        let cfg: SessionConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.mode, Mode::Wideband);
        assert_eq!(cfg.quality, 10);
        assert!(cfg.vbr);
        assert!(cfg.strict_frames);
    }
}
