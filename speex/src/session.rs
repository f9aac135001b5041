//! Owned codec session.
//!
//! A [`CodecSession`] pairs one encoder with one decoder for the same mode
//! and tracks whether it is open. Every operation on a closed session fails
//! with a typed error instead of touching freed library state.

use tracing::{debug, warn};

use crate::config::SessionConfig;
use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::{Result, SpeexError};
use crate::mode::{MAX_FRAME_BYTES, Mode};

/// Outcome of [`CodecSession::encode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Encoded {
    /// Total compressed bytes written to the output.
    pub bytes: usize,
    /// Number of whole frames encoded.
    pub frames: usize,
    /// Trailing samples that did not fill a frame and were not encoded.
    pub dropped_samples: usize,
}

struct Codec {
    config: SessionConfig,
    encoder: Encoder,
    decoder: Decoder,
    frame: [u8; MAX_FRAME_BYTES],
}

enum State {
    Closed,
    Open(Box<Codec>),
}

/// Speex encoder/decoder pair with an explicit open/closed lifecycle.
pub struct CodecSession {
    state: State,
}

impl Default for CodecSession {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CodecSession {
    fn drop(&mut self) {
        if let State::Open(codec) = &self.state {
            warn!(mode = %codec.config.mode, "speex: session dropped while open");
        }
    }
}

impl CodecSession {
    /// Creates a closed session.
    pub fn new() -> Self {
        Self { state: State::Closed }
    }

    /// Opens the session with `mode` and encoder `quality`.
    pub fn open(&mut self, mode: Mode, quality: i32) -> Result<()> {
        self.open_with(&SessionConfig::new(mode).with_quality(quality))
    }

    /// Opens the session from a full config.
    pub fn open_with(&mut self, config: &SessionConfig) -> Result<()> {
        if self.is_open() {
            return Err(SpeexError::AlreadyOpen);
        }
        config.validate()?;

        let mut encoder = Encoder::new(config.mode)?;
        encoder.set_quality(config.quality)?;
        if let Some(complexity) = config.complexity {
            encoder.set_complexity(complexity)?;
        }
        if config.vbr {
            encoder.set_vbr(true)?;
        }

        let mut decoder = Decoder::new(config.mode)?;
        decoder.set_enhancement(config.enhancement)?;

        debug!(
            mode = %config.mode,
            quality = config.quality,
            encode_frame_size = encoder.frame_size(),
            decode_frame_size = decoder.frame_size(),
            "speex: session opened"
        );

        self.state = State::Open(Box::new(Codec {
            config: config.clone(),
            encoder,
            decoder,
            frame: [0; MAX_FRAME_BYTES],
        }));
        Ok(())
    }

    /// Releases the encoder, decoder and their bit buffers.
    pub fn close(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.state, State::Closed) {
            State::Open(codec) => {
                debug!(mode = %codec.config.mode, "speex: session closed");
                Ok(())
            }
            State::Closed => Err(SpeexError::NotOpenForClose),
        }
    }

    /// Returns true between a successful `open` and `close`.
    pub fn is_open(&self) -> bool {
        matches!(self.state, State::Open(_))
    }

    /// Returns the open mode.
    pub fn mode(&self) -> Result<Mode> {
        Ok(self.codec()?.config.mode)
    }

    /// Returns the open encoder quality.
    pub fn quality(&self) -> Result<i32> {
        Ok(self.codec()?.config.quality)
    }

    /// Returns the number of samples the encoder expects per frame.
    pub fn frame_size(&self) -> Result<usize> {
        Ok(self.codec()?.encoder.frame_size())
    }

    /// Returns the number of samples the decoder produces per frame.
    pub fn decode_frame_size(&self) -> Result<usize> {
        Ok(self.codec()?.decoder.frame_size())
    }

    /// Decodes exactly one compressed frame into `out`.
    ///
    /// Returns the number of samples written, always the decoder frame size.
    pub fn decode(&mut self, frame: &[u8], out: &mut [i16]) -> Result<usize> {
        self.codec_mut()?.decoder.decode_frame(frame, out)
    }

    /// Synthesizes one frame in place of a lost packet.
    pub fn decode_lost(&mut self, out: &mut [i16]) -> Result<usize> {
        self.codec_mut()?.decoder.decode_lost(out)
    }

    /// Encodes `samples[offset..offset + count]` frame by frame into `out`.
    ///
    /// Only whole frames are encoded. Trailing samples are reported in
    /// [`Encoded::dropped_samples`], or rejected when the session was opened
    /// with strict frames. `out` must hold the worst case for the mode,
    /// `frames * mode.max_frame_bytes()`.
    pub fn encode(
        &mut self,
        samples: &[i16],
        offset: usize,
        count: usize,
        out: &mut [u8],
    ) -> Result<Encoded> {
        let codec = self.codec_mut()?;

        let end = offset
            .checked_add(count)
            .filter(|end| *end <= samples.len())
            .ok_or(SpeexError::InvalidRange {
                offset,
                count,
                len: samples.len(),
            })?;

        let frame_size = codec.encoder.frame_size();
        let frames = count / frame_size;
        let dropped_samples = count % frame_size;
        if dropped_samples != 0 && codec.config.strict_frames {
            return Err(SpeexError::PartialFrameDropped {
                samples: count,
                frame_size,
            });
        }

        let needed = frames * codec.config.mode.max_frame_bytes();
        if out.len() < needed {
            return Err(SpeexError::BufferTooSmall {
                needed,
                available: out.len(),
            });
        }

        let mut bytes = 0;
        for pcm in samples[offset..end].chunks_exact(frame_size) {
            let n = codec.encoder.encode_frame(pcm, &mut codec.frame)?;
            let available = out.len();
            let dst = out
                .get_mut(bytes..bytes + n)
                .ok_or(SpeexError::BufferTooSmall {
                    needed: bytes + n,
                    available,
                })?;
            dst.copy_from_slice(&codec.frame[..n]);
            bytes += n;
        }

        if dropped_samples != 0 {
            warn!(
                count,
                frame_size,
                dropped = dropped_samples,
                "speex: trailing samples do not fill a frame"
            );
        }

        Ok(Encoded {
            bytes,
            frames,
            dropped_samples,
        })
    }

    /// Encodes little-endian 16-bit PCM bytes.
    pub fn encode_bytes(&mut self, pcm: &[u8], out: &mut [u8]) -> Result<Encoded> {
        if pcm.len() % 2 != 0 {
            return Err(SpeexError::OddByteLength(pcm.len()));
        }
        let samples: Vec<i16> = pcm
            .chunks_exact(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]))
            .collect();
        self.encode(&samples, 0, samples.len(), out)
    }

    fn codec(&self) -> Result<&Codec> {
        match &self.state {
            State::Open(codec) => Ok(codec.as_ref()),
            State::Closed => Err(SpeexError::NotOpen),
        }
    }

    fn codec_mut(&mut self) -> Result<&mut Codec> {
        match &mut self.state {
            State::Open(codec) => Ok(codec.as_mut()),
            State::Closed => Err(SpeexError::NotOpen),
        }
    }
}
