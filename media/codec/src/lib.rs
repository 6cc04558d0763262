//! # Audio codecs for RTP telephony
//!
//! Converts between 16 bit native-endian linear PCM at 8kHz and the payload formats carried in RTP.
//!
//! - [`Codec`] a single encode/decode strategy for one payload format
//! - [`CodecLibrary`] describes which formats can be handled, including externally provided [`SpeechCodec`]s
//! - [`Codecker`] owns one codec per format, cuts captured audio into frames and decodes received packets

use bytes::Bytes;
use std::fmt;

mod codec;
mod codecker;
mod companding;
mod library;
pub mod pcm;
mod speech;

pub use codec::{Codec, ComfortNoise, Passthrough};
pub use codecker::{Codecker, SampleHandler};
pub use companding::G711Codec;
pub use library::{CodecLibrary, SpeechCodecFactory};
pub use speech::{FixedFrameCodec, SpeechCodec};

/// Size of one frame of linear PCM in bytes, 20ms of 16 bit samples at 8kHz
pub const PCM_FRAME_SIZE: usize = 320;

/// Audio payload formats known to the media pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AudioFormat {
    /// Unencoded linear PCM, never put on the wire
    Raw,
    /// G.711 μ-law
    Pcmu,
    /// G.711 A-law
    Pcma,
    /// GSM 06.10 full rate
    Gsm,
    /// Speex narrowband
    Speex,
    /// IMA ADPCM, can be advertised but there is no codec for it
    Dvi4,
    /// Comfort noise (RFC 3389)
    Cn,
    /// Comfort noise using the reserved payload type 19
    XCn,
}

impl AudioFormat {
    /// The payload type statically assigned to this format by RFC 3551
    pub const fn static_pt(self) -> Option<u8> {
        match self {
            AudioFormat::Pcmu => Some(0),
            AudioFormat::Gsm => Some(3),
            AudioFormat::Dvi4 => Some(5),
            AudioFormat::Pcma => Some(8),
            AudioFormat::Cn => Some(13),
            AudioFormat::XCn => Some(19),
            AudioFormat::Raw | AudioFormat::Speex => None,
        }
    }

    /// Look up a format by its static payload type
    pub fn from_static_pt(pt: u8) -> Option<Self> {
        [
            AudioFormat::Pcmu,
            AudioFormat::Gsm,
            AudioFormat::Dvi4,
            AudioFormat::Pcma,
            AudioFormat::Cn,
            AudioFormat::XCn,
        ]
        .into_iter()
        .find(|format| format.static_pt() == Some(pt))
    }

    /// Encoding name as used in SDP rtpmap attributes
    pub const fn encoding_name(self) -> &'static str {
        match self {
            AudioFormat::Raw => "L16",
            AudioFormat::Pcmu => "PCMU",
            AudioFormat::Pcma => "PCMA",
            AudioFormat::Gsm => "GSM",
            AudioFormat::Speex => "speex",
            AudioFormat::Dvi4 => "DVI4",
            AudioFormat::Cn | AudioFormat::XCn => "CN",
        }
    }

    pub const fn clock_rate(self) -> u32 {
        8000
    }

    pub const fn is_comfort_noise(self) -> bool {
        matches!(self, AudioFormat::Cn | AudioFormat::XCn)
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.encoding_name())
    }
}

/// Encoded audio produced from captured linear PCM
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSample {
    pub format: AudioFormat,
    pub data: Bytes,
}

/// Received encoded audio, tagged with the format it was sent in
#[derive(Debug, Clone)]
pub struct AudioPacket {
    pub format: AudioFormat,
    /// Passed through to the playout path, never interpreted by the codecs
    pub sequence_number: u16,
    pub payload: Bytes,
}

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("can't handle audio format {0}")]
    UnsupportedFormat(AudioFormat),
}

#[cfg(test)]
mod tests {
    use super::AudioFormat;

    #[test]
    fn static_payload_types() {
        assert_eq!(AudioFormat::from_static_pt(0), Some(AudioFormat::Pcmu));
        assert_eq!(AudioFormat::from_static_pt(3), Some(AudioFormat::Gsm));
        assert_eq!(AudioFormat::from_static_pt(8), Some(AudioFormat::Pcma));
        assert_eq!(AudioFormat::from_static_pt(19), Some(AudioFormat::XCn));
        assert_eq!(AudioFormat::from_static_pt(12), None);
        assert_eq!(AudioFormat::from_static_pt(110), None);
    }
}
