use crate::{Codec, PCM_FRAME_SIZE, pcm};
use bytes::Bytes;

/// Externally implemented speech codec (e.g. bindings to libgsm or libspeex)
///
/// Always called with exactly one 20ms frame, 160 samples in or one encoded frame out.
pub trait SpeechCodec {
    /// Encode the given samples, the encoded frame will be appended to `out`
    fn encode(&mut self, samples: &[i16], out: &mut Vec<u8>);

    /// Decode the given frame, the decoded samples will be appended to `out`
    fn decode(&mut self, frame: &[u8], out: &mut Vec<i16>);
}

/// Wraps a [`SpeechCodec`] producing frames of a fixed encoded size
///
/// Payloads of any other size are rejected on decode, partially decoded audio is never returned.
pub struct FixedFrameCodec {
    name: &'static str,
    encoded_frame_size: usize,
    engine: Box<dyn SpeechCodec>,
}

impl FixedFrameCodec {
    pub const GSM_FRAME_SIZE: usize = 33;
    pub const SPEEX_FRAME_SIZE: usize = 40;

    /// GSM 06.10, 33 byte frames
    pub fn gsm(engine: Box<dyn SpeechCodec>) -> Self {
        Self {
            name: "GSM",
            encoded_frame_size: Self::GSM_FRAME_SIZE,
            engine,
        }
    }

    /// Speex narrowband at 8kbit/s, 40 byte frames
    pub fn speex(engine: Box<dyn SpeechCodec>) -> Self {
        Self {
            name: "speex",
            encoded_frame_size: Self::SPEEX_FRAME_SIZE,
            engine,
        }
    }
}

impl Codec for FixedFrameCodec {
    fn frame_size(&self) -> Option<usize> {
        Some(PCM_FRAME_SIZE)
    }

    fn encode(&mut self, frame: &[u8]) -> Option<Bytes> {
        let mut out = Vec::with_capacity(self.encoded_frame_size);
        self.engine.encode(&pcm::to_samples(frame), &mut out);

        if out.len() != self.encoded_frame_size {
            log::warn!(
                "{}: encoder produced {} bytes, expected {}",
                self.name,
                out.len(),
                self.encoded_frame_size
            );
        }

        Some(out.into())
    }

    fn decode(&mut self, payload: &[u8]) -> Option<Bytes> {
        if payload.len() != self.encoded_frame_size {
            log::debug!(
                "{}: short read on decode, {} != {}",
                self.name,
                payload.len(),
                self.encoded_frame_size
            );
            return None;
        }

        let mut samples = Vec::with_capacity(PCM_FRAME_SIZE / 2);
        self.engine.decode(payload, &mut samples);

        Some(pcm::from_samples(&samples).into())
    }
}
