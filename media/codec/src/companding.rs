use crate::{Codec, PCM_FRAME_SIZE, pcm};
use bytes::Bytes;
use g711::Law;

/// Encoded size of one 20ms G.711 frame
const ENCODED_FRAME_SIZE: usize = PCM_FRAME_SIZE / 2;

/// G.711 μ-law (PCMU) or A-law (PCMA)
///
/// Received payloads that are shorter than a full frame are padded by repeating their final byte.
#[derive(Debug)]
pub struct G711Codec {
    law: Law,
}

impl G711Codec {
    pub fn pcmu() -> Self {
        Self { law: Law::Mu }
    }

    pub fn pcma() -> Self {
        Self { law: Law::A }
    }

    fn name(&self) -> &'static str {
        match self.law {
            Law::Mu => "mulaw",
            Law::A => "alaw",
        }
    }
}

impl Codec for G711Codec {
    fn frame_size(&self) -> Option<usize> {
        Some(PCM_FRAME_SIZE)
    }

    fn encode(&mut self, frame: &[u8]) -> Option<Bytes> {
        let mut out = Vec::with_capacity(ENCODED_FRAME_SIZE);
        self.law.encode(&pcm::to_samples(frame), &mut out);
        Some(out.into())
    }

    fn decode(&mut self, payload: &[u8]) -> Option<Bytes> {
        let &last = payload.last()?;

        let mut samples = Vec::with_capacity(payload.len().max(ENCODED_FRAME_SIZE));

        if payload.len() < ENCODED_FRAME_SIZE {
            log::debug!(
                "{}: short read on decode, {} != {ENCODED_FRAME_SIZE}",
                self.name(),
                payload.len()
            );

            let mut padded = payload.to_vec();
            padded.resize(ENCODED_FRAME_SIZE, last);
            self.law.decode(&padded, &mut samples);
        } else {
            if payload.len() > ENCODED_FRAME_SIZE {
                log::debug!(
                    "{}: long read on decode, {} != {ENCODED_FRAME_SIZE}",
                    self.name(),
                    payload.len()
                );
            }

            self.law.decode(payload, &mut samples);
        }

        Some(pcm::from_samples(&samples).into())
    }
}
