use bytes::Bytes;

/// Encode/decode strategy for a single payload format
///
/// Encoding is frame synchronous: [`Codec::encode`] is only ever called with exactly
/// [`Codec::frame_size`] bytes of linear PCM.
pub trait Codec {
    /// Bytes of linear PCM consumed per encoded frame, `None` if the codec takes input of any size
    fn frame_size(&self) -> Option<usize>;

    /// Encode one frame of linear PCM, returns `None` if the frame is discarded
    fn encode(&mut self, frame: &[u8]) -> Option<Bytes>;

    /// Decode a received payload to linear PCM, returns `None` if no audio was produced
    fn decode(&mut self, payload: &[u8]) -> Option<Bytes>;
}

/// Leaves audio untouched in both directions
#[derive(Debug, Default)]
pub struct Passthrough;

impl Codec for Passthrough {
    fn frame_size(&self) -> Option<usize> {
        None
    }

    fn encode(&mut self, frame: &[u8]) -> Option<Bytes> {
        Some(Bytes::copy_from_slice(frame))
    }

    fn decode(&mut self, payload: &[u8]) -> Option<Bytes> {
        Some(Bytes::copy_from_slice(payload))
    }
}

/// Consumes and emits nothing, used for comfort noise payloads
#[derive(Debug, Default)]
pub struct ComfortNoise;

impl Codec for ComfortNoise {
    fn frame_size(&self) -> Option<usize> {
        Some(1)
    }

    fn encode(&mut self, _frame: &[u8]) -> Option<Bytes> {
        None
    }

    fn decode(&mut self, _payload: &[u8]) -> Option<Bytes> {
        None
    }
}
