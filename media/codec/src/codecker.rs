use crate::{AudioFormat, AudioPacket, Codec, CodecError, CodecLibrary, MediaSample};
use bytes::{Bytes, BytesMut};
use std::{collections::HashMap, fmt};

/// Receives every [`MediaSample`] produced by [`Codecker::handle_audio`]
pub type SampleHandler = Box<dyn FnMut(MediaSample)>;

/// Converts captured linear PCM into media samples of a single format, and received packets back to linear PCM
///
/// Encoding always happens in whole frames, audio which doesn't fill a frame stays buffered until the next call to
/// [`handle_audio`](Codecker::handle_audio).
pub struct Codecker {
    format: AudioFormat,
    codecs: HashMap<AudioFormat, Box<dyn Codec>>,
    buffer: BytesMut,
    handler: Option<SampleHandler>,
}

impl fmt::Debug for Codecker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Codecker")
            .field("format", &self.format)
            .field("buffer (len)", &self.buffer.len())
            .field("handler", &self.handler.is_some())
            .finish()
    }
}

impl Codecker {
    /// Create a codecker encoding to `format`
    ///
    /// Fails if the format is not one of the library's known formats.
    pub fn new(format: AudioFormat, library: &CodecLibrary) -> Result<Self, CodecError> {
        if !library.is_known(format) {
            return Err(CodecError::UnsupportedFormat(format));
        }

        Ok(Self {
            format,
            codecs: library.make_codec_set(),
            buffer: BytesMut::new(),
            handler: None,
        })
    }

    /// The format captured audio is encoded to
    pub fn default_format(&self) -> AudioFormat {
        self.format
    }

    /// Emit all subsequently produced samples to `handler` instead of returning them
    pub fn set_handler(&mut self, handler: SampleHandler) {
        self.handler = Some(handler);
    }

    /// Number of bytes waiting for a frame to be completed
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Accept captured linear PCM, encoding every complete frame
    ///
    /// With a handler set every sample is passed to it and `None` is returned. Without a handler the last sample
    /// produced by this call is returned.
    pub fn handle_audio(&mut self, pcm: &[u8]) -> Option<MediaSample> {
        if pcm.is_empty() {
            return None;
        }

        let format = self.format;
        let Some(codec) = self.codecs.get_mut(&format) else {
            // new() guarantees the codec exists
            log::error!("no codec for bound format {format}");
            return None;
        };

        let Some(frame_size) = codec.frame_size() else {
            // size agnostic, nothing to buffer
            return codec
                .encode(pcm)
                .and_then(|data| emit(&mut self.handler, MediaSample { format, data }));
        };

        self.buffer.extend_from_slice(pcm);

        let mut produced = None;

        while self.buffer.len() >= frame_size {
            let frame = self.buffer.split_to(frame_size);

            if let Some(data) = codec.encode(&frame) {
                produced = emit(&mut self.handler, MediaSample { format, data });
            }
        }

        produced
    }

    /// Decode a received packet to linear PCM
    ///
    /// Returns `Ok(None)` if the codec produced no audio, e.g. for malformed frames or comfort noise.
    pub fn decode(&mut self, packet: &AudioPacket) -> Result<Option<Bytes>, CodecError> {
        let codec = self
            .codecs
            .get_mut(&packet.format)
            .ok_or(CodecError::UnsupportedFormat(packet.format))?;

        if packet.payload.is_empty() {
            return Ok(None);
        }

        Ok(codec.decode(&packet.payload))
    }
}

fn emit(handler: &mut Option<SampleHandler>, sample: MediaSample) -> Option<MediaSample> {
    match handler {
        Some(handler) => {
            handler(sample);
            None
        }
        None => Some(sample),
    }
}
