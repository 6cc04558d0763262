use crate::AudioConfig;
use bytes::Bytes;
use codec::{AudioFormat, Codecker};
use std::{cell::RefCell, collections::BTreeSet, io, rc::Rc};

/// Opens audio devices, implemented by the platform specific audio driver
pub trait AudioBackend {
    /// Acquire a device described by `config`
    ///
    /// The returned device may still be closed, it is opened with [`AudioDevice::reopen`].
    fn open(&self, config: &AudioConfig) -> io::Result<Box<dyn AudioDevice>>;
}

/// A full duplex audio device producing and consuming 16 bit linear PCM at 8kHz
pub trait AudioDevice {
    /// Formats the device can handle, used to build the local SDP offer
    fn formats(&self) -> BTreeSet<AudioFormat>;

    fn is_open(&self) -> bool;

    /// (Re-)open the device, flushing its capture and playback buffers
    fn reopen(&mut self) -> io::Result<()>;

    fn close(&mut self) -> io::Result<()>;

    /// Take captured audio, if any is available
    fn read(&mut self) -> Option<Bytes>;

    /// Play the given audio, returns the number of bytes consumed
    fn write(&mut self, pcm: &[u8]) -> io::Result<usize>;

    /// Set the encoder captured audio is pushed to
    fn set_encoder(&mut self, encoder: Box<dyn CaptureEncoder>);
}

/// Receives audio captured by an [`AudioDevice`]
pub trait CaptureEncoder {
    fn handle_audio(&mut self, pcm: &[u8]);
}

/// Discards all captured audio
#[derive(Debug, Default)]
pub struct NullEncoder;

impl CaptureEncoder for NullEncoder {
    fn handle_audio(&mut self, _pcm: &[u8]) {}
}

/// Encodes captured audio with the codecker shared with the [`MediaLayer`](crate::MediaLayer)
///
/// Produced samples are passed to the codecker's sample handler.
#[derive(Debug)]
pub struct CodeckerEncoder {
    codecker: Rc<RefCell<Codecker>>,
}

impl CodeckerEncoder {
    pub fn new(codecker: Rc<RefCell<Codecker>>) -> Self {
        Self { codecker }
    }
}

impl CaptureEncoder for CodeckerEncoder {
    fn handle_audio(&mut self, pcm: &[u8]) {
        let Ok(mut codecker) = self.codecker.try_borrow_mut() else {
            log::warn!("codecker busy, dropping {} bytes of captured audio", pcm.len());
            return;
        };

        if let Some(sample) = codecker.handle_audio(pcm) {
            // only happens if no handler was set
            log::debug!("discarding {} sample, no handler", sample.format);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codec::{CodecLibrary, MediaSample};

    #[test]
    fn codecker_encoder_pushes_to_handler() {
        let samples = Rc::new(RefCell::new(Vec::<MediaSample>::new()));

        let mut codecker = Codecker::new(AudioFormat::Pcmu, &CodecLibrary::new()).unwrap();
        let sink = samples.clone();
        codecker.set_handler(Box::new(move |sample| sink.borrow_mut().push(sample)));

        let codecker = Rc::new(RefCell::new(codecker));
        let mut encoder = CodeckerEncoder::new(codecker.clone());

        encoder.handle_audio(&[0; 200]);
        assert!(samples.borrow().is_empty());

        encoder.handle_audio(&[0; 200]);
        assert_eq!(samples.borrow().len(), 1);
        assert_eq!(codecker.borrow().buffered_len(), 80);
    }
}
