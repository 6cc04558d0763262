use crate::{AudioFormat, Codec, ComfortNoise, FixedFrameCodec, G711Codec, Passthrough, SpeechCodec};
use std::{
    collections::{BTreeSet, HashMap},
    fmt,
    sync::Arc,
};

/// Creates a fresh [`SpeechCodec`] instance for every codec set
pub type SpeechCodecFactory = Arc<dyn Fn() -> Box<dyn SpeechCodec> + Send + Sync>;

/// Describes which audio formats are available
///
/// Raw passthrough, G.711 and comfort noise are always available. GSM and Speex are only available
/// if an external implementation has been registered.
#[derive(Clone, Default)]
pub struct CodecLibrary {
    gsm: Option<SpeechCodecFactory>,
    speex: Option<SpeechCodecFactory>,
}

impl fmt::Debug for CodecLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecLibrary")
            .field("gsm", &self.gsm.is_some())
            .field("speex", &self.speex.is_some())
            .finish()
    }
}

impl CodecLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a GSM 06.10 implementation
    pub fn with_gsm<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Box<dyn SpeechCodec> + Send + Sync + 'static,
    {
        self.gsm = Some(Arc::new(factory));
        self
    }

    /// Register a Speex narrowband implementation
    pub fn with_speex<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Box<dyn SpeechCodec> + Send + Sync + 'static,
    {
        self.speex = Some(Arc::new(factory));
        self
    }

    /// Formats which can be used as encoding format
    ///
    /// Comfort noise is excluded, even though it has a codec, callers must handle silence explicitly.
    pub fn known_formats(&self) -> BTreeSet<AudioFormat> {
        let mut formats = BTreeSet::from([AudioFormat::Raw, AudioFormat::Pcmu, AudioFormat::Pcma]);

        if self.gsm.is_some() {
            formats.insert(AudioFormat::Gsm);
        }

        if self.speex.is_some() {
            formats.insert(AudioFormat::Speex);
        }

        formats
    }

    pub fn is_known(&self, format: AudioFormat) -> bool {
        self.known_formats().contains(&format)
    }

    /// Create one codec instance per available format
    pub(crate) fn make_codec_set(&self) -> HashMap<AudioFormat, Box<dyn Codec>> {
        let mut set: HashMap<AudioFormat, Box<dyn Codec>> = HashMap::new();

        set.insert(AudioFormat::Cn, Box::new(ComfortNoise));
        set.insert(AudioFormat::XCn, Box::new(ComfortNoise));
        set.insert(AudioFormat::Raw, Box::new(Passthrough));
        set.insert(AudioFormat::Pcmu, Box::new(G711Codec::pcmu()));
        set.insert(AudioFormat::Pcma, Box::new(G711Codec::pcma()));

        if let Some(gsm) = &self.gsm {
            set.insert(AudioFormat::Gsm, Box::new(FixedFrameCodec::gsm(gsm())));
        }

        if let Some(speex) = &self.speex {
            set.insert(AudioFormat::Speex, Box::new(FixedFrameCodec::speex(speex())));
        }

        set
    }
}
