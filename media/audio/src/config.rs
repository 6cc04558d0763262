use std::path::PathBuf;

/// Describes which audio device an [`AudioBackend`](crate::AudioBackend) should open
#[derive(Debug, Clone, Default)]
pub struct AudioConfig {
    /// Preferred backend by name, e.g. "alsa" or "file", `None` lets the backend decide
    pub backend: Option<String>,

    /// Read captured audio from this file instead of a microphone
    ///
    /// Only used when `outfile` is set as well.
    pub infile: Option<PathBuf>,

    /// Write played audio to this file instead of a speaker
    pub outfile: Option<PathBuf>,
}

impl AudioConfig {
    /// Both files if the device should be file backed
    pub fn files(&self) -> Option<(&PathBuf, &PathBuf)> {
        self.infile.as_ref().zip(self.outfile.as_ref())
    }
}
