use crate::{AudioDevice, CodeckerEncoder, MediaError, NullEncoder, Playout, WavePlayback};
use bytes::Bytes;
use codec::{AudioFormat, AudioPacket, CodecLibrary, Codecker, MediaSample, SampleHandler};
use std::{
    cell::RefCell,
    collections::{BTreeSet, VecDeque},
    fs::File,
    io::{BufReader, Read},
    path::Path,
    rc::Rc,
    time::{Duration, Instant},
};

/// Frames of wave file audio kept for [`MediaLayer::read`], about one second
const MAX_QUEUED_FRAMES: usize = 50;

/// Sits between the network and an [`AudioDevice`]
///
/// While open, a [`Codecker`] encodes captured audio to the selected default format and decodes received packets
/// for playback. Every [`reopen`](Self::reopen) creates a fresh codecker, no partially buffered audio survives it.
pub struct MediaLayer {
    device: Box<dyn AudioDevice>,
    library: CodecLibrary,
    default_format: Option<AudioFormat>,

    codecker: Option<Rc<RefCell<Codecker>>>,
    playout: Option<Playout>,

    wave: Option<WavePlayback>,
    /// Wave file frames waiting to be read
    wave_frames: VecDeque<Bytes>,
    /// Whether the codecker has a sample handler, wave file frames are then pushed to it directly
    push_capture: bool,
}

impl MediaLayer {
    pub fn new(device: Box<dyn AudioDevice>, library: CodecLibrary) -> Self {
        Self {
            device,
            library,
            default_format: None,
            codecker: None,
            playout: None,
            wave: None,
            wave_frames: VecDeque::new(),
            push_capture: false,
        }
    }

    pub fn library(&self) -> &CodecLibrary {
        &self.library
    }

    /// The format captured audio is encoded to
    pub fn format(&self) -> Option<AudioFormat> {
        self.default_format
    }

    /// Formats supported by the underlying device
    pub fn device_formats(&self) -> BTreeSet<AudioFormat> {
        self.device.formats()
    }

    pub fn is_open(&self) -> bool {
        self.device.is_open()
    }

    /// Use the first of `candidates` the codec library knows as encoding format
    ///
    /// Only allowed while the device is closed, the format is applied with the next [`reopen`](Self::reopen).
    pub fn select_default_format(
        &mut self,
        candidates: &[AudioFormat],
    ) -> Result<AudioFormat, MediaError> {
        if self.device.is_open() {
            return Err(MediaError::DeviceOpen);
        }

        let format = candidates
            .iter()
            .copied()
            .find(|format| self.library.is_known(*format))
            .ok_or(MediaError::NoUsableFormat)?;

        log::debug!("selected default format {format}");

        self.default_format = Some(format);

        Ok(format)
    }

    /// Bind a fresh codecker and (re-)open the device
    ///
    /// With a `handler` every captured sample is encoded as soon as the device delivers it and passed to the
    /// handler. Without one, captured audio must be pulled using [`read`](Self::read).
    pub fn reopen(&mut self, handler: Option<SampleHandler>) -> Result<(), MediaError> {
        let format = self.default_format.ok_or(MediaError::NoDefaultFormat)?;

        let mut codecker = Codecker::new(format, &self.library)?;

        log::debug!("audio device reopen with format {format}");
        self.device.reopen()?;

        self.push_capture = handler.is_some();

        if let Some(handler) = handler {
            codecker.set_handler(handler);

            let codecker = Rc::new(RefCell::new(codecker));
            self.device
                .set_encoder(Box::new(CodeckerEncoder::new(codecker.clone())));
            self.codecker = Some(codecker);
        } else {
            self.device.set_encoder(Box::new(NullEncoder));
            self.codecker = Some(Rc::new(RefCell::new(codecker)));
        }

        if self.playout.is_some() {
            log::debug!("playout already started");
        } else {
            self.playout = Some(Playout::new());
        }

        Ok(())
    }

    /// Encode the next chunk of captured audio
    ///
    /// Captured audio comes from the wave file while one is playing, otherwise from the device.
    pub fn read(&mut self) -> Option<MediaSample> {
        let codecker = self.codecker.as_ref()?;

        let pcm = if self.wave.is_some() {
            self.wave_frames.pop_front()?
        } else {
            self.device.read()?
        };

        let mut codecker = codecker.try_borrow_mut().ok()?;
        codecker.handle_audio(&pcm)
    }

    /// Decode `packet` and pass it to the device
    ///
    /// Returns the number of bytes consumed by the device. Writing before the first [`reopen`](Self::reopen) does
    /// nothing.
    pub fn write(&mut self, packet: &AudioPacket) -> Result<usize, MediaError> {
        let (Some(playout), Some(codecker)) = (&mut self.playout, &self.codecker) else {
            log::debug!("write before reopen, discarding");
            return Ok(0);
        };

        let pcm = codecker.borrow_mut().decode(packet)?;

        match pcm {
            Some(pcm) => Ok(playout.write(&mut *self.device, &pcm, packet.sequence_number)?),
            None => {
                playout.write(&mut *self.device, &[], packet.sequence_number)?;
                Ok(0)
            }
        }
    }

    /// Drop the codecker and close the device, does nothing if already closed
    ///
    /// A playing wave file is stopped as well.
    pub fn close(&mut self) -> Result<(), MediaError> {
        self.stop_wave_file();
        self.playout = None;
        self.codecker = None;
        self.push_capture = false;
        self.device.set_encoder(Box::new(NullEncoder));

        if self.device.is_open() {
            log::debug!("audio device close");
            self.device.close()?;
        }

        Ok(())
    }

    /// Replace captured audio with the contents of the WAV file at `path`
    ///
    /// Selects PCMU and reopens the device. The file is played in 20ms frames as [`poll`](Self::poll) is called,
    /// starting over at its end.
    pub fn play_wave_file(&mut self, path: impl AsRef<Path>) -> Result<(), MediaError> {
        let file = BufReader::new(File::open(path)?);
        self.play_wave(file)
    }

    /// Like [`play_wave_file`](Self::play_wave_file) but reads the WAV data from `reader`
    pub fn play_wave<R: Read>(&mut self, reader: R) -> Result<(), MediaError> {
        self.stop_wave_file();

        let playback = WavePlayback::new(reader, Instant::now())?;

        if self.device.is_open() {
            self.close()?;
        }

        self.select_default_format(&[AudioFormat::Pcmu])?;
        self.reopen(None)?;

        self.wave = Some(playback);

        Ok(())
    }

    /// Stop a playing wave file, capture continues from the device
    pub fn stop_wave_file(&mut self) {
        if self.wave.take().is_some() {
            log::debug!("stopped wave file playback");
        }

        self.wave_frames.clear();
    }

    pub fn is_playing_wave(&self) -> bool {
        self.wave.is_some()
    }

    /// Returns a duration after which [`poll`](Self::poll) must be called
    pub fn timeout(&self) -> Option<Duration> {
        self.wave
            .as_ref()
            .map(|wave| wave.timeout(Instant::now()))
    }

    /// Feed the next wave file frame into the capture path if it is due
    pub fn poll(&mut self, now: Instant) {
        let Some(wave) = &mut self.wave else {
            return;
        };

        let Some(frame) = wave.poll(now) else {
            return;
        };

        if self.push_capture {
            if let Some(codecker) = &self.codecker
                && let Ok(mut codecker) = codecker.try_borrow_mut()
            {
                codecker.handle_audio(&frame);
            }

            return;
        }

        if self.wave_frames.len() >= MAX_QUEUED_FRAMES {
            log::debug!("wave file frames are not being read, dropping oldest");
            self.wave_frames.pop_front();
        }

        self.wave_frames.push_back(frame);
    }
}
