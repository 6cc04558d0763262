use crate::MediaError;
use bytes::Bytes;
use codec::pcm;
use std::{
    io::Read,
    time::{Duration, Instant},
};

/// Samples per 20ms frame at 8kHz
const FRAME_SAMPLES: usize = 160;
const FRAME_INTERVAL: Duration = Duration::from_millis(20);

/// Plays a WAV file in 20ms frames, starting over at the end
#[derive(Debug)]
pub struct WavePlayback {
    samples: Vec<i16>,
    position: usize,
    next_frame: Instant,
}

impl WavePlayback {
    /// Read the whole file, it must contain 16 bit mono integer samples
    pub fn new<R: Read>(reader: R, now: Instant) -> Result<Self, MediaError> {
        let mut reader = hound::WavReader::new(reader)?;
        let spec = reader.spec();

        if spec.channels != 1
            || spec.bits_per_sample != 16
            || spec.sample_format != hound::SampleFormat::Int
        {
            return Err(MediaError::UnsupportedWave {
                channels: spec.channels,
                bits_per_sample: spec.bits_per_sample,
            });
        }

        if spec.sample_rate != 8000 {
            log::warn!(
                "wave file has a sample rate of {}Hz, will be played as 8kHz",
                spec.sample_rate
            );
        }

        let samples = reader.samples::<i16>().collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            samples,
            position: 0,
            next_frame: now,
        })
    }

    /// Returns a duration after which [`poll`](Self::poll) must be called
    pub fn timeout(&self, now: Instant) -> Duration {
        self.next_frame.saturating_duration_since(now)
    }

    /// Returns the next frame if it is due
    ///
    /// At most one frame is produced per call, if polling fell behind the schedule is restarted from `now`.
    pub fn poll(&mut self, now: Instant) -> Option<Bytes> {
        if self.next_frame > now {
            return None;
        }

        self.next_frame += FRAME_INTERVAL;
        if self.next_frame <= now {
            self.next_frame = now + FRAME_INTERVAL;
        }

        self.next_chunk()
    }

    /// Up to one frame of audio, `None` once when wrapping around at the end of the file
    fn next_chunk(&mut self) -> Option<Bytes> {
        if self.position >= self.samples.len() {
            self.position = 0;
            return None;
        }

        let end = (self.position + FRAME_SAMPLES).min(self.samples.len());
        let chunk = pcm::from_samples(&self.samples[self.position..end]);
        self.position = end;

        Some(chunk.into())
    }
}
