use crate::AudioDevice;
use std::io;

/// Hands decoded audio to the device in arrival order
///
/// Packets are never reordered or delayed, the sequence numbers are only tracked to report gaps.
#[derive(Debug, Default)]
pub struct Playout {
    last_sequence_number: Option<u16>,
    gaps: u64,
}

impl Playout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Play `pcm` which was received with the given sequence number
    ///
    /// Empty audio (e.g. from an undecodable packet) only advances the sequence number.
    pub fn write(
        &mut self,
        device: &mut dyn AudioDevice,
        pcm: &[u8],
        sequence_number: u16,
    ) -> io::Result<usize> {
        if let Some(last) = self.last_sequence_number
            && last.wrapping_add(1) != sequence_number
        {
            self.gaps += 1;
            log::debug!("sequence number jumped from {last} to {sequence_number}");
        }

        self.last_sequence_number = Some(sequence_number);

        if pcm.is_empty() {
            return Ok(0);
        }

        device.write(pcm)
    }

    pub fn last_sequence_number(&self) -> Option<u16> {
        self.last_sequence_number
    }

    /// Number of discontinuities seen in the sequence numbers
    pub fn gaps(&self) -> u64 {
        self.gaps
    }
}
