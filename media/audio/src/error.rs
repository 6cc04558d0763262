use codec::CodecError;
use std::io;

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("none of the given formats is known")]
    NoUsableFormat,
    #[error("no default format selected, call select_default_format first")]
    NoDefaultFormat,
    #[error("device must be closed before selecting a format")]
    DeviceOpen,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("failed to read wave file")]
    Wave(#[from] hound::Error),
    #[error("wave file must be 16 bit mono, got {channels} channels with {bits_per_sample} bits")]
    UnsupportedWave { channels: u16, bits_per_sample: u16 },
}
