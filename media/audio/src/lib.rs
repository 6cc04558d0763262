//! # Media layer between RTP payloads and an audio device
//!
//! The [`MediaLayer`] owns an [`AudioDevice`] and binds a [`Codecker`](codec::Codecker) to it while the device is
//! open. Received packets are decoded and handed to the device through a [`Playout`], captured audio is encoded
//! either on demand ([`MediaLayer::read`]) or pushed from the device through a [`CaptureEncoder`].
//!
//! Capture can temporarily be replaced by a WAV file, see [`MediaLayer::play_wave_file`].

mod config;
mod device;
mod error;
mod media_layer;
mod playout;
mod wave;

pub use config::AudioConfig;
pub use device::{AudioBackend, AudioDevice, CaptureEncoder, CodeckerEncoder, NullEncoder};
pub use error::MediaError;
pub use media_layer::MediaLayer;
pub use playout::Playout;
pub use wave::WavePlayback;
