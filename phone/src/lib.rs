//! # Softphone call session
//!
//! [`Phone`] manages the calls of a SIP/RTP softphone: it accepts calls handed over by the signalling layer,
//! negotiates an audio format from the remote SDP, binds the audio device to the current call and moves audio
//! between the device and the RTP transports.
//!
//! Everything around it is provided by the application through traits:
//!
//! - [`CallDialog`] and [`Signalling`] the SIP side of a call
//! - [`RtpTransportFactory`] and [`RtpTransport`] sockets sending and receiving RTP
//! - [`PhoneUi`] user facing notifications and the decision to answer incoming calls
//! - [`AudioBackend`](audio::AudioBackend) the audio device
//!
//! Only one call is current at a time, only its audio is played and captured. Other established calls are parked.

mod call;
mod config;
mod dialog;
mod error;
mod phone;
pub mod sdp;
mod transport;
mod ui;

pub use call::{CallSetup, PendingCall};
pub use config::PhoneConfig;
pub use dialog::{CallDialog, CallDirection, Signalling};
pub use error::Error;
pub use phone::Phone;
pub use transport::{RtpPacket, RtpTransport, RtpTransportFactory, validate_dtmf_digit};
pub use ui::{IncomingCallAnswer, PhoneUi};

slotmap::new_key_type! {
    /// Identifies a call for its whole lifetime, never reused after the call ended
    pub struct CallCookie;
}

/// State of a call as observed from the outside
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    /// Accepted, waiting for the RTP socket (and the user's answer for incoming calls)
    Created,
    /// Setup completed, audio format and remote address are being negotiated
    Negotiating,
    /// Started and current, audio flows in both directions
    Active,
    /// Started and current, captured audio is not sent
    Muted,
    /// Started but another call is current
    Parked,
    /// Ended or never existed
    Ended,
}
