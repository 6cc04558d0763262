use crate::{CallCookie, Error};
use bytes::Bytes;
use codec::AudioFormat;
use futures_util::future::LocalBoxFuture;
use std::{
    io,
    net::{IpAddr, SocketAddr},
};

/// A received RTP packet, reduced to what the phone looks at
#[derive(Debug, Clone)]
pub struct RtpPacket {
    pub pt: u8,
    pub sequence_number: u16,
    pub payload: Bytes,
}

/// Creates one [`RtpTransport`] per call
pub trait RtpTransportFactory {
    fn create(&mut self, cookie: CallCookie) -> Box<dyn RtpTransport>;
}

/// RTP socket of a single call
///
/// Received packets are passed to [`Phone::receive_rtp`](crate::Phone::receive_rtp), packets to send are pulled
/// using [`Phone::give_rtp`](crate::Phone::give_rtp).
pub trait RtpTransport {
    /// Create the socket on `local_ip`, resolves to the address the remote should send to
    fn create_socket(
        &mut self,
        local_ip: IpAddr,
        use_stun: bool,
    ) -> LocalBoxFuture<'static, io::Result<SocketAddr>>;

    /// The address advertised in SDP, `None` until the socket has been created
    fn visible_address(&self) -> Option<SocketAddr>;

    /// Whether the transport is able to packetize the given format
    fn supports_format(&self, format: AudioFormat) -> bool;

    /// Start sending to and receiving from `remote`
    fn start(&mut self, remote: SocketAddr);

    fn stop(&mut self);

    fn start_dtmf(&mut self, digit: char);

    fn stop_dtmf(&mut self, digit: char);
}

/// Returns the canonical (uppercase) form of a DTMF digit
pub fn validate_dtmf_digit(digit: char) -> Result<char, Error> {
    match digit.to_ascii_uppercase() {
        digit @ ('0'..='9' | '*' | '#' | 'A'..='D') => Ok(digit),
        _ => Err(Error::InvalidDtmfDigit(digit)),
    }
}
