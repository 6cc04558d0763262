//! Structured session descriptions
//!
//! Only the parts of SDP the phone uses are modelled. Parsing and printing is up to the signalling layer.

use codec::AudioFormat;
use std::{
    fmt,
    net::{IpAddr, SocketAddr},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Audio,
    Video,
    Application,
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Audio => f.write_str("audio"),
            MediaType::Video => f.write_str("video"),
            MediaType::Application => f.write_str("application"),
        }
    }
}

/// `a=rtpmap` attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RtpMap {
    pub payload: u8,
    pub encoding: String,
    pub clock_rate: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDescription {
    /// Session level connection address
    pub address: Option<IpAddr>,
    pub media: Vec<MediaDescription>,
}

impl SessionDescription {
    /// The first audio media description
    pub fn audio(&self) -> Option<&MediaDescription> {
        self.media
            .iter()
            .find(|media| media.media_type == MediaType::Audio)
    }

    /// Address to send the media to, the media level connection address takes precedence
    pub fn media_address(&self, media: &MediaDescription) -> Option<SocketAddr> {
        let ip = media.address.or(self.address)?;
        Some(SocketAddr::new(ip, media.port))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaDescription {
    pub media_type: MediaType,
    /// Media level connection address
    pub address: Option<IpAddr>,
    pub port: u16,
    /// Payload types in order of preference
    pub fmts: Vec<u8>,
    pub rtpmap: Vec<RtpMap>,
}

impl MediaDescription {
    pub fn new(media_type: MediaType, address: Option<IpAddr>, port: u16) -> Self {
        Self {
            media_type,
            address,
            port,
            fmts: vec![],
            rtpmap: vec![],
        }
    }

    /// Add a payload type with its rtpmap attribute
    pub fn add_rtpmap(&mut self, payload: u8, encoding: impl Into<String>, clock_rate: u32) {
        self.fmts.push(payload);
        self.rtpmap.push(RtpMap {
            payload,
            encoding: encoding.into(),
            clock_rate,
        });
    }

    /// Find the payload type the remote uses for `format`
    ///
    /// Static payload types are matched by number, dynamic ones by their rtpmap encoding name and clock rate.
    pub fn payload_type_of(&self, format: AudioFormat) -> Option<u8> {
        if let Some(pt) = format.static_pt() {
            return self.fmts.contains(&pt).then_some(pt);
        }

        self.rtpmap
            .iter()
            .find(|rtpmap| {
                rtpmap.encoding.eq_ignore_ascii_case(format.encoding_name())
                    && rtpmap.clock_rate == format.clock_rate()
            })
            .map(|rtpmap| rtpmap.payload)
    }
}
