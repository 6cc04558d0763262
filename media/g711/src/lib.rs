//! G.711 companding for 8kHz telephony audio
//!
//! [`mulaw`] and [`alaw`] convert single samples or whole slices. [`Law`] picks one of them at runtime.

pub mod alaw;
pub mod mulaw;

/// The companding law of a G.711 stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Law {
    /// μ-law, PCMU
    Mu,
    /// A-law, PCMA
    A,
}

impl Law {
    /// Encode the given samples, the encoded bytes will be appended to `out`
    pub fn encode(self, samples: &[i16], out: &mut Vec<u8>) {
        match self {
            Law::Mu => mulaw::encode_slice(samples, out),
            Law::A => alaw::encode_slice(samples, out),
        }
    }

    /// Decode the given G.711 bytes, the decoded samples will be appended to `out`
    pub fn decode(self, data: &[u8], out: &mut Vec<i16>) {
        match self {
            Law::Mu => mulaw::decode_slice(data, out),
            Law::A => alaw::decode_slice(data, out),
        }
    }
}
