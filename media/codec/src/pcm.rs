//! Conversion between linear PCM bytes and i16 samples
//!
//! Audio devices hand out 16 bit samples in the machine's byte order.

/// Read native-endian samples from `bytes`, a trailing odd byte is ignored
pub fn to_samples(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(2)
        .map(|pair| i16::from_ne_bytes([pair[0], pair[1]]))
        .collect()
}

/// Write `samples` as native-endian bytes
pub fn from_samples(samples: &[i16]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(samples.len() * 2);

    for sample in samples {
        bytes.extend_from_slice(&sample.to_ne_bytes());
    }

    bytes
}
