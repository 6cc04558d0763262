//! G.711 A-law algorithm aka. PCMA

const TOGGLE: u8 = 0x55;

/// Encode an i16 audio sample to a A-law sample
pub fn encode(x: i16) -> u8 {
    let mut ix = (if x < 0 { !x } else { x }) >> 4;

    if ix > 15 {
        // normalize the mantissa to 5 bits, the shift count is the segment
        let shift = 11 - (ix as u16).leading_zeros() as i16;
        let exponent = shift + 1;

        ix = (ix >> shift) - 16 + (exponent << 4);
    }

    if x >= 0 {
        ix |= 0x80;
    }

    (ix as u8) ^ TOGGLE
}

/// Decode a A-law sample to an i16 audio sample
pub fn decode(y: u8) -> i16 {
    let ix = (y ^ TOGGLE) & 0x7F;

    let exponent = ix >> 4;
    let mut mantissa = i16::from(ix & 0xF);

    if exponent > 0 {
        mantissa += 16;
    }

    mantissa = (mantissa << 4) + 0x8;

    if exponent > 1 {
        mantissa <<= exponent - 1;
    }

    if y > 127 { mantissa } else { -mantissa }
}

/// Encode all `samples`, appending the A-law bytes to `out`
pub fn encode_slice(samples: &[i16], out: &mut Vec<u8>) {
    out.extend(samples.iter().map(|&s| encode(s)));
}

/// Decode all A-law bytes in `data`, appending the samples to `out`
pub fn decode_slice(data: &[u8], out: &mut Vec<i16>) {
    out.extend(data.iter().map(|&b| decode(b)));
}
