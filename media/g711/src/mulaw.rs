//! G.711 μ-law algorithm aka. PCMU

const BIAS: u16 = 33;
const CLIP: u16 = 0x1FFF;

/// Encode an i16 audio sample to a μ-law sample
pub fn encode(x: i16) -> u8 {
    // one's complement keeps the magnitude of i16::MIN in range
    let magnitude = (if x < 0 { !x } else { x }) as u16;
    let biased = ((magnitude >> 2) + BIAS).min(CLIP);

    let segment = 1 + (16 - (biased >> 6).leading_zeros()) as u16;
    let mantissa = 0xF - ((biased >> segment) & 0xF);

    let code = ((8 - segment) << 4) | mantissa;

    if x >= 0 {
        (code | 0x80) as u8
    } else {
        code as u8
    }
}

/// Decode a μ-law sample to an i16 audio sample
pub fn decode(y: u8) -> i16 {
    let inverted = !y;
    let exponent = (inverted >> 4) & 0x7;
    let mantissa = i16::from(inverted & 0xF);

    let step = 4i16 << (exponent + 1);
    let magnitude = (0x80 << exponent) + step * mantissa + step / 2 - 4 * BIAS as i16;

    if y & 0x80 != 0 { magnitude } else { -magnitude }
}

/// Encode all `samples`, appending the μ-law bytes to `out`
pub fn encode_slice(samples: &[i16], out: &mut Vec<u8>) {
    out.extend(samples.iter().map(|&s| encode(s)));
}

/// Decode all μ-law bytes in `data`, appending the samples to `out`
pub fn decode_slice(data: &[u8], out: &mut Vec<i16>) {
    out.extend(data.iter().map(|&b| decode(b)));
}
