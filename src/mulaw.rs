//! G.711 μ-law companion codec.
//!
//! A stateless, byte-in/byte-out shim converting between 16-bit little-endian
//! linear PCM and 8-bit μ-law samples ([ITU-T G.711](https://www.itu.int/rec/T-REC-G.711)).
//! It ships alongside the STUN codec for media paths that negotiate PCMU;
//! it shares no state or types with the message codec.

const BIAS: i32 = 0x84;
const CLIP: i32 = 32635;

// Expanding a μ-law byte is a pure function of its 8 bits, so the whole
// decode side is a 256-entry table.
const fn expand(ulaw: u8) -> i16 {
    let ulaw = !ulaw;
    let sign = ulaw & 0x80;
    let exponent = ((ulaw >> 4) & 0x07) as i32;
    let mantissa = (ulaw & 0x0f) as i32;

    let mut sample = (((mantissa << 3) + BIAS) << exponent) - BIAS;
    if sign != 0 {
        sample = -sample;
    }

    sample as i16
}

const ULAW_TO_PCM: [i16; 256] = {
    let mut table = [0i16; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = expand(i as u8);
        i += 1;
    }
    table
};

fn compress(sample: i16) -> u8 {
    let mut sample = sample as i32;

    let sign = if sample < 0 {
        sample = -sample;
        0x80u8
    } else {
        0x00
    };

    if sample > CLIP {
        sample = CLIP;
    }
    sample += BIAS;

    // Segment number: position of the most significant bit above bit 7
    let mut exponent = 7;
    let mut mask = 0x4000;
    while exponent > 0 && sample & mask == 0 {
        exponent -= 1;
        mask >>= 1;
    }

    let mantissa = ((sample >> (exponent + 3)) & 0x0f) as u8;

    !(sign | ((exponent as u8) << 4) | mantissa)
}

/// Encodes 16-bit little-endian PCM samples into μ-law bytes.
///
/// A trailing odd byte, not forming a full sample, is ignored.
pub fn encode(pcm: &[u8]) -> Vec<u8> {
    pcm.chunks_exact(2)
        .map(|pair| compress(i16::from_le_bytes([pair[0], pair[1]])))
        .collect()
}

/// Decodes μ-law bytes into 16-bit little-endian PCM samples.
pub fn decode(ulaw: &[u8]) -> Vec<u8> {
    let mut pcm = Vec::with_capacity(ulaw.len() * 2);

    for &byte in ulaw {
        let sample = ULAW_TO_PCM[byte as usize];
        pcm.extend_from_slice(&sample.to_le_bytes());
    }

    pcm
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silence_maps_to_0xff() {
        assert_eq!(encode(&0i16.to_le_bytes()), vec![0xff]);
        assert_eq!(decode(&[0xff]), 0i16.to_le_bytes().to_vec());
    }

    #[test]
    fn extremes_clip_to_segment_maxima() {
        assert_eq!(encode(&i16::max_value().to_le_bytes()), vec![0x80]);
        assert_eq!(encode(&i16::min_value().to_le_bytes()), vec![0x00]);
        assert_eq!(decode(&[0x80]), 32124i16.to_le_bytes().to_vec());
        assert_eq!(decode(&[0x00]), (-32124i16).to_le_bytes().to_vec());
    }

    #[test]
    fn compress_is_left_inverse_of_expand() {
        for byte in 0u16..=255 {
            let byte = byte as u8;
            // 0x7f is negative zero, which re-encodes as positive zero
            if byte == 0x7f {
                continue;
            }

            let pcm = decode(&[byte]);
            assert_eq!(encode(&pcm), vec![byte], "byte {:#04x}", byte);
        }
    }

    #[test]
    fn quantization_error_is_bounded() {
        for &sample in &[1i16, -1, 100, -100, 1000, -1000, 8000, -8000, 30000, -30000] {
            let decoded = decode(&encode(&sample.to_le_bytes()));
            let decoded = i16::from_le_bytes([decoded[0], decoded[1]]);

            // Step size doubles per segment; worst case is half of 256
            assert!((decoded as i32 - sample as i32).abs() <= 1024);
        }
    }

    #[test]
    fn odd_trailing_byte_is_ignored() {
        assert_eq!(encode(&[0x00, 0x00, 0x7f]), vec![0xff]);
    }
}
