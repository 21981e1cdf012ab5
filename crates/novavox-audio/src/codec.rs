//! PCM16 wire codec
//!
//! The wire format is raw little-endian signed 16-bit PCM, mono, 16 kHz, no
//! container header. Both directions are pure functions with no hidden
//! state; the float→int16→float round trip is lossy by quantization only,
//! bounded by 1.5 steps (the encode scale is 32767, the decode scale 32768,
//! so the error is at most (|x| + 0.5) / 32768 for in-range input).

use novavox_foundation::AudioError;

use crate::buffer::AudioBuffer;

/// Decode little-endian PCM16 bytes into a normalized sample buffer.
///
/// Fails with `MalformedBuffer` when the byte length is odd.
pub fn pcm16_to_float(bytes: &[u8]) -> Result<AudioBuffer, AudioError> {
    if bytes.len() % 2 != 0 {
        return Err(AudioError::MalformedBuffer { len: bytes.len() });
    }

    let samples = bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as f32 / 32_768.0)
        .collect();

    Ok(AudioBuffer::mono_16k(samples))
}

/// Encode normalized samples as little-endian PCM16 bytes.
///
/// Each sample is clamped to [-1, 1], scaled by 32767, and rounded to the
/// nearest integer.
pub fn float_to_pcm16(samples: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(samples.len() * 2);
    for &sample in samples {
        let clamped = sample.clamp(-1.0, 1.0);
        let quantized = (clamped * 32_767.0).round() as i16;
        bytes.extend_from_slice(&quantized.to_le_bytes());
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odd_byte_length_is_rejected() {
        let err = pcm16_to_float(&[0x00, 0x01, 0x02]).unwrap_err();
        assert_eq!(err, AudioError::MalformedBuffer { len: 3 });
    }

    #[test]
    fn empty_buffer_decodes_to_empty() {
        let buf = pcm16_to_float(&[]).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn known_values_decode() {
        // 0x0000 -> 0.0, 0x7fff -> 32767/32768, 0x8000 -> -1.0
        let buf = pcm16_to_float(&[0x00, 0x00, 0xff, 0x7f, 0x00, 0x80]).unwrap();
        let s = buf.samples();
        assert_eq!(s[0], 0.0);
        assert!((s[1] - 32_767.0 / 32_768.0).abs() < 1e-7);
        assert_eq!(s[2], -1.0);
    }

    #[test]
    fn out_of_range_samples_are_clamped() {
        let bytes = float_to_pcm16(&[2.0, -3.5]);
        assert_eq!(&bytes[0..2], &i16::MAX.to_le_bytes());
        assert_eq!(&bytes[2..4], &(-32_767i16).to_le_bytes());
    }

    #[test]
    fn round_trip_is_within_quantization_bound() {
        let original: Vec<f32> = (0..1000).map(|i| (i as f32 / 500.0) - 1.0).collect();
        let decoded = pcm16_to_float(&float_to_pcm16(&original)).unwrap();
        for (a, b) in original.iter().zip(decoded.samples()) {
            assert!((a - b).abs() <= 1.5 / 32_768.0, "{a} vs {b}");
        }
    }
}
