//! Normalized audio sample buffer

use crate::SAMPLE_RATE_HZ;

/// An ordered sequence of normalized float samples in [-1, 1], tagged with
/// its sample rate and channel count. The pipeline is fixed mono/16 kHz.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
    channels: u16,
}

impl AudioBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
            channels: 1,
        }
    }

    /// Mono buffer at the pipeline's fixed 16 kHz rate.
    pub fn mono_16k(samples: Vec<f32>) -> Self {
        Self::new(samples, SAMPLE_RATE_HZ)
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Append another buffer's samples. Rates must already agree; the
    /// pipeline only ever concatenates buffers it produced itself.
    pub fn extend_from(&mut self, other: &AudioBuffer) {
        debug_assert_eq!(self.sample_rate, other.sample_rate);
        self.samples.extend_from_slice(&other.samples);
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_tracks_sample_count() {
        let buf = AudioBuffer::mono_16k(vec![0.0; 16_000]);
        assert!((buf.duration_secs() - 1.0).abs() < 1e-6);
        assert_eq!(buf.channels(), 1);
    }

    #[test]
    fn extend_concatenates_in_order() {
        let mut a = AudioBuffer::mono_16k(vec![0.1, 0.2]);
        let b = AudioBuffer::mono_16k(vec![0.3]);
        a.extend_from(&b);
        assert_eq!(a.samples(), &[0.1, 0.2, 0.3]);
    }
}
