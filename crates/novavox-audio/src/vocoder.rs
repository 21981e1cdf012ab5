//! Sinusoidal-bank vocoder
//!
//! Converts the mel intermediate into a waveform by additive synthesis: one
//! sinusoid per mel band at the band's center frequency, with its amplitude
//! tracking the (linearly interpolated) band energy over time. Deterministic,
//! no stochastic phase.
//!
//! The speed multiplier is this stage's contract, not the TTS inference
//! step's: output length is `frames * hop_length / speed`, and the frame
//! position advances `speed`× faster through the spectrogram.

use std::f32::consts::TAU;

use crate::buffer::AudioBuffer;
use crate::mel::MelSpectrogram;

/// Peak level the output is normalized down to when synthesis overshoots.
const PEAK_TARGET: f32 = 0.95;

#[derive(Debug, Clone, Copy)]
pub struct Vocoder {
    sample_rate: u32,
}

impl Default for Vocoder {
    fn default() -> Self {
        Self {
            sample_rate: crate::SAMPLE_RATE_HZ,
        }
    }
}

impl Vocoder {
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate }
    }

    /// Synthesize a waveform from a mel spectrogram.
    ///
    /// `speed` must be positive; a non-positive or non-finite value is
    /// treated as 1.0 (requests clamp before reaching this point).
    pub fn synthesize(&self, mel: &MelSpectrogram, speed: f32) -> AudioBuffer {
        let speed = if speed.is_finite() && speed > 0.0 {
            speed
        } else {
            tracing::warn!(speed, "invalid speed multiplier, using 1.0");
            1.0
        };

        let hop = mel.hop_length();
        let frames = mel.frames();
        if frames.is_empty() {
            return AudioBuffer::new(Vec::new(), self.sample_rate);
        }

        let total = (frames.len() * hop) as f32 / speed;
        let out_len = total.round() as usize;
        let n_mels = mel.n_mels();
        let omega = self.band_angular_steps(n_mels);

        let mut samples = vec![0.0f32; out_len];
        let mut peak = 0.0f32;
        for (n, out) in samples.iter_mut().enumerate() {
            // Position within the spectrogram, advancing speed x faster.
            let pos = n as f32 * speed / hop as f32;
            let lo = (pos.floor() as usize).min(frames.len() - 1);
            let hi = (lo + 1).min(frames.len() - 1);
            let frac = pos - lo as f32;

            let mut acc = 0.0f32;
            for k in 0..n_mels {
                let energy = frames[lo][k] + (frames[hi][k] - frames[lo][k]) * frac;
                if energy <= 0.0 {
                    continue;
                }
                let amplitude = energy / n_mels as f32;
                acc += amplitude * (omega[k] * n as f32).sin();
            }
            *out = acc;
            peak = peak.max(acc.abs());
        }

        if peak > PEAK_TARGET {
            let gain = PEAK_TARGET / peak;
            for s in &mut samples {
                *s *= gain;
            }
        }

        AudioBuffer::new(samples, self.sample_rate)
    }

    /// Per-band angular increment per sample, bands centered on the HTK mel
    /// scale between 0 and Nyquist.
    fn band_angular_steps(&self, n_mels: usize) -> Vec<f32> {
        let nyquist = self.sample_rate as f32 / 2.0;
        let mel_max = hz_to_mel(nyquist);
        (0..n_mels)
            .map(|k| {
                let center = mel_to_hz(mel_max * (k as f32 + 0.5) / n_mels as f32);
                TAU * center / self.sample_rate as f32
            })
            .collect()
    }
}

fn hz_to_mel(hz: f32) -> f32 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

fn mel_to_hz(mel: f32) -> f32 {
    700.0 * (10.0f32.powf(mel / 2595.0) - 1.0)
}
