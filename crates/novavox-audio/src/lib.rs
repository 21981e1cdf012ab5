//! Audio primitives for the NovaVox pipeline
//!
//! Covers the PCM16 wire codec, the normalized sample buffer, the mel
//! spectrogram intermediate produced by TTS inference, and the vocoder stage
//! that turns that intermediate into a waveform.

pub mod buffer;
pub mod codec;
pub mod mel;
pub mod vocoder;

pub use buffer::AudioBuffer;
pub use mel::MelSpectrogram;
pub use vocoder::Vocoder;

/// Fixed wire sample rate: mono 16 kHz throughout the pipeline.
pub const SAMPLE_RATE_HZ: u32 = 16_000;

/// Samples advanced per mel frame by the TTS model.
pub const HOP_LENGTH: usize = 256;

/// Mel bands produced by the STT front-end and the TTS model.
pub const N_MELS: usize = 80;
