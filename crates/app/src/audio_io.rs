//! File-boundary audio I/O
//!
//! The pipeline's wire format is raw little-endian PCM16, mono, 16 kHz. For
//! convenience the CLI also reads and writes WAV containers (via `hound`),
//! converting to/from the raw wire format at this boundary.

use std::path::Path;

use anyhow::{bail, Context, Result};

use novavox_audio::SAMPLE_RATE_HZ;

fn is_wav(path: &Path) -> bool {
    path.extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("wav"))
}

/// Read audio as raw PCM16 wire bytes. `.wav` inputs must already be mono,
/// 16-bit, 16 kHz; anything else is raw PCM read verbatim.
pub fn read_pcm(path: &Path) -> Result<Vec<u8>> {
    if !is_wav(path) {
        return std::fs::read(path).with_context(|| format!("reading {}", path.display()));
    }

    let mut reader =
        hound::WavReader::open(path).with_context(|| format!("opening {}", path.display()))?;
    let spec = reader.spec();
    if spec.channels != 1 || spec.sample_rate != SAMPLE_RATE_HZ || spec.bits_per_sample != 16 {
        bail!(
            "{}: expected mono 16-bit {} Hz WAV, got {} ch / {}-bit / {} Hz",
            path.display(),
            SAMPLE_RATE_HZ,
            spec.channels,
            spec.bits_per_sample,
            spec.sample_rate
        );
    }

    let mut bytes = Vec::new();
    for sample in reader.samples::<i16>() {
        bytes.extend_from_slice(&sample?.to_le_bytes());
    }
    Ok(bytes)
}

/// Write raw PCM16 wire bytes, as a WAV container when the path ends in
/// `.wav` and verbatim otherwise.
pub fn write_pcm(path: &Path, pcm: &[u8]) -> Result<()> {
    if !is_wav(path) {
        return std::fs::write(path, pcm).with_context(|| format!("writing {}", path.display()));
    }

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE_HZ,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer =
        hound::WavWriter::create(path, spec).with_context(|| format!("creating {}", path.display()))?;
    for pair in pcm.chunks_exact(2) {
        writer.write_sample(i16::from_le_bytes([pair[0], pair[1]]))?;
    }
    writer.finalize()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_pcm_round_trips_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audio.pcm");
        let pcm = vec![1u8, 2, 3, 4];
        write_pcm(&path, &pcm).unwrap();
        assert_eq!(read_pcm(&path).unwrap(), pcm);
    }

    #[test]
    fn wav_round_trips_through_container() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audio.wav");
        let pcm: Vec<u8> = [100i16, -200, 0, i16::MAX]
            .iter()
            .flat_map(|s| s.to_le_bytes())
            .collect();
        write_pcm(&path, &pcm).unwrap();
        assert_eq!(read_pcm(&path).unwrap(), pcm);
    }
}
