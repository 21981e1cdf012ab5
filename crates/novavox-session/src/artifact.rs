//! Owned model artifact
//!
//! The artifact holds the raw model bytes read from disk, validated against
//! the per-kind format signature. Exactly one session owns an artifact at a
//! time; dropping it (on unload or session teardown) releases the memory, so
//! no stale handle can outlive its session.

use std::path::{Path, PathBuf};

use novavox_foundation::{LoadError, ModelKind};

const GGUF_MAGIC: &[u8; 4] = b"GGUF";
// ONNX payloads open with the ir_version varint field (tag 0x08).
const ONNX_LEAD_BYTE: u8 = 0x08;
const MIN_ARTIFACT_LEN: usize = 8;

/// Validated, exclusively-owned model payload.
#[derive(Debug)]
pub struct ModelArtifact {
    kind: ModelKind,
    path: PathBuf,
    bytes: Vec<u8>,
}

impl ModelArtifact {
    /// Read and validate a model artifact from disk.
    ///
    /// Fails with `NotFound` when the path does not resolve to a file and
    /// `Decode` when the payload fails its format signature check.
    pub fn read(path: &Path, kind: ModelKind) -> Result<Self, LoadError> {
        if !path.is_file() {
            return Err(LoadError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let bytes = std::fs::read(path)?;
        validate_signature(kind, &bytes)?;
        tracing::debug!(
            kind = %kind,
            path = %path.display(),
            size = bytes.len(),
            "model artifact read"
        );
        Ok(Self {
            kind,
            path: path.to_path_buf(),
            bytes,
        })
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub fn source_path(&self) -> &Path {
        &self.path
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl Drop for ModelArtifact {
    fn drop(&mut self) {
        tracing::debug!(kind = %self.kind, path = %self.path.display(), "model artifact released");
    }
}

fn validate_signature(kind: ModelKind, bytes: &[u8]) -> Result<(), LoadError> {
    if bytes.len() < MIN_ARTIFACT_LEN {
        return Err(LoadError::Decode(format!(
            "artifact too short ({} bytes)",
            bytes.len()
        )));
    }
    match kind {
        ModelKind::Llm => {
            if &bytes[..4] != GGUF_MAGIC {
                return Err(LoadError::Decode("missing GGUF magic".to_string()));
            }
        }
        ModelKind::Stt | ModelKind::Tts => {
            if bytes[0] != ONNX_LEAD_BYTE {
                return Err(LoadError::Decode(
                    "payload does not start with an ONNX ir_version field".to_string(),
                ));
            }
        }
    }
    Ok(())
}
