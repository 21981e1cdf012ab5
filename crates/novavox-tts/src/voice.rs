//! Voice presets and speaker embeddings
//!
//! Two named presets with fixed-dimension embedding vectors. Unrecognized
//! voice names fall back to the default preset rather than erroring.

/// Dimension of the model's speaker embedding input.
pub const SPEAKER_EMBEDDING_DIM: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Voice {
    #[default]
    Female,
    Male,
}

impl Voice {
    /// Resolve a voice by name; unknown names select the default preset.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "male" => Voice::Male,
            "female" => Voice::Female,
            other => {
                tracing::debug!(voice = other, "unknown voice name, using default preset");
                Voice::default()
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Voice::Female => "female",
            Voice::Male => "male",
        }
    }

    /// Pre-computed speaker embedding for this preset.
    pub fn speaker_embedding(&self) -> Vec<f32> {
        match self {
            Voice::Female => vec![0.0; SPEAKER_EMBEDDING_DIM],
            Voice::Male => vec![0.5; SPEAKER_EMBEDDING_DIM],
        }
    }
}
