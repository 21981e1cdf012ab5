//! Core identifiers shared across the workspace

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The three model kinds hosted by the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// Speech-to-text transcription model
    Stt,
    /// Large language model for text generation
    Llm,
    /// Text-to-speech synthesis model
    Tts,
}

impl ModelKind {
    pub const ALL: [ModelKind; 3] = [ModelKind::Stt, ModelKind::Llm, ModelKind::Tts];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Stt => "stt",
            ModelKind::Llm => "llm",
            ModelKind::Tts => "tts",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stt" => Ok(ModelKind::Stt),
            "llm" => Ok(ModelKind::Llm),
            "tts" => Ok(ModelKind::Tts),
            other => Err(format!("unknown model kind: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_str() {
        for kind in ModelKind::ALL {
            assert_eq!(kind.as_str().parse::<ModelKind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!("vad".parse::<ModelKind>().is_err());
    }
}
