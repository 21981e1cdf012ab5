//! Token vocabulary table and tokenizer
//!
//! An immutable, bijective mapping between dense 0-based token ids and text
//! units, loaded once from a packaged JSON artifact and shared read-only
//! (via `Arc`) across pipelines. The reserved pad, end-of-sequence, and
//! unknown ids are three distinct entries: unknown input maps to the unknown
//! id, never to pad or EOS, and pad/EOS are excluded from emitted text.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use novavox_foundation::VocabError;

/// Granularity of the vocabulary's text units. Selects the join separator
/// used by `decode`: none for character-level, a single space for word-level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenLevel {
    Char,
    Word,
}

impl TokenLevel {
    fn separator(&self) -> &'static str {
        match self {
            TokenLevel::Char => "",
            TokenLevel::Word => " ",
        }
    }
}

/// On-disk artifact layout (HF-style unit map plus reserved ids).
#[derive(Debug, Deserialize)]
struct VocabFile {
    units: HashMap<String, u32>,
    pad: u32,
    eos: u32,
    unk: u32,
    level: TokenLevel,
}

/// Immutable id↔unit table. Construct once, share via [`Vocabulary::shared`].
#[derive(Debug)]
pub struct Vocabulary {
    id_to_unit: Vec<String>,
    unit_to_id: HashMap<String, u32>,
    pad: u32,
    eos: u32,
    unk: u32,
    level: TokenLevel,
}

impl Vocabulary {
    /// Load and validate a vocabulary from a JSON artifact.
    pub fn from_path(path: &Path) -> Result<Self, VocabError> {
        if !path.is_file() {
            return Err(VocabError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let raw = std::fs::read_to_string(path)?;
        let file: VocabFile =
            serde_json::from_str(&raw).map_err(|e| VocabError::Malformed(e.to_string()))?;
        let vocab = Self::from_parts(file.units, file.pad, file.eos, file.unk, file.level)?;
        tracing::info!(
            path = %path.display(),
            size = vocab.len(),
            level = ?vocab.level,
            "vocabulary loaded"
        );
        Ok(vocab)
    }

    /// Build a table from its parts, validating the table invariants:
    /// dense 0-based ids, bijective over the domain, reserved ids present
    /// and mutually distinct.
    pub fn from_parts(
        units: HashMap<String, u32>,
        pad: u32,
        eos: u32,
        unk: u32,
        level: TokenLevel,
    ) -> Result<Self, VocabError> {
        let size = units.len() as u32;
        let mut id_to_unit = vec![None::<String>; units.len()];
        for (unit, id) in &units {
            if *id >= size {
                return Err(VocabError::Malformed(format!(
                    "id {id} for unit {unit:?} is outside the dense range 0..{size}"
                )));
            }
            let slot = &mut id_to_unit[*id as usize];
            if let Some(existing) = slot {
                return Err(VocabError::Malformed(format!(
                    "id {id} is assigned to both {existing:?} and {unit:?}"
                )));
            }
            *slot = Some(unit.clone());
        }
        // Dense + no duplicates above means every slot is filled.
        let id_to_unit: Vec<String> = id_to_unit.into_iter().map(Option::unwrap).collect();

        for (name, id) in [("pad", pad), ("eos", eos), ("unk", unk)] {
            if id >= size {
                return Err(VocabError::Malformed(format!(
                    "reserved {name} id {id} is outside the vocabulary"
                )));
            }
        }
        if pad == eos || pad == unk || eos == unk {
            return Err(VocabError::Malformed(format!(
                "reserved ids must be distinct (pad={pad}, eos={eos}, unk={unk})"
            )));
        }

        Ok(Self {
            id_to_unit,
            unit_to_id: units,
            pad,
            eos,
            unk,
            level,
        })
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn len(&self) -> usize {
        self.id_to_unit.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_unit.is_empty()
    }

    pub fn pad_id(&self) -> u32 {
        self.pad
    }

    pub fn eos_id(&self) -> u32 {
        self.eos
    }

    pub fn unk_id(&self) -> u32 {
        self.unk
    }

    pub fn level(&self) -> TokenLevel {
        self.level
    }

    /// Encode text into token ids. Unknown units map to the reserved unknown
    /// id; they are never dropped and never conflated with pad/EOS.
    pub fn encode(&self, text: &str) -> Vec<u32> {
        match self.level {
            TokenLevel::Char => text
                .chars()
                .map(|c| self.lookup(c.encode_utf8(&mut [0u8; 4])))
                .collect(),
            TokenLevel::Word => text.split_whitespace().map(|w| self.lookup(w)).collect(),
        }
    }

    fn lookup(&self, unit: &str) -> u32 {
        self.unit_to_id.get(unit).copied().unwrap_or(self.unk)
    }

    /// Decode token ids into text: stop at the first EOS, skip pad, join the
    /// remaining units with the level-appropriate separator. An id outside
    /// the table is a vocab/model mismatch and is reported as an error.
    pub fn decode(&self, ids: &[u32]) -> Result<String, VocabError> {
        let mut units = Vec::new();
        for &id in ids {
            if id == self.eos {
                break;
            }
            if id == self.pad {
                continue;
            }
            let unit = self
                .id_to_unit
                .get(id as usize)
                .ok_or(VocabError::UnknownId(id))?;
            units.push(unit.as_str());
        }
        Ok(units.join(self.level.separator()))
    }
}
