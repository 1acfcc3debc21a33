//! Run fingerprinting: deterministic identifiers for datasets and runs.
//!
//! - `DatasetHash`: BLAKE3 over an aligned panel (axes, fields, cell bits).
//! - `RunId`: BLAKE3 over the canonical JSON of a run configuration.

use crate::data::Panel;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Content hash of an aligned panel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetHash(pub String);

impl DatasetHash {
    /// Hash every date, instrument, field and cell in axis order.
    ///
    /// A missing cell hashes differently from any number, so "no value"
    /// never collides with a real zero.
    pub fn of_panel(panel: &Panel) -> Self {
        let mut hasher = blake3::Hasher::new();
        for date in panel.dates() {
            hasher.update(date.to_string().as_bytes());
            hasher.update(b"\n");
        }
        for inst in panel.instruments() {
            hasher.update(inst.as_bytes());
            hasher.update(b"\n");
        }
        for field in panel.fields() {
            hasher.update(field.as_bytes());
            hasher.update(b"\n");
            for di in 0..panel.dates().len() {
                for ii in 0..panel.instruments().len() {
                    match panel.value_at(field, di, ii) {
                        Some(v) => {
                            hasher.update(&[1]);
                            hasher.update(&v.to_bits().to_le_bytes());
                        }
                        None => {
                            hasher.update(&[0]);
                        }
                    }
                }
            }
        }
        Self(hasher.finalize().to_hex().to_string())
    }

    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(12)]
    }
}

impl fmt::Display for DatasetHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Deterministic run identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub String);

impl RunId {
    /// BLAKE3 of the canonical JSON form of `config`, truncated to 16 hex chars.
    ///
    /// Struct fields serialize in declaration order and maps should be
    /// `BTreeMap`s, so equal configs always produce equal ids.
    pub fn of_config<T: Serialize>(config: &T) -> Result<Self, serde_json::Error> {
        let json = serde_json::to_string(config)?;
        let hash = blake3::hash(json.as_bytes()).to_hex();
        Ok(Self(hash[..16].to_string()))
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
