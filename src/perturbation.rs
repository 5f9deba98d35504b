//! Perturbation registry and the typed effect model.
//!
//! Perturbations are named simulated interventions carrying numeric effect
//! parameters. Rather than string-matching ids throughout the pipeline, each
//! registry entry is classified once into [`Effect`] variants that name the
//! pipeline phase they touch; evaluation consumes the folded [`EffectSet`].

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Count multiplier applied when a division-rate perturbation carries no
/// explicit `divisionRateFactor`.
pub const DEFAULT_DIVISION_RATE_FACTOR: f32 = 0.7;
/// Cavity multiplier applied when a cavity-size perturbation carries no
/// explicit `blastocoelSizeFactor`.
pub const DEFAULT_CAVITY_SIZE_FACTOR: f32 = 0.8;
/// Cell radius shrink implied by a cavity-size effect without an explicit
/// `cellSizeFactor`.
pub const DEFAULT_CELL_SHRINK_FACTOR: f32 = 0.9;

#[derive(Error, Debug)]
pub enum PerturbationLoadError {
    #[error("failed to read perturbation registry: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse perturbation registry: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A named experimental intervention, immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Perturbation {
    pub label: String,
    #[serde(default)]
    pub description: String,
    /// Raw effect-name → value map as authored in the data file.
    #[serde(default)]
    pub effects: HashMap<String, f32>,
}

/// One pipeline behavior a perturbation declares.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    /// Halt development at the first stage reaching four cells.
    Arrest,
    /// Multiply the interpolated cell count.
    DivisionRate(f32),
    /// Multiply the blastocoel cavity radius.
    CavitySize(f32),
    /// Multiply the base cell radius.
    CellSize(f32),
}

impl Perturbation {
    /// Classify this entry's behaviors from its effect keys and id pattern.
    ///
    /// Recognized keys: `divisionRateFactor`, `blastocoelSizeFactor`,
    /// `cellSizeFactor`. Ids containing `arrest` or `inhibit` declare an
    /// arrest; ids containing `impair` with no recognized keys fall back to
    /// the documented division-rate and cavity-size defaults.
    pub fn behaviors(&self, id: &str) -> Vec<Effect> {
        let id_lower = id.to_ascii_lowercase();
        let mut out = Vec::new();

        if id_lower.contains("arrest") || id_lower.contains("inhibit") {
            out.push(Effect::Arrest);
        }

        let division = self.effects.get("divisionRateFactor").copied();
        let cavity = self.effects.get("blastocoelSizeFactor").copied();
        let cell = self.effects.get("cellSizeFactor").copied();

        if let Some(f) = division {
            out.push(Effect::DivisionRate(f));
        }
        if let Some(f) = cavity {
            out.push(Effect::CavitySize(f));
        }
        if let Some(f) = cell {
            out.push(Effect::CellSize(f));
        } else if cavity.is_some() {
            out.push(Effect::CellSize(DEFAULT_CELL_SHRINK_FACTOR));
        }

        // Metabolic-impairment ids with no authored parameters still slow
        // division and shrink the cavity, at default strength.
        if division.is_none() && cavity.is_none() && id_lower.contains("impair") {
            out.push(Effect::DivisionRate(DEFAULT_DIVISION_RATE_FACTOR));
            out.push(Effect::CavitySize(DEFAULT_CAVITY_SIZE_FACTOR));
            out.push(Effect::CellSize(DEFAULT_CELL_SHRINK_FACTOR));
        }

        out
    }
}

/// The folded influence of every active perturbation on one evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EffectSet {
    pub arrest: bool,
    pub division_rate: Option<f32>,
    pub cavity_size: Option<f32>,
    pub cell_size: Option<f32>,
}

impl EffectSet {
    fn apply(&mut self, effect: Effect) {
        // Multiple active factors of the same kind compose multiplicatively.
        match effect {
            Effect::Arrest => self.arrest = true,
            Effect::DivisionRate(f) => {
                self.division_rate = Some(self.division_rate.unwrap_or(1.0) * f)
            }
            Effect::CavitySize(f) => {
                self.cavity_size = Some(self.cavity_size.unwrap_or(1.0) * f)
            }
            Effect::CellSize(f) => self.cell_size = Some(self.cell_size.unwrap_or(1.0) * f),
        }
    }
}

/// Mapping of perturbation id → definition, immutable once loaded.
#[derive(Debug, Clone, Default)]
pub struct PerturbationRegistry {
    entries: HashMap<String, Perturbation>,
}

impl PerturbationRegistry {
    pub fn new(entries: HashMap<String, Perturbation>) -> Self {
        Self { entries }
    }

    /// Parse the JSON object format the app ships
    /// (`{"id": {label, description, effects}, ...}`).
    pub fn from_json(json: &str) -> Result<Self, PerturbationLoadError> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// Load a registry from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PerturbationLoadError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn get(&self, id: &str) -> Option<&Perturbation> {
        self.entries.get(id)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Fold the active id set into one [`EffectSet`].
    ///
    /// Ids missing from the registry are ignored; an empty or unknown set
    /// resolves to the default (inert) effect set.
    pub fn resolve<S: AsRef<str>>(&self, active: &[S]) -> EffectSet {
        let mut set = EffectSet::default();
        for id in active {
            let id = id.as_ref();
            let Some(perturbation) = self.entries.get(id) else {
                log::debug!("ignoring unknown perturbation id {id:?}");
                continue;
            };
            for effect in perturbation.behaviors(id) {
                set.apply(effect);
            }
        }
        set
    }
}
