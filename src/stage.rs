//! Authored developmental stages and the stage table.
//!
//! Stages are hand-authored snapshots (day, cell count, lineage fractions)
//! loaded once from JSON and never mutated afterwards. The table is kept
//! sorted by ascending day; all interpolation indexes into it by cursor.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Cell count at which an arrest perturbation halts development.
pub const ARREST_THRESHOLD_CELLS: u32 = 4;

#[derive(Error, Debug)]
pub enum StageLoadError {
    #[error("failed to read stage table: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse stage table: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One authored developmental snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    pub id: String,
    pub day: f32,
    pub cell_count: u32,
    /// Lineage-name → fraction in [0, 1]. Unspecified lineages are fraction 0.
    #[serde(default)]
    pub lineages: HashMap<String, f32>,
}

impl Stage {
    /// Fraction for a lineage name, 0 when absent.
    pub fn fraction(&self, lineage: &str) -> f32 {
        self.lineages.get(lineage).copied().unwrap_or(0.0)
    }
}

/// Ordered, immutable list of stages.
#[derive(Debug, Clone, Default)]
pub struct StageTable {
    stages: Vec<Stage>,
}

impl StageTable {
    /// Build a table from raw stages, sanitizing as needed.
    ///
    /// Input is sorted by ascending day, cell counts are floored at 1 and
    /// lineage fractions clamped to [0, 1]. Fixups are logged rather than
    /// reported as errors; evaluation must always have valid inputs.
    pub fn new(mut stages: Vec<Stage>) -> Self {
        if !stages.windows(2).all(|w| w[0].day <= w[1].day) {
            log::warn!("stage table was not sorted by day; sorting");
            stages.sort_by(|a, b| a.day.total_cmp(&b.day));
        }
        for stage in &mut stages {
            if stage.cell_count < 1 {
                log::warn!("stage {:?} has zero cell count; clamping to 1", stage.id);
                stage.cell_count = 1;
            }
            if !stage.day.is_finite() || stage.day < 0.0 {
                log::warn!("stage {:?} has invalid day {}; clamping to 0", stage.id, stage.day);
                stage.day = 0.0;
            }
            for (name, frac) in stage.lineages.iter_mut() {
                if !(0.0..=1.0).contains(frac) {
                    log::warn!(
                        "stage {:?} lineage {name} fraction {frac} out of [0,1]; clamping",
                        stage.id
                    );
                    *frac = frac.clamp(0.0, 1.0);
                }
            }
        }
        Self { stages }
    }

    /// Parse a table from the JSON array format the app ships
    /// (`[{id, day, cellCount, lineages?}, ...]`).
    pub fn from_json(json: &str) -> Result<Self, StageLoadError> {
        let stages: Vec<Stage> = serde_json::from_str(json)?;
        Ok(Self::new(stages))
    }

    /// Load a table from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, StageLoadError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Stage> {
        self.stages.get(index)
    }

    /// Largest valid time cursor, `len - 1` as a float (0 for a single stage).
    pub fn max_cursor(&self) -> f32 {
        self.stages.len().saturating_sub(1) as f32
    }

    /// Index of the first stage reaching the arrest threshold, if any.
    pub fn arrest_index(&self) -> Option<usize> {
        self.stages
            .iter()
            .position(|s| s.cell_count >= ARREST_THRESHOLD_CELLS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_json() -> &'static str {
        r#"[
            {"id": "zygote", "day": 0, "cellCount": 1},
            {"id": "2-cell", "day": 1, "cellCount": 2},
            {"id": "4-cell", "day": 2, "cellCount": 4},
            {"id": "blastocyst", "day": 5, "cellCount": 64,
             "lineages": {"TE": 0.65, "ICM": 0.3}}
        ]"#
    }

    #[test]
    fn parses_camel_case_json() {
        let table = StageTable::from_json(table_json()).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.get(2).unwrap().cell_count, 4);
        assert_eq!(table.get(3).unwrap().fraction("TE"), 0.65);
    }

    #[test]
    fn missing_lineage_is_zero() {
        let table = StageTable::from_json(table_json()).unwrap();
        assert_eq!(table.get(0).unwrap().fraction("TE"), 0.0);
        assert_eq!(table.get(3).unwrap().fraction("PE"), 0.0);
    }

    #[test]
    fn sorts_and_sanitizes() {
        let stages = vec![
            Stage {
                id: "late".into(),
                day: 3.0,
                cell_count: 0,
                lineages: HashMap::from([("TE".into(), 1.5)]),
            },
            Stage {
                id: "early".into(),
                day: 0.0,
                cell_count: 1,
                lineages: HashMap::new(),
            },
        ];
        let table = StageTable::new(stages);
        assert_eq!(table.get(0).unwrap().id, "early");
        assert_eq!(table.get(1).unwrap().cell_count, 1);
        assert_eq!(table.get(1).unwrap().fraction("TE"), 1.0);
    }

    #[test]
    fn arrest_index_finds_first_four_cell_stage() {
        let table = StageTable::from_json(table_json()).unwrap();
        assert_eq!(table.arrest_index(), Some(2));

        let small = StageTable::from_json(
            r#"[{"id": "zygote", "day": 0, "cellCount": 1},
                {"id": "2-cell", "day": 1, "cellCount": 2}]"#,
        )
        .unwrap();
        assert_eq!(small.arrest_index(), None);
    }

    #[test]
    fn max_cursor_matches_last_index() {
        let table = StageTable::from_json(table_json()).unwrap();
        assert_eq!(table.max_cursor(), 3.0);
        assert_eq!(StageTable::default().max_cursor(), 0.0);
    }
}
