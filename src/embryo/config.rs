//! Layout configuration.

use serde::{Deserialize, Serialize};

/// Tunables of the layout pipeline.
///
/// All values are deterministic and produce identical cell lists across runs.
/// Defaults reproduce the reference layout; distances are in embryo units
/// (the zona interior has radius [`embryo_radius`](Self::embryo_radius)).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Outer boundary radius constraining all cell centers.
    pub embryo_radius: f32,

    /// Lower clamp on the base cell radius.
    pub min_cell_radius: f32,

    /// Upper clamp on the base cell radius.
    pub max_cell_radius: f32,

    /// Cavity radius as a fraction of the embryo radius before blastocyst
    /// onset.
    pub cavity_base: f32,

    /// Additional cavity fraction gained as the blast indicator ramps to 1.
    pub cavity_gain: f32,

    /// Pairwise contact slack: cells are pushed apart below this fraction of
    /// their combined mean radii.
    pub overlap_slack: f32,

    /// Wall clamp margin in units of the cell radius.
    pub wall_margin: f32,

    /// Relaxation iterations during cleavage (blended day < 4).
    pub cleavage_iterations: u32,

    /// Relaxation iterations from blastocyst onward.
    pub settled_iterations: u32,

    /// Relaxation iterations under an arrest perturbation.
    pub arrest_iterations: u32,

    /// Motion overlay amplitude in units of the cell radius.
    pub jitter_amplitude: f32,

    /// Direction of the pole the inner cell mass clusters toward
    /// (normalized before use).
    pub icm_pole: [f32; 3],
}

impl LayoutConfig {
    /// ICM pole as a unit vector.
    pub fn icm_pole_dir(&self) -> glam::Vec3 {
        glam::Vec3::from(self.icm_pole).normalize_or_zero()
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            embryo_radius: 1.0,
            min_cell_radius: 0.18,
            max_cell_radius: 0.45,
            cavity_base: 0.18,
            cavity_gain: 0.47,
            overlap_slack: 0.98,
            wall_margin: 0.02,
            cleavage_iterations: 6,
            settled_iterations: 3,
            arrest_iterations: 2,
            jitter_amplitude: 0.025,
            icm_pole: [0.25, 0.9, 0.2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn pole_is_normalized() {
        let config = LayoutConfig::default();
        assert_relative_eq!(config.icm_pole_dir().length(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn default_round_trips_through_serde() {
        let config = LayoutConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: LayoutConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.embryo_radius, config.embryo_radius);
        assert_eq!(back.icm_pole, config.icm_pole);
    }
}
