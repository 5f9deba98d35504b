//! The embryo layout pipeline.
//!
//! [`EmbryoModel`] bundles the immutable inputs (stage table, perturbation
//! registry, layout configuration) and exposes the evaluation entry points.
//! [`evaluate`](EmbryoModel::evaluate) is a pure function of its arguments:
//! identical inputs always yield an identical [`EmbryoFrame`]. The wall-clock
//! jitter is layered on top by
//! [`evaluate_animated`](EmbryoModel::evaluate_animated).
//!
//! Pipeline order: blend → partition → placement (cleavage path below five
//! cells, per-lineage path above) → relaxation → motion overlay.

pub mod blend;
pub mod cell;
pub mod cleavage;
pub mod config;
pub mod motion;
pub mod partition;
pub mod placement;
pub mod relax;

pub use cell::{Cell, Lineage, Nucleus};
pub use config::LayoutConfig;

use crate::perturbation::PerturbationRegistry;
use crate::stage::StageTable;

/// Cell radius reported for an empty stage table.
pub const FALLBACK_CELL_RADIUS: f32 = 0.2;

/// Result of one evaluation, sufficient for a renderer to draw every cell and
/// nucleus, grouped and colored by lineage, inside an optional zona shell.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbryoFrame {
    /// Cells in stable emission order (TE, then ICM, then undetermined).
    pub cells: Vec<Cell>,
    /// Default isotropic cell radius for cells without an explicit scale.
    pub cell_radius: f32,
    /// Outer boundary radius.
    pub embryo_radius: f32,
    /// Cavity exclusion radius (blastocoel).
    pub cavity_radius: f32,
    /// Blended developmental day.
    pub day: f32,
    /// Blastocyst-onset indicator in [0, 1].
    pub blast: f32,
    /// Partitioned total cell count.
    pub cell_count: u32,
    /// True inside a stage-to-stage size transition window.
    pub is_dividing: bool,
    /// True while the scripted first cleavage owns the layout.
    pub scripted_division: bool,
}

impl EmbryoFrame {
    fn empty(config: &LayoutConfig) -> Self {
        Self {
            cells: Vec::new(),
            cell_radius: FALLBACK_CELL_RADIUS,
            embryo_radius: config.embryo_radius,
            cavity_radius: 0.0,
            day: 0.0,
            blast: 0.0,
            cell_count: 0,
            is_dividing: false,
            scripted_division: false,
        }
    }
}

/// Immutable evaluation inputs plus configuration.
#[derive(Debug, Clone)]
pub struct EmbryoModel {
    stages: StageTable,
    registry: PerturbationRegistry,
    config: LayoutConfig,
}

impl EmbryoModel {
    pub fn new(stages: StageTable, registry: PerturbationRegistry) -> Self {
        Self::with_config(stages, registry, LayoutConfig::default())
    }

    pub fn with_config(
        stages: StageTable,
        registry: PerturbationRegistry,
        config: LayoutConfig,
    ) -> Self {
        Self {
            stages,
            registry,
            config,
        }
    }

    pub fn stages(&self) -> &StageTable {
        &self.stages
    }

    pub fn registry(&self) -> &PerturbationRegistry {
        &self.registry
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Evaluate the layout at time cursor `t` with the given active
    /// perturbation ids.
    ///
    /// Pure: no wall-clock term, no state carried between calls. An empty
    /// stage table yields an empty frame rather than an error.
    pub fn evaluate<S: AsRef<str>>(&self, t: f32, active: &[S]) -> EmbryoFrame {
        let effects = self.registry.resolve(active);
        let Some(blended) = blend::blend(&self.stages, t, &effects) else {
            return EmbryoFrame::empty(&self.config);
        };
        let part = partition::partition(&self.stages, &blended, &effects, &self.config);

        // The cleavage path is authoritative for four cells and fewer; the
        // generic per-lineage placement is never computed there.
        let (mut cells, cell_radius, scripted) =
            match cleavage::cleavage_layout(&self.stages, &blended, &part, &self.config) {
                Some(layout) => (layout.cells, layout.cell_radius, layout.scripted),
                None => (
                    placement::place_lineages(&part, &blended, &self.config),
                    part.cell_radius,
                    false,
                ),
            };

        if !scripted {
            relax::relax(
                &mut cells,
                cell_radius,
                &part,
                &blended,
                effects.arrest,
                &self.config,
            );
        }

        EmbryoFrame {
            cells,
            cell_radius,
            embryo_radius: self.config.embryo_radius,
            cavity_radius: part.cavity_radius,
            day: blended.day,
            blast: part.blast,
            cell_count: part.count,
            is_dividing: blended.is_dividing,
            scripted_division: scripted,
        }
    }

    /// Evaluate and layer the motion overlay on top.
    ///
    /// `clock_seconds` is the caller's wall-clock reading; two calls with
    /// identical arguments (including the clock) yield identical frames.
    pub fn evaluate_animated<S: AsRef<str>>(
        &self,
        t: f32,
        active: &[S],
        clock_seconds: f32,
    ) -> EmbryoFrame {
        let mut frame = self.evaluate(t, active);
        motion::apply_motion(
            &mut frame.cells,
            frame.cell_radius,
            frame.cell_count,
            frame.day,
            frame.is_dividing,
            frame.scripted_division,
            clock_seconds,
            &self.config,
        );
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn human_stages() -> StageTable {
        StageTable::from_json(
            r#"[
                {"id": "zygote", "day": 0, "cellCount": 1},
                {"id": "2-cell", "day": 1, "cellCount": 2},
                {"id": "4-cell", "day": 2, "cellCount": 4},
                {"id": "8-cell", "day": 2.5, "cellCount": 8},
                {"id": "morula", "day": 3.5, "cellCount": 16},
                {"id": "early-blastocyst", "day": 4.5, "cellCount": 32,
                 "lineages": {"TE": 0.6, "ICM": 0.25}},
                {"id": "blastocyst", "day": 5, "cellCount": 64,
                 "lineages": {"TE": 0.65, "ICM": 0.3}}
            ]"#,
        )
        .unwrap()
    }

    fn registry() -> PerturbationRegistry {
        PerturbationRegistry::from_json(
            r#"{
                "AURKA_inhibit": {
                    "label": "AURKA inhibition",
                    "description": "Spindle assembly block; embryo arrests",
                    "effects": {}
                },
                "glycolysis_impair": {
                    "label": "Glycolysis impairment",
                    "description": "Slower divisions, smaller blastocoel",
                    "effects": {"divisionRateFactor": 0.5, "blastocoelSizeFactor": 0.8}
                }
            }"#,
        )
        .unwrap()
    }

    fn model() -> EmbryoModel {
        EmbryoModel::new(human_stages(), registry())
    }

    const NONE: &[&str] = &[];

    #[test]
    fn empty_table_yields_empty_frame() {
        let model = EmbryoModel::new(StageTable::default(), registry());
        let frame = model.evaluate(2.0, NONE);
        assert!(frame.cells.is_empty());
        assert_eq!(frame.cell_radius, FALLBACK_CELL_RADIUS);
        assert_eq!(frame.embryo_radius, 1.0);
    }

    #[test]
    fn cell_list_length_matches_partition_outside_divisions() {
        let model = model();
        let mut t = 0.0;
        while t <= 6.0 {
            let frame = model.evaluate(t, NONE);
            if !frame.is_dividing && !frame.scripted_division {
                assert_eq!(
                    frame.cells.len(),
                    frame.cell_count as usize,
                    "cell list length mismatch at t = {t}"
                );
            }
            t += 0.1;
        }
    }

    #[test]
    fn all_cells_stay_inside_the_embryo() {
        let model = model();
        let mut t = 0.0;
        while t <= 6.0 {
            let frame = model.evaluate(t, NONE);
            for cell in &frame.cells {
                assert!(
                    cell.position.length() <= frame.embryo_radius + 1e-4,
                    "cell escaped at t = {t}: {:?}",
                    cell.position
                );
                assert!(cell.position.is_finite());
            }
            t += 0.07;
        }
    }

    #[test]
    fn evaluation_is_deterministic() {
        let model = model();
        for t in [0.0, 0.5, 1.3, 3.7, 5.5, 6.0] {
            assert_eq!(model.evaluate(t, NONE), model.evaluate(t, NONE));
            assert_eq!(
                model.evaluate_animated(t, NONE, 12.0),
                model.evaluate_animated(t, NONE, 12.0)
            );
        }
    }

    #[test]
    fn arrest_caps_the_count_at_the_four_cell_stage() {
        let model = model();
        let active = ["AURKA_inhibit"];
        let mut t = 2.0;
        while t <= 6.0 {
            let frame = model.evaluate(t, &active);
            assert!(
                frame.cell_count <= 4,
                "count {} exceeds arrest ceiling at t = {t}",
                frame.cell_count
            );
            t += 0.25;
        }
    }

    #[test]
    fn division_rate_halves_the_eight_cell_stage() {
        let model = model();
        let frame = model.evaluate(3.0, &["glycolysis_impair"]);
        assert_eq!(frame.cell_count, 4);
    }

    #[test]
    fn fresh_zygote_shows_two_pronuclei() {
        let frame = model().evaluate(0.0, NONE);
        assert_eq!(frame.cells.len(), 1);
        assert_eq!(frame.cells[0].position, glam::Vec3::ZERO);
        assert_eq!(frame.cells[0].nuclei.len(), 2);
    }

    #[test]
    fn mid_first_cleavage_shows_two_overlapping_cells() {
        let frame = model().evaluate(0.5, NONE);
        assert!(frame.scripted_division);
        assert_eq!(frame.cells.len(), 2);
        let separation = frame.cells[0].position.distance(frame.cells[1].position);
        assert!(separation > 0.0);
        assert!(separation < 2.0 * frame.cell_radius, "daughters must overlap");
    }

    #[test]
    fn blastocyst_has_cavity_and_te_shell() {
        let frame = model().evaluate(6.0, NONE);
        assert!(frame.day >= 5.0);
        assert!(frame.cavity_radius > 0.0);
        let te_min = frame.embryo_radius - 2.2 * frame.cell_radius;
        let te_cells: Vec<_> = frame
            .cells
            .iter()
            .filter(|c| c.lineage == Lineage::Te)
            .collect();
        assert!(!te_cells.is_empty());
        for cell in te_cells {
            assert!(
                cell.position.length() >= te_min - 1e-4,
                "TE cell at {} inside the shell band",
                cell.position.length()
            );
        }
    }

    #[test]
    fn motion_overlay_preserves_the_pure_frame() {
        let model = model();
        let pure = model.evaluate(3.0, NONE);
        let animated = model.evaluate_animated(3.0, NONE, 9.0);
        assert_eq!(pure.cell_count, animated.cell_count);
        assert_eq!(pure.cells.len(), animated.cells.len());
        // Jitter moves positions but never exceeds a few percent of a cell
        // radius.
        let bound = pure.cell_radius * model.config().jitter_amplitude * 3.0_f32.sqrt();
        for (p, a) in pure.cells.iter().zip(&animated.cells) {
            assert!(p.position.distance(a.position) <= bound + 1e-5);
            assert_eq!(p.nuclei, a.nuclei);
        }
    }

    #[test]
    fn glycolysis_shrinks_cavity_and_cells() {
        let model = model();
        let plain = model.evaluate(6.0, NONE);
        let impaired = model.evaluate(6.0, &["glycolysis_impair"]);
        assert!(impaired.cavity_radius < plain.cavity_radius);
        assert_relative_eq!(
            impaired.cavity_radius,
            plain.cavity_radius * 0.8,
            epsilon = 1e-5
        );
    }
}
