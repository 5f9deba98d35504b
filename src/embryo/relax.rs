//! Iterative geometric relaxation.
//!
//! Resolves pairwise overlaps symmetrically, then projects each cell onto the
//! shape constraints: outer wall, trophectoderm shell adherence, cavity
//! exclusion, morula compaction and ICM clustering. Cell counts stay small
//! (tens, not thousands), so the pair loop is a plain O(n²) sweep over
//! unordered pairs, kept in index order for determinism.

#[cfg(test)]
use glam::Vec3;

use crate::embryo::blend::StageBlend;
use crate::embryo::cell::{Cell, Lineage};
use crate::embryo::config::LayoutConfig;
use crate::embryo::partition::LineagePartition;
use crate::embryo::placement::icm_center;
use crate::math::{smoothstep, EPSILON};

/// Iteration count for this evaluation: fewest under arrest, most during the
/// crowded cleavage window.
pub fn iteration_count(day: f32, arrested: bool, config: &LayoutConfig) -> u32 {
    if arrested {
        config.arrest_iterations
    } else if day < 4.0 {
        config.cleavage_iterations
    } else {
        config.settled_iterations
    }
}

/// Relax the cell list in place.
///
/// `cell_radius` is the effective default radius for cells without an
/// anisotropic scale. Callers skip this entirely while the scripted 1→2
/// division owns the layout.
pub fn relax(
    cells: &mut [Cell],
    cell_radius: f32,
    part: &LineagePartition,
    blend: &StageBlend,
    arrested: bool,
    config: &LayoutConfig,
) {
    let r = config.embryo_radius;
    let max_radius = r - cell_radius * config.wall_margin;
    let cluster_center = icm_center(part, config);
    let compaction = smoothstep(2.8, 4.0, blend.day);

    for _ in 0..iteration_count(blend.day, arrested, config) {
        // Pairwise overlap resolution: push both cells apart symmetrically
        // along the separation direction by half the deficit each.
        for i in 0..cells.len() {
            for j in (i + 1)..cells.len() {
                let delta = cells[j].position - cells[i].position;
                let distance = delta.length() + EPSILON;
                let min_distance = (cells[i].mean_radius(cell_radius)
                    + cells[j].mean_radius(cell_radius))
                    * config.overlap_slack;
                if distance < min_distance {
                    let push = (min_distance - distance) * 0.5;
                    let dir = delta / distance;
                    cells[i].position -= dir * push;
                    cells[j].position += dir * push;
                }
            }
        }

        // Per-cell constraint projection.
        for cell in cells.iter_mut() {
            let len = cell.position.length();

            // Outer wall (zona interior).
            if len > max_radius {
                cell.position *= max_radius / (len + EPSILON);
            }

            // Trophectoderm adheres to the shell once the blastocyst forms.
            if part.blast > 0.2 && cell.lineage == Lineage::Te {
                let te_min = r - 2.2 * cell_radius;
                let len = cell.position.length();
                if len < te_min {
                    cell.position *= te_min / (len + EPSILON);
                }
            }

            // Keep the blastocoel cavity empty once it exists.
            if part.blast > 0.05 {
                let cavity_min = part.cavity_radius + cell_radius * 0.9;
                let len = cell.position.length();
                if len < cavity_min {
                    cell.position *= cavity_min / (len + EPSILON);
                }
            }

            // Morula compaction draws undetermined cells inward.
            if cell.lineage == Lineage::Undetermined && compaction > 0.0 {
                cell.position *= 1.0 - 0.02 * compaction;
            }

            // Blastocyst ICM clusters around its pole without drifting into
            // the embryo center.
            if blend.day >= 4.6 && cell.lineage == Lineage::Icm {
                cell.position += (cluster_center - cell.position) * 0.04;
                let min_shell = r * 0.45;
                let len = cell.position.length();
                if len < min_shell {
                    cell.position *= min_shell / (len + EPSILON);
                }
            }
        }
    }
}
