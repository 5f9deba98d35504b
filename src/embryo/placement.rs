//! Generic per-lineage placement for counts above the cleavage range.
//!
//! Each lineage bucket gets its own deterministic algorithm: trophectoderm on
//! a near-outer Fibonacci shell, inner cell mass hash-sampled around a fixed
//! pole, undetermined cells in one of three day-dependent regimes. Hash seed
//! offsets pick independent channels per cell index; they must stay stable or
//! the layout changes under users' cursors.

use glam::Vec3;

use crate::embryo::blend::StageBlend;
use crate::embryo::cell::{Cell, Lineage};
use crate::embryo::config::LayoutConfig;
use crate::embryo::partition::LineagePartition;
use crate::math::{fibonacci_sphere, hash01, hashed_unit_dir, lerp, EPSILON};

/// Center of the inner-cell-mass cluster: on the configured pole, just
/// outside the cavity surface but safely inside the trophectoderm shell.
pub fn icm_center(part: &LineagePartition, config: &LayoutConfig) -> Vec3 {
    let radial = (part.cavity_radius + part.cell_radius)
        .max(config.embryo_radius - 3.0 * part.cell_radius);
    config.icm_pole_dir() * radial
}

/// Place every lineage bucket. Cells are emitted TE first, then ICM, then
/// undetermined, so indices (and therefore hash channels) are stable.
pub fn place_lineages(
    part: &LineagePartition,
    blend: &StageBlend,
    config: &LayoutConfig,
) -> Vec<Cell> {
    let r = config.embryo_radius;
    let scl = part.cell_radius;
    let mut cells = Vec::with_capacity(part.count as usize);

    // Trophectoderm on a near-outer shell.
    if part.te > 0 {
        for p in fibonacci_sphere(part.te as usize, r - scl * 0.1) {
            cells.push(Cell::round(p, Lineage::Te, 0.08 * scl));
        }
    }

    // Inner cell mass: hash-sampled cluster around the pole, clamped back
    // inside the shell.
    let center = icm_center(part, config);
    let cluster_radius = lerp(0.10, 0.14, part.blast) * r;
    let max_icm = r - scl * 1.6;
    for i in 0..part.icm as i32 {
        let rr = cluster_radius * (hash01(i) * 0.999).cbrt();
        let dir = hashed_unit_dir(hash01(i + 13), hash01(i + 37));
        let mut pos = center + dir * rr;
        let len = pos.length();
        if len > max_icm {
            pos *= max_icm / (len + EPSILON);
        }
        cells.push(Cell::round(pos, Lineage::Icm, 0.09 * scl));
    }

    // Undetermined: loose shell before compaction, volume fill through the
    // morula window, surface shell afterwards.
    if part.undetermined > 0 {
        if blend.day < 3.0 && part.count > 4 {
            let shell = fibonacci_sphere(part.undetermined as usize, r - scl * 0.15);
            for (i, p) in shell.into_iter().enumerate() {
                let jitter = (hash01(i as i32 + 501) * 0.4 + 0.1) * scl;
                let len = p.length().max(EPSILON);
                let pos = p * (1.0 - jitter / len);
                cells.push(Cell::round(pos, Lineage::Undetermined, 0.09 * scl));
            }
        } else if blend.day < 4.2 {
            for i in 0..part.undetermined as i32 {
                let rr = 0.95 * hash01(i + 101).cbrt();
                let dir = hashed_unit_dir(hash01(i + 211), hash01(i + 307));
                let pos = dir * rr * (r - scl * 0.2);
                cells.push(Cell::round(pos, Lineage::Undetermined, 0.08 * scl));
            }
        } else {
            for p in fibonacci_sphere(part.undetermined as usize, r - scl * 0.25) {
                cells.push(Cell::round(p, Lineage::Undetermined, 0.08 * scl));
            }
        }
    }

    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn part(count: u32, te: u32, icm: u32, blast: f32) -> LineagePartition {
        LineagePartition {
            count,
            te,
            icm,
            undetermined: count - te - icm,
            cell_radius: 0.2,
            blast,
            cavity_radius: 0.18 + 0.47 * blast,
        }
    }

    fn blend_at(day: f32) -> StageBlend {
        StageBlend {
            i0: 0,
            i1: 1,
            alpha: 0.0,
            day,
            te_ratio: 0.0,
            icm_ratio: 0.0,
            is_dividing: false,
        }
    }

    #[test]
    fn emits_one_cell_per_bucket_entry() {
        let config = LayoutConfig::default();
        let cells = place_lineages(&part(32, 20, 8, 1.0), &blend_at(5.0), &config);
        assert_eq!(cells.len(), 32);
        assert_eq!(cells.iter().filter(|c| c.lineage == Lineage::Te).count(), 20);
        assert_eq!(cells.iter().filter(|c| c.lineage == Lineage::Icm).count(), 8);
    }

    #[test]
    fn te_cells_sit_on_the_outer_shell() {
        let config = LayoutConfig::default();
        let p = part(32, 20, 8, 1.0);
        let cells = place_lineages(&p, &blend_at(5.0), &config);
        let expected = config.embryo_radius - p.cell_radius * 0.1;
        for cell in cells.iter().filter(|c| c.lineage == Lineage::Te) {
            assert_relative_eq!(cell.position.length(), expected, epsilon = 1e-4);
        }
    }

    #[test]
    fn icm_cells_cluster_near_the_pole() {
        let config = LayoutConfig::default();
        let p = part(32, 20, 8, 1.0);
        let center = icm_center(&p, &config);
        let cluster_radius = lerp(0.10, 0.14, p.blast) * config.embryo_radius;
        let cells = place_lineages(&p, &blend_at(5.0), &config);
        let max_icm = config.embryo_radius - p.cell_radius * 1.6;
        for cell in cells.iter().filter(|c| c.lineage == Lineage::Icm) {
            assert!(cell.position.length() <= max_icm + 1e-4);
            // Unclamped samples stay within the cluster sphere.
            if cell.position.length() < max_icm - 1e-4 {
                assert!(cell.position.distance(center) <= cluster_radius + 1e-4);
            }
        }
    }

    #[test]
    fn early_cleavage_shell_is_jittered_inward() {
        let config = LayoutConfig::default();
        let p = part(8, 0, 0, 0.0);
        let cells = place_lineages(&p, &blend_at(2.5), &config);
        let shell = config.embryo_radius - p.cell_radius * 0.15;
        for cell in &cells {
            let len = cell.position.length();
            assert!(len < shell, "expected inward jitter, got len {len}");
            assert!(len > shell - 0.5 * p.cell_radius - 1e-4);
        }
    }

    #[test]
    fn morula_fills_the_volume() {
        let config = LayoutConfig::default();
        let p = part(16, 0, 0, 0.0);
        let cells = place_lineages(&p, &blend_at(3.5), &config);
        let bound = config.embryo_radius - p.cell_radius * 0.2;
        assert!(cells.iter().all(|c| c.position.length() <= bound + 1e-4));
        // Volume fill should reach well inside, unlike a shell.
        assert!(cells.iter().any(|c| c.position.length() < 0.7 * bound));
    }

    #[test]
    fn placement_is_deterministic() {
        let config = LayoutConfig::default();
        let p = part(32, 20, 8, 1.0);
        let a = place_lineages(&p, &blend_at(5.0), &config);
        let b = place_lineages(&p, &blend_at(5.0), &config);
        assert_eq!(a, b);
    }
}
