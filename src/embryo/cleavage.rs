//! Explicit geometry for the 1–4 cell range.
//!
//! Below five cells the generic per-lineage placement produces nothing
//! useful, so this path is authoritative: fixed poses for the stable 1/2/3/4
//! cell arrangements, plus scripted state machines for the 1→2 and 2→4
//! divisions. The 1→2 animation suppresses relaxation and motion downstream
//! so the scripted trajectory is preserved.

use glam::{Quat, Vec3};

use crate::embryo::blend::StageBlend;
use crate::embryo::cell::{Cell, Lineage, Nucleus};
use crate::embryo::config::LayoutConfig;
use crate::embryo::partition::LineagePartition;
use crate::math::lerp;
use crate::stage::StageTable;

/// Resting two-cell radius as a fraction of the embryo radius. The 1→2
/// machine's end state matches this so the handoff to the stable layout is
/// continuous.
const TWO_CELL_RADIUS: f32 = 0.5 * 0.99;

/// Starting size of the two daughters as a fraction of the embryo radius.
/// Equal to the single-cell radius so size is continuous across the machine's
/// progress-0.15 boundary.
const DIVISION_START_SIZE: f32 = 0.98;

/// Output of the small-count path.
#[derive(Debug, Clone, PartialEq)]
pub struct CleavageLayout {
    pub cells: Vec<Cell>,
    /// Effective cell radius; overrides the partition's base radius.
    pub cell_radius: f32,
    /// True while the first-cleavage animation owns the layout; relaxation
    /// and motion must be skipped.
    pub scripted: bool,
}

/// Compute the authoritative small-count layout.
///
/// Returns `None` when the partitioned count exceeds 4; the generic placement
/// applies then.
pub fn cleavage_layout(
    stages: &StageTable,
    blend: &StageBlend,
    part: &LineagePartition,
    config: &LayoutConfig,
) -> Option<CleavageLayout> {
    if part.count > 4 {
        return None;
    }
    let s0 = stages.get(blend.i0)?;
    let s1 = stages.get(blend.i1)?;
    let r = config.embryo_radius;
    let alpha = blend.alpha;
    let count = part.count;

    if let Some(progress) = first_cleavage_progress(stages, blend, count) {
        return Some(first_cleavage(progress, r));
    }

    if blend.is_dividing && s0.cell_count == 2 && s1.cell_count == 4 {
        return Some(second_cleavage((alpha - 0.2) / 0.6, r));
    }

    let layout = match count {
        1 => zygote(alpha, r),
        2 => two_cell(r),
        3 => three_cell(r),
        _ => four_cell(r),
    };
    Some(layout)
}

/// Progress of the scripted 1→2 division, when it owns the layout.
///
/// Entered past the first tenth of a window whose bounding pair is the
/// 1-cell→2-cell transition (or any window late in a lone zygote that leads
/// somewhere), so the zygote's pronuclear animation stays visible at the
/// window start and the machine completes exactly at the window end. Also
/// entered early in a 2-cell window that follows the zygote, finishing the
/// separation. A degenerate pair at the table end (`i0 == i1`) is a stable
/// stage, never a division.
pub fn first_cleavage_progress(
    stages: &StageTable,
    blend: &StageBlend,
    count: u32,
) -> Option<f32> {
    let s0 = stages.get(blend.i0)?;
    let s1 = stages.get(blend.i1)?;
    let distinct_pair = blend.i0 != blend.i1;
    let alpha = blend.alpha;

    let pair_1_to_2 = s0.cell_count == 1 && s1.cell_count == 2;
    let late_zygote = distinct_pair && count == 1 && alpha > 0.1;
    let early_two = distinct_pair
        && count == 2
        && alpha < 0.9
        && s0.cell_count == 2
        && blend.i0 > 0
        && stages.get(blend.i0 - 1).map(|s| s.cell_count) == Some(1);

    let progress = if (pair_1_to_2 && alpha > 0.1) || late_zygote {
        (alpha - 0.1) / 0.9
    } else if early_two {
        0.5 + alpha * 0.5
    } else {
        return None;
    };
    Some(progress.clamp(0.0, 1.0))
}

/// Scripted 1→2 division.
///
/// Below progress 0.15 a single cell's nucleus splits in two; from 0.15 the
/// daughters separate as `sqrt(progress)` while shrinking toward the resting
/// two-cell size.
fn first_cleavage(progress: f32, r: f32) -> CleavageLayout {
    if progress < 0.15 {
        let radius = r * DIVISION_START_SIZE;
        let nucleus_sep = 0.02 * radius * (progress / 0.15);
        let nuclei = if progress > 0.05 {
            vec![
                Nucleus::new(Vec3::new(0.0, nucleus_sep, 0.0), 0.13 * radius),
                Nucleus::new(Vec3::new(0.0, -nucleus_sep, 0.0), 0.13 * radius),
            ]
        } else {
            vec![Nucleus::centered(0.15 * radius)]
        };
        let cell = Cell {
            position: Vec3::ZERO,
            lineage: Lineage::Undetermined,
            scale: Some(Vec3::new(
                radius * 1.02,
                radius * (1.0 + progress * 0.1),
                radius * 1.02,
            )),
            orientation: None,
            nuclei,
        };
        return CleavageLayout {
            cells: vec![cell],
            cell_radius: radius,
            scripted: true,
        };
    }

    let separation_progress = (progress - 0.15) / 0.85;
    let max_separation = r - r * TWO_CELL_RADIUS;
    let separation = max_separation * separation_progress.sqrt();
    let size = lerp(
        DIVISION_START_SIZE,
        TWO_CELL_RADIUS,
        separation_progress.powf(0.4),
    );
    let radius = r * size;

    let cells = [separation, -separation]
        .into_iter()
        .map(|offset| Cell {
            position: Vec3::new(0.0, offset, 0.0),
            lineage: Lineage::Undetermined,
            scale: Some(Vec3::new(radius * 1.05, radius * 1.15, radius * 1.05)),
            orientation: None,
            nuclei: vec![Nucleus::centered(0.13 * radius)],
        })
        .collect();

    CleavageLayout {
        cells,
        cell_radius: radius,
        scripted: true,
    }
}

/// Scripted 2→4 division: both cells split in the XY plane, the sibling pairs
/// separating linearly.
fn second_cleavage(progress: f32, r: f32) -> CleavageLayout {
    let progress = progress.clamp(0.0, 1.0);
    let separation = 0.3 * r * progress;
    let radius = r * 0.45;

    let mut cells = Vec::with_capacity(4);
    for y in [r * 0.3, -r * 0.3] {
        for x in [-separation, separation] {
            cells.push(Cell {
                position: Vec3::new(x, y, 0.0),
                lineage: Lineage::Undetermined,
                scale: Some(Vec3::new(radius * 1.04, radius * 1.15, radius * 1.04)),
                orientation: None,
                nuclei: vec![Nucleus::centered(0.12 * radius)],
            });
        }
    }

    CleavageLayout {
        cells,
        cell_radius: radius,
        scripted: false,
    }
}

/// Stable zygote: one cell filling the zona, nucleus geometry animating
/// through pronuclear approach, syngamy and a single fused nucleus.
fn zygote(alpha: f32, r: f32) -> CleavageLayout {
    let radius = r * DIVISION_START_SIZE;
    let nuclei = if alpha < 0.4 {
        // Two pronuclei drawing together.
        let separation = 0.15 * radius * (1.0 - alpha / 0.4);
        vec![
            Nucleus::new(Vec3::new(-separation, 0.0, 0.0), 0.12 * radius),
            Nucleus::new(Vec3::new(separation, 0.0, 0.0), 0.12 * radius),
        ]
    } else if alpha < 0.6 {
        // Syngamy: merging, slightly swelling.
        let merge = (alpha - 0.4) / 0.2;
        let separation = 0.03 * radius * (1.0 - merge);
        let size = 0.12 * radius * (1.0 + merge * 0.5);
        vec![
            Nucleus::new(Vec3::new(-separation, 0.0, 0.0), size),
            Nucleus::new(Vec3::new(separation, 0.0, 0.0), size),
        ]
    } else {
        vec![Nucleus::centered(0.15 * radius)]
    };

    let cell = Cell {
        position: Vec3::ZERO,
        lineage: Lineage::Undetermined,
        scale: Some(Vec3::new(radius * 1.02, radius, radius * 1.02)),
        orientation: None,
        nuclei,
    };
    CleavageLayout {
        cells: vec![cell],
        cell_radius: radius,
        scripted: false,
    }
}

/// Stable two-cell arrangement on the vertical axis.
fn two_cell(r: f32) -> CleavageLayout {
    let radius = r * TWO_CELL_RADIUS;
    let offset = r - radius;
    let cells = [offset, -offset]
        .into_iter()
        .map(|y| Cell {
            position: Vec3::new(0.0, y, 0.0),
            lineage: Lineage::Undetermined,
            scale: Some(Vec3::new(radius * 1.05, radius * 1.15, radius * 1.05)),
            orientation: None,
            nuclei: vec![Nucleus::centered(0.13 * radius)],
        })
        .collect();
    CleavageLayout {
        cells,
        cell_radius: radius,
        scripted: false,
    }
}

/// Three cells at 120 degrees in the equatorial plane.
fn three_cell(r: f32) -> CleavageLayout {
    let radius = r * 0.56;
    let offset = (r - radius) * 0.98;
    let half_sqrt3 = 3.0_f32.sqrt() / 2.0;
    let dirs = [
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(-0.5, 0.0, half_sqrt3),
        Vec3::new(-0.5, 0.0, -half_sqrt3),
    ];
    let cells = dirs
        .into_iter()
        .map(|dir| Cell {
            position: dir.normalize() * offset,
            lineage: Lineage::Undetermined,
            scale: Some(Vec3::new(radius * 1.06, radius, radius * 1.06)),
            orientation: None,
            nuclei: vec![Nucleus::centered(0.12 * radius)],
        })
        .collect();
    CleavageLayout {
        cells,
        cell_radius: radius,
        scripted: false,
    }
}

/// Four cells at tetrahedral directions, each elongated along its radial
/// direction.
fn four_cell(r: f32) -> CleavageLayout {
    let radius = r * 0.45;
    let offset = (r - radius) * 0.98;
    let dirs = [
        Vec3::new(1.0, 1.0, 1.0).normalize(),
        Vec3::new(-1.0, 1.0, -1.0).normalize(),
        Vec3::new(1.0, -1.0, -1.0).normalize(),
        Vec3::new(-1.0, -1.0, 1.0).normalize(),
    ];
    let cells = dirs
        .into_iter()
        .map(|dir| Cell {
            position: dir * offset,
            lineage: Lineage::Undetermined,
            scale: Some(Vec3::new(radius * 1.04, radius * 1.15, radius * 1.04)),
            orientation: Some(Quat::from_rotation_arc(Vec3::Y, dir)),
            nuclei: vec![Nucleus::centered(0.11 * radius)],
        })
        .collect();
    CleavageLayout {
        cells,
        cell_radius: radius,
        scripted: false,
    }
}
