//! Temporal interpolation between adjacent stages.
//!
//! Locates the bounding stage pair for a continuous time cursor and derives
//! the blended scalar quantities everything downstream consumes. An arrest
//! perturbation clamps the bounding indices here, so all downstream blending
//! (counts, ratios, day) stops advancing past the arrest stage.

use crate::perturbation::EffectSet;
use crate::stage::StageTable;
use crate::math::lerp;

/// Blended view of the stage table at one time cursor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageBlend {
    /// Lower bounding stage index (post arrest clamp).
    pub i0: usize,
    /// Upper bounding stage index (post arrest clamp); equals `i0` at the
    /// table end.
    pub i1: usize,
    /// Blend factor within the bounding pair, in [0, 1].
    pub alpha: f32,
    /// Blended developmental day.
    pub day: f32,
    /// Blended trophectoderm fraction.
    pub te_ratio: f32,
    /// Blended inner-cell-mass fraction.
    pub icm_ratio: f32,
    /// True inside a genuine size-transition window: `alpha` in (0.2, 0.8)
    /// and the bounding stages differ in cell count.
    pub is_dividing: bool,
}

/// Blend the table at cursor `t`. Returns `None` for an empty table.
pub fn blend(stages: &StageTable, t: f32, effects: &EffectSet) -> Option<StageBlend> {
    if stages.is_empty() {
        return None;
    }
    let t = if t.is_finite() {
        t.clamp(0.0, stages.max_cursor())
    } else {
        0.0
    };

    let mut i0 = t.floor() as usize;
    let mut i1 = (i0 + 1).min(stages.len() - 1);
    let alpha = (t - i0 as f32).clamp(0.0, 1.0);

    if effects.arrest {
        // Development halts at the first stage reaching the threshold count.
        // If no stage reaches it, the full table is used.
        if let Some(limit) = stages.arrest_index() {
            i0 = i0.min(limit);
            i1 = i1.min(limit);
        }
    }

    let s0 = stages.get(i0)?;
    let s1 = stages.get(i1)?;

    Some(StageBlend {
        i0,
        i1,
        alpha,
        day: lerp(s0.day, s1.day, alpha),
        te_ratio: lerp(s0.fraction("TE"), s1.fraction("TE"), alpha),
        icm_ratio: lerp(s0.fraction("ICM"), s1.fraction("ICM"), alpha),
        is_dividing: alpha > 0.2 && alpha < 0.8 && s0.cell_count != s1.cell_count,
    })
}
