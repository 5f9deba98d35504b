//! Integer per-lineage cell counts and derived sizing.
//!
//! Converts the blended totals into integer buckets that always sum exactly
//! to the total, and derives the base cell radius, blast indicator and cavity
//! radius used by placement and relaxation.

use crate::embryo::blend::StageBlend;
use crate::embryo::config::LayoutConfig;
use crate::math::{lerp, smoothstep};
use crate::perturbation::EffectSet;
use crate::stage::StageTable;

/// Partitioned counts and sizing for one evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineagePartition {
    /// Total cell count after perturbation scaling, at least 1.
    pub count: u32,
    pub te: u32,
    pub icm: u32,
    pub undetermined: u32,
    /// Base cell radius; kept visually continuous as counts change by one.
    pub cell_radius: f32,
    /// Blastocyst-onset indicator, a smooth 0→1 ramp over day 4–5.
    pub blast: f32,
    /// Cavity exclusion radius.
    pub cavity_radius: f32,
}

/// Partition the blended state into per-lineage counts and sizing.
pub fn partition(
    stages: &StageTable,
    blend: &StageBlend,
    effects: &EffectSet,
    config: &LayoutConfig,
) -> LineagePartition {
    let c0 = stages
        .get(blend.i0)
        .map(|s| s.cell_count)
        .unwrap_or(1) as f32;
    let c1 = stages
        .get(blend.i1)
        .map(|s| s.cell_count)
        .unwrap_or(1) as f32;

    let mut count = lerp(c0, c1, blend.alpha).round().max(1.0) as u32;
    if let Some(factor) = effects.division_rate {
        count = ((count as f32 * factor).round().max(1.0)) as u32;
    }

    // Rounded buckets, with the undetermined bucket absorbing the remainder
    // so the three always sum exactly to `count`.
    let te = ((count as f32 * blend.te_ratio).round() as u32).min(count);
    let icm = ((count as f32 * blend.icm_ratio).round() as u32).min(count - te);
    let undetermined = count - te - icm;

    let mut cell_radius = (0.6 / (count as f32 + 0.25).cbrt())
        .clamp(config.min_cell_radius, config.max_cell_radius);
    if let Some(factor) = effects.cell_size {
        cell_radius *= factor;
    }

    let blast = smoothstep(4.0, 5.0, blend.day);
    let mut cavity_radius = config.embryo_radius * (config.cavity_base + config.cavity_gain * blast);
    if let Some(factor) = effects.cavity_size {
        cavity_radius *= factor;
    }

    LineagePartition {
        count,
        te,
        icm,
        undetermined,
        cell_radius,
        blast,
        cavity_radius,
    }
}
