//! Wall-clock motion overlay.
//!
//! Adds a small per-cell sinusoidal offset for visual liveliness. This is the
//! one impure input of the pipeline: everything else is a function of the
//! time cursor, while the jitter phase advances with real time. Frequency and
//! amplitude are hash-derived per cell index, so two evaluations at the same
//! clock reading produce identical offsets.

use glam::Vec3;

use crate::embryo::cell::Cell;
use crate::embryo::config::LayoutConfig;
use crate::math::hash01;

/// Amplitude scale by developmental stage: gentlest for two cells, full at
/// blastocyst.
fn amplitude_scale(count: u32, day: f32) -> f32 {
    if count == 2 {
        0.3
    } else if count <= 4 {
        0.5
    } else if day < 4.0 {
        0.7
    } else {
        1.0
    }
}

/// Apply the jitter in place.
///
/// Suppressed below two cells and during any division (count transition or
/// the scripted first cleavage) so the division animations stay crisp.
/// `clock_seconds` is the caller's wall-clock reading.
pub fn apply_motion(
    cells: &mut [Cell],
    cell_radius: f32,
    count: u32,
    day: f32,
    is_dividing: bool,
    scripted_division: bool,
    clock_seconds: f32,
    config: &LayoutConfig,
) {
    if count < 2 || is_dividing || scripted_division {
        return;
    }
    let stage_scale = amplitude_scale(count, day);

    for (i, cell) in cells.iter_mut().enumerate() {
        let i = i as i32;
        let freq = 0.3 + 0.4 * hash01(i + 999);
        let amplitude =
            cell_radius * config.jitter_amplitude * stage_scale * (0.5 + 0.5 * hash01(i + 777));
        let fi = i as f32;
        cell.position += Vec3::new(
            (clock_seconds * freq + fi * 1.7).sin(),
            (clock_seconds * freq * 1.3 + fi * 2.1).sin(),
            (clock_seconds * freq * 0.9 + fi * 1.3).sin(),
        ) * amplitude;
    }
}
