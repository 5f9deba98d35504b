//! Shared scalar helpers and deterministic point sets.
//!
//! Everything here is a pure function. The sine hash is the single source of
//! pseudo-randomness in the whole pipeline: reproducibility across
//! re-evaluations requires a seeded hash, never a stateful generator.

use glam::Vec3;

/// Guard against division by zero-length vectors.
pub const EPSILON: f32 = 1e-6;

/// Linear interpolation between `a` and `b`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Hermite smoothstep: 0 below `edge0`, 1 above `edge1`, cubic ease between.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Deterministic pseudo-random value in [0, 1) from an integer seed.
///
/// The classic shader sine hash, `frac(sin(i * 12.9898) * 43758.5453)`.
/// Call sites offset the seed (e.g. `hash01(i + 37)`) to draw independent
/// channels for the same cell index.
#[inline]
pub fn hash01(seed: i32) -> f32 {
    let s = (seed as f32 * 12.9898).sin() * 43758.5453;
    s - s.floor()
}

/// Low-discrepancy spherical point set (golden-angle Fibonacci spiral).
///
/// Returns `n` points on a sphere of the given radius. A single point
/// degenerates to the origin so a lone cell sits centered.
pub fn fibonacci_sphere(n: usize, radius: f32) -> Vec<Vec3> {
    if n <= 1 {
        return vec![Vec3::ZERO];
    }
    let offset = 2.0 / n as f32;
    let increment = std::f32::consts::PI * (3.0 - 5.0_f32.sqrt());
    (0..n)
        .map(|i| {
            let y = i as f32 * offset - 1.0 + offset / 2.0;
            let r = (1.0 - y * y).max(0.0).sqrt();
            let phi = i as f32 * increment;
            Vec3::new(phi.cos() * r, y, phi.sin() * r) * radius
        })
        .collect()
}

/// Unit direction from two hash channels: uniform azimuth, arccos-uniform
/// polar angle.
#[inline]
pub fn hashed_unit_dir(azimuth_h: f32, polar_h: f32) -> Vec3 {
    let theta = azimuth_h * std::f32::consts::TAU;
    let u = polar_h * 2.0 - 1.0;
    let phi = u.clamp(-1.0, 1.0).acos();
    Vec3::new(
        phi.sin() * theta.cos(),
        phi.sin() * theta.sin(),
        phi.cos(),
    )
}
