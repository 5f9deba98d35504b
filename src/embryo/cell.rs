//! Cell records produced by one evaluation.
//!
//! Cells are transient: the full list is recomputed from scratch on every
//! evaluation and carries no identity between evaluations.

use glam::{Quat, Vec3};

/// Cell fate classes the layout distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lineage {
    /// Trophectoderm, the outer shell lineage.
    Te,
    /// Inner cell mass, clustered at one pole.
    Icm,
    /// Cells with no committed fate yet.
    Undetermined,
}

impl Lineage {
    pub const fn all() -> &'static [Lineage] {
        &[Lineage::Te, Lineage::Icm, Lineage::Undetermined]
    }

    /// Display name, matching the stage table's lineage keys.
    pub const fn name(&self) -> &'static str {
        match self {
            Lineage::Te => "TE",
            Lineage::Icm => "ICM",
            Lineage::Undetermined => "undetermined",
        }
    }
}

/// Nucleus sub-geometry, positioned relative to its cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nucleus {
    pub offset: Vec3,
    pub size: f32,
}

impl Nucleus {
    pub fn new(offset: Vec3, size: f32) -> Self {
        Self { offset, size }
    }

    /// Single centered nucleus.
    pub fn centered(size: f32) -> Self {
        Self::new(Vec3::ZERO, size)
    }
}

/// One cell pose: position, fate, optional anisotropic scale and orientation,
/// and nucleus sub-geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub position: Vec3,
    pub lineage: Lineage,
    /// Anisotropic scale in embryo units; `None` means the frame's default
    /// isotropic cell radius applies.
    pub scale: Option<Vec3>,
    /// Unit quaternion; `None` means identity.
    pub orientation: Option<Quat>,
    pub nuclei: Vec<Nucleus>,
}

impl Cell {
    /// Round cell with a single centered nucleus, the common case.
    pub fn round(position: Vec3, lineage: Lineage, nucleus_size: f32) -> Self {
        Self {
            position,
            lineage,
            scale: None,
            orientation: None,
            nuclei: vec![Nucleus::centered(nucleus_size)],
        }
    }

    /// Mean radius for overlap resolution: average of the anisotropic scale
    /// when present, else the supplied default radius.
    pub fn mean_radius(&self, default_radius: f32) -> f32 {
        match self.scale {
            Some(s) => (s.x + s.y + s.z) / 3.0,
            None => default_radius,
        }
    }
}
