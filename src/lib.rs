//! # Embryoviz: Procedural Early-Embryo Layout Engine
//!
//! Embryoviz turns a small set of hand-authored developmental stages (cell
//! count, lineage ratios, day index) into a continuously scrubbable 3D
//! arrangement of cells. Given a time cursor between two adjacent stages and
//! a set of active perturbation toggles, it deterministically computes the
//! position, orientation, anisotropic scale and nucleus geometry of every
//! cell, then resolves overlaps and boundary violations by iterative
//! geometric relaxation.
//!
//! ## Architecture Overview
//!
//! The pipeline is a pure function evaluated from scratch per frame:
//!
//! ```text
//! StageTable + PerturbationRegistry + cursor t
//!     → blend      (bounding stage pair, blended day/ratios)
//!     → partition  (integer per-lineage counts, cell radius, cavity)
//!     → placement  (cleavage path ≤ 4 cells, per-lineage path above)
//!     → relax      (overlap + shape constraints)
//!     → motion     (wall-clock jitter, layered on top)
//!     → EmbryoFrame
//! ```
//!
//! ### Inputs ([`stage`], [`perturbation`])
//!
//! - [`stage::StageTable`] — ordered, immutable stage list, loaded once from
//!   JSON and sanitized.
//! - [`perturbation::PerturbationRegistry`] — named interventions classified
//!   into a typed effect model ([`perturbation::Effect`]); the active id set
//!   folds into one [`perturbation::EffectSet`] per evaluation.
//!
//! ### Pipeline ([`embryo`])
//!
//! - [`embryo::blend`] — temporal interpolation, arrest clamping.
//! - [`embryo::partition`] — exact integer lineage buckets, blast indicator,
//!   cavity radius.
//! - [`embryo::placement`] / [`embryo::cleavage`] — deterministic placement;
//!   explicit state machines animate the 1→2 and 2→4 divisions.
//! - [`embryo::relax`] — pairwise overlap resolution plus wall, shell,
//!   cavity, compaction and clustering constraints.
//! - [`embryo::motion`] — the sole impure step: per-cell sinusoidal jitter
//!   driven by the caller's wall clock.
//!
//! **Key design**: all pseudo-randomness comes from a seeded sine hash
//! ([`math::hash01`]) of the cell index, so re-evaluating with identical
//! inputs yields an identical cell list. No cell carries state between
//! evaluations.
//!
//! ## Getting Started
//!
//! ```no_run
//! use embryoviz::embryo::EmbryoModel;
//! use embryoviz::perturbation::PerturbationRegistry;
//! use embryoviz::stage::StageTable;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let stages = StageTable::from_path("data/stages.json")?;
//! let registry = PerturbationRegistry::from_path("data/perturbations.json")?;
//! let model = EmbryoModel::new(stages, registry);
//!
//! let frame = model.evaluate(3.4, &["glycolysis_impair"]);
//! for cell in &frame.cells {
//!     // hand position / scale / orientation / nuclei to the renderer,
//!     // grouped by cell.lineage
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Rendering, UI, playback scheduling and URL state are external
//! collaborators: the output contract is just the [`embryo::EmbryoFrame`]
//! cell list plus the default cell radius and embryo radius.
//!
//! ## Dependencies
//!
//! - **Math**: `glam` (SIMD vector/quaternion types)
//! - **Data**: `serde` + `serde_json` (stage/perturbation files)
//! - **Errors**: `thiserror` (loading surface only; evaluation never fails)
//! - **Logging**: `log` (sanitization warnings; no logger installed here)

pub mod embryo;
pub mod math;
pub mod perturbation;
pub mod stage;
