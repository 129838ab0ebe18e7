//! Layout algorithm families and their options.

pub mod force;
pub mod relax;
pub(crate) mod rng;
pub(crate) mod target;

pub use force::{Simulation, Tick};

use crate::chart::Disc;
use crate::geom::Pos2;

/// Which layout family to run.
#[derive(Debug, Clone)]
pub enum Algorithm {
    /// Deterministic batch relaxation (the canonical family).
    Relaxation(RelaxationOptions),
    /// Tick-driven force simulation (the animated family).
    Force(ForceOptions),
}

impl Default for Algorithm {
    fn default() -> Self {
        Self::Relaxation(RelaxationOptions::default())
    }
}

#[derive(Debug, Clone)]
pub struct RelaxationOptions {
    /// Extra gap enforced between bubble edges beyond radius contact.
    pub margin: f64,
    /// Upper bound on relaxation rounds. Termination is mandatory even with
    /// residual overlap, so this is a hard cap, not a target.
    pub max_rounds: usize,
    /// Amplitude of the deterministic lane jitter applied to x targets so
    /// same-risk bubbles never start coincident.
    pub lane_jitter: f64,
}

impl Default for RelaxationOptions {
    fn default() -> Self {
        Self {
            margin: 5.0,
            max_rounds: 15,
            lane_jitter: 12.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ForceOptions {
    /// Seed for deterministic randomness. Initial x placement is the only
    /// randomized input, so a fixed seed reproduces a layout exactly.
    pub random_seed: u64,
    /// Extra gap enforced between bubble edges beyond radius contact.
    pub margin: f64,
    /// Hard tick budget; the simulation reports `converged: false` when it
    /// runs out before coming to rest.
    pub max_ticks: usize,
    /// Fraction of velocity carried from one tick to the next.
    pub velocity_decay: f64,
    /// Per-tick decay of the overall activity coefficient; drives settlement.
    pub alpha_decay: f64,
    /// Activity floor below which the simulation counts as at rest.
    pub alpha_min: f64,
    /// Weight of the pull of y toward its risk target. Kept below 1.0 so the
    /// settling motion stays visible instead of snapping.
    pub target_strength: f64,
    /// Weak pull of x toward the horizontal center of the viewport.
    pub center_strength: f64,
    /// Constant outward push applied between bubbles closer than
    /// `repulsion_range` (edge to edge). Independent of distance inside the
    /// cutoff, zero beyond it.
    pub repulsion: f64,
    pub repulsion_range: f64,
}

impl Default for ForceOptions {
    fn default() -> Self {
        Self {
            random_seed: 0,
            margin: 5.0,
            max_ticks: 300,
            velocity_decay: 0.6,
            alpha_decay: 0.025,
            alpha_min: 0.001,
            target_strength: 0.5,
            center_strength: 0.03,
            repulsion: 1.5,
            repulsion_range: 60.0,
        }
    }
}

/// Largest remaining pairwise overlap beyond the configured margin, in
/// pixels. Zero means every pair is separated.
pub(crate) fn residual_overlap(positions: &[Pos2], discs: &[Disc], margin: f64) -> f64 {
    let mut worst = 0.0f64;
    for i in 0..positions.len() {
        for j in (i + 1)..positions.len() {
            let min_dist = discs[i].radius + discs[j].radius + margin;
            let dist = (positions[j] - positions[i]).length();
            worst = worst.max(min_dist - dist);
        }
    }
    worst.max(0.0)
}
