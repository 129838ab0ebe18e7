#![forbid(unsafe_code)]

//! Headless bubble chart layout algorithms.
//!
//! `flotsam` places labeled circles ("bubbles") on a rectangular viewport so
//! that vertical position encodes a risk percentage while no two circles
//! overlap. It is runtime-agnostic: batch layouts run to completion
//! synchronously, animated layouts are advanced one tick at a time by the
//! host (see [`pass::LayoutDriver`]).

pub mod algo;
pub mod chart;
pub mod error;
pub mod geom;
pub mod pass;

pub use algo::{Algorithm, ForceOptions, RelaxationOptions, Simulation, Tick};
pub use chart::{Bubble, LayoutResult, LayoutStats, Point, Viewport};
pub use error::{Error, Result};
pub use pass::{LayoutDriver, PassState, Snapshot};

/// Headless layout entry point.
pub fn layout(bubbles: &[Bubble], viewport: Viewport, algorithm: &Algorithm) -> Result<LayoutResult> {
    match algorithm {
        Algorithm::Relaxation(opts) => algo::relax::layout(bubbles, viewport, opts),
        Algorithm::Force(opts) => algo::force::layout(bubbles, viewport, opts),
    }
}
