//! Target position mapping: risk drives the vertical axis, the horizontal
//! axis spreads same-risk bubbles apart before collision resolution runs.
//!
//! Both functions are pure given `(disc, viewport, seed)`.

use crate::chart::{Disc, Viewport, clamp_axis};

use super::rng::SeededRng;

/// Golden-ratio conjugate; equidistributes the per-rank fan offset.
const FAN: f64 = 0.618_034;

/// `y` target: risk 0 sits at the bottom edge, risk 100 at the top, clamped
/// so the circle never leaves the viewport.
pub(crate) fn risk_y(disc: &Disc, viewport: Viewport) -> f64 {
    let y = viewport.height - (disc.risk / 100.0) * viewport.height;
    clamp_axis(y, disc.radius, viewport.height)
}

/// Deterministic `x` target for the batch family: derived from risk, pushed
/// into one of three lanes by volume rank, with a golden-ratio fan inside the
/// lane. Two bubbles with equal risk always receive distinct targets.
pub(crate) fn lane_x(disc: &Disc, viewport: Viewport, jitter: f64) -> f64 {
    let span = (viewport.width - 2.0 * disc.radius).max(0.0);
    let base = disc.radius + (disc.risk / 100.0) * span;
    let lane = (disc.volume_rank % 3) as f64 - 1.0;
    let fan = ((disc.volume_rank as f64) * FAN).fract() - 0.5;
    clamp_axis(base + (lane + fan) * jitter, disc.radius, viewport.width)
}

/// Seeded `x` target for the force family: uniform across the usable width.
pub(crate) fn seeded_x(disc: &Disc, viewport: Viewport, rng: &mut SeededRng) -> f64 {
    let lo = disc.radius;
    let hi = viewport.width - disc.radius;
    if hi <= lo {
        return viewport.width / 2.0;
    }
    rng.next_in(lo, hi)
}
