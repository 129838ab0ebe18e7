//! Iterative pairwise relaxation: the canonical batch layout family.
//!
//! One round visits every unordered pair; pairs closer than
//! `radius_i + radius_j + margin` are pushed apart symmetrically along the
//! line connecting their centers, then reclamped to the viewport. Rounds
//! repeat until one produces no movement or the round budget runs out.
//! The loop is fully deterministic: pair order follows input order and the
//! zero-distance fallback direction is fixed.

use std::collections::BTreeMap;

use crate::chart::{self, Bubble, Disc, LayoutResult, LayoutStats, Point, Viewport};
use crate::error::Result;
use crate::geom::{Pos2, pos2, vec2};

use super::{RelaxationOptions, residual_overlap, target};

/// Distances below this count as coincident centers.
const COINCIDENT_EPSILON: f64 = 1e-9;

/// Overlap below this does not trigger a push; keeps the loop from chasing
/// floating-point dust forever.
const SETTLE_EPSILON: f64 = 1e-3;

pub fn layout(bubbles: &[Bubble], viewport: Viewport, opts: &RelaxationOptions) -> Result<LayoutResult> {
    chart::validate(bubbles)?;
    if bubbles.is_empty() {
        return Ok(LayoutResult::empty());
    }

    let viewport = viewport.normalized();
    let discs = chart::sanitize(bubbles);
    let mut positions = initial_positions(&discs, viewport, opts.lane_jitter);

    let max_rounds = opts.max_rounds.max(1);
    let mut rounds = 0;
    let mut converged = false;
    while rounds < max_rounds {
        rounds += 1;
        if !relax_round(&mut positions, &discs, opts.margin, viewport) {
            converged = true;
            break;
        }
    }

    let residual = residual_overlap(&positions, &discs, opts.margin);
    tracing::debug!(rounds, converged, residual, "relaxation settled");

    let mut out = BTreeMap::new();
    for (b, p) in bubbles.iter().zip(&positions) {
        out.insert(b.id.clone(), Point::from_pos(*p));
    }
    Ok(LayoutResult {
        positions: out,
        stats: LayoutStats {
            rounds,
            converged,
            residual_overlap: residual,
        },
    })
}

fn initial_positions(discs: &[Disc], viewport: Viewport, lane_jitter: f64) -> Vec<Pos2> {
    discs
        .iter()
        .map(|d| pos2(target::lane_x(d, viewport, lane_jitter), target::risk_y(d, viewport)))
        .collect()
}

/// One relaxation round. Returns whether any bubble moved.
fn relax_round(positions: &mut [Pos2], discs: &[Disc], margin: f64, viewport: Viewport) -> bool {
    let mut moved = false;
    for i in 0..positions.len() {
        for j in (i + 1)..positions.len() {
            let min_dist = discs[i].radius + discs[j].radius + margin;
            let delta = positions[j] - positions[i];
            let dist = delta.length();
            if dist >= min_dist - SETTLE_EPSILON {
                continue;
            }

            // Coincident centers get a fixed outward direction (angle 0) so
            // the push is deterministic and never NaN.
            let dir = if dist > COINCIDENT_EPSILON {
                delta / dist
            } else {
                vec2(1.0, 0.0)
            };

            let shift = (min_dist - dist) / 2.0;
            positions[i] = chart::clamp_to_viewport(positions[i] - dir * shift, discs[i].radius, viewport);
            positions[j] = chart::clamp_to_viewport(positions[j] + dir * shift, discs[j].radius, viewport);
            moved = true;
        }
    }
    moved
}
