//! Input and output model for bubble layouts.

use std::collections::BTreeMap;

use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::geom::Pos2;

/// Smallest usable viewport side. Degenerate dimensions are clamped here
/// instead of rejected so a resize-to-zero never aborts a layout.
pub(crate) const MIN_VIEWPORT_SIDE: f64 = 1.0;

/// Smallest usable bubble radius. Non-positive and non-finite radii are
/// clamped here instead of rejected.
pub(crate) const MIN_RADIUS: f64 = 0.5;

/// A circle to place: one tracked asset.
#[derive(Debug, Clone, PartialEq)]
pub struct Bubble {
    pub id: String,
    /// Risk percentage. Values outside `[0, 100]` (and non-finite values) are
    /// clamped during layout rather than rejected.
    pub risk: f64,
    pub radius: f64,
    /// Position in the volume-descending ordering of the data set; used as a
    /// stable tie-break and jitter key.
    pub volume_rank: usize,
}

impl Bubble {
    pub fn new(id: impl Into<String>, risk: f64, radius: f64, volume_rank: usize) -> Self {
        Self {
            id: id.into(),
            risk,
            radius,
            volume_rank,
        }
    }
}

/// The drawable area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Clamps degenerate dimensions to the minimum usable size.
    pub(crate) fn normalized(self) -> Self {
        let clamp = |side: f64| {
            if side.is_finite() {
                side.max(MIN_VIEWPORT_SIDE)
            } else {
                MIN_VIEWPORT_SIDE
            }
        };
        Self {
            width: clamp(self.width),
            height: clamp(self.height),
        }
    }
}

/// A settled (or per-tick) position, anchored at the circle center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub(crate) fn from_pos(p: Pos2) -> Self {
        Self { x: p.x, y: p.y }
    }
}

/// How settlement was reached.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LayoutStats {
    /// Relaxation rounds or simulation ticks executed.
    pub rounds: usize,
    /// False when the iteration budget ran out before the layout came to
    /// rest. Residual overlap with `converged: false` is a normal end state,
    /// not a fault.
    pub converged: bool,
    /// Largest remaining pairwise overlap in pixels (0.0 once separated).
    pub residual_overlap: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LayoutResult {
    pub positions: BTreeMap<String, Point>,
    pub stats: LayoutStats,
}

impl LayoutResult {
    pub(crate) fn empty() -> Self {
        Self {
            positions: BTreeMap::new(),
            stats: LayoutStats {
                rounds: 0,
                converged: true,
                residual_overlap: 0.0,
            },
        }
    }
}

/// Per-pass working copy of one bubble, with risk and radius normalized.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Disc {
    pub risk: f64,
    pub radius: f64,
    pub volume_rank: usize,
}

/// The only structural input check. Everything else (risk range, radius sign,
/// viewport size) is clamped, not rejected.
pub(crate) fn validate(bubbles: &[Bubble]) -> Result<()> {
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    for b in bubbles {
        if !seen.insert(b.id.as_str()) {
            return Err(Error::DuplicateId { id: b.id.clone() });
        }
    }
    Ok(())
}

pub(crate) fn sanitize(bubbles: &[Bubble]) -> Vec<Disc> {
    bubbles
        .iter()
        .map(|b| {
            let risk = if b.risk.is_finite() {
                b.risk.clamp(0.0, 100.0)
            } else {
                0.0
            };
            let radius = if b.radius.is_finite() {
                b.radius.max(MIN_RADIUS)
            } else {
                MIN_RADIUS
            };
            Disc {
                risk,
                radius,
                volume_rank: b.volume_rank,
            }
        })
        .collect()
}

/// Clamps a coordinate so the circle stays inside `[0, extent]`. When the
/// circle is wider than the axis the midpoint wins: the bubble stays visible
/// and centered instead of oscillating between both walls.
pub(crate) fn clamp_axis(value: f64, radius: f64, extent: f64) -> f64 {
    if extent <= 2.0 * radius {
        return extent / 2.0;
    }
    value.clamp(radius, extent - radius)
}

pub(crate) fn clamp_to_viewport(p: Pos2, radius: f64, viewport: Viewport) -> Pos2 {
    crate::geom::pos2(
        clamp_axis(p.x, radius, viewport.width),
        clamp_axis(p.y, radius, viewport.height),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_clamps_risk_and_radius() {
        let bubbles = vec![
            Bubble::new("a", 400.0, -5.0, 0),
            Bubble::new("b", f64::NAN, f64::INFINITY, 1),
            Bubble::new("c", 55.0, 12.0, 2),
        ];
        let discs = sanitize(&bubbles);
        assert_eq!(discs[0].risk, 100.0);
        assert_eq!(discs[0].radius, MIN_RADIUS);
        assert_eq!(discs[1].risk, 0.0);
        assert_eq!(discs[1].radius, MIN_RADIUS);
        assert_eq!(discs[2].risk, 55.0);
        assert_eq!(discs[2].radius, 12.0);
    }

    #[test]
    fn validate_rejects_duplicate_ids() {
        let bubbles = vec![Bubble::new("btc", 10.0, 20.0, 0), Bubble::new("btc", 12.0, 20.0, 1)];
        let err = validate(&bubbles).unwrap_err();
        assert_eq!(err.to_string(), "chart contains duplicate bubble id: btc");
    }

    #[test]
    fn clamp_axis_centers_oversized_circles() {
        assert_eq!(clamp_axis(10.0, 40.0, 60.0), 30.0);
        assert_eq!(clamp_axis(-3.0, 10.0, 100.0), 10.0);
        assert_eq!(clamp_axis(97.0, 10.0, 100.0), 90.0);
        assert_eq!(clamp_axis(50.0, 10.0, 100.0), 50.0);
    }

    #[test]
    fn viewport_normalization_floors_degenerate_sizes() {
        let v = Viewport::new(-20.0, f64::NAN).normalized();
        assert_eq!(v.width, MIN_VIEWPORT_SIDE);
        assert_eq!(v.height, MIN_VIEWPORT_SIDE);
    }
}
