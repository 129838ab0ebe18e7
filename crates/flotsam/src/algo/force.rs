//! Tick-driven force simulation: the animated layout family.
//!
//! Each tick sums an ordered list of pure force-contribution functions into a
//! displacement buffer, integrates velocities with decay, then hard-clamps
//! every bubble to the viewport. The simulation's activity coefficient
//! (`alpha`) decays toward a floor, so the layout comes to rest on its own;
//! a hard tick budget bounds the worst case.
//!
//! The host drives the simulation one [`Simulation::tick`] at a time and may
//! [`Simulation::stop`] it at any point; a stopped simulation never mutates
//! positions again, so replacing it mid-flight cannot leak a stale update.

use std::collections::BTreeMap;

use crate::chart::{self, Bubble, Disc, LayoutResult, LayoutStats, Point, Viewport};
use crate::error::Result;
use crate::geom::{Pos2, Vec2, pos2, vec2};

use super::{ForceOptions, residual_overlap, rng::SeededRng, target};

/// Largest per-tick movement that still counts as at rest.
const SLEEP_SPEED: f64 = 0.02;

/// Distances below this count as coincident centers.
const COINCIDENT_EPSILON: f64 = 1e-9;

/// Outcome of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Running,
    Settled,
}

/// Read-only view of the simulation handed to force passes.
struct SimFrame<'a> {
    discs: &'a [Disc],
    positions: &'a [Pos2],
    targets_y: &'a [f64],
    viewport: Viewport,
    alpha: f64,
    opts: &'a ForceOptions,
}

type ForcePass = fn(&SimFrame<'_>, &mut [Vec2]);

/// Ordered list of pure force contributions, summed each tick. Order matters
/// only for floating-point reproducibility; each pass only reads the frame.
const FORCE_PASSES: [ForcePass; 4] = [repulsion_pass, separation_pass, target_pass, center_pass];

#[derive(Debug, Clone)]
pub struct Simulation {
    ids: Vec<String>,
    discs: Vec<Disc>,
    viewport: Viewport,
    opts: ForceOptions,
    positions: Vec<Pos2>,
    velocities: Vec<Vec2>,
    targets_y: Vec<f64>,
    alpha: f64,
    ticks: usize,
    settled: bool,
    stopped: bool,
}

impl Simulation {
    pub fn new(bubbles: &[Bubble], viewport: Viewport, opts: &ForceOptions) -> Result<Self> {
        chart::validate(bubbles)?;
        let viewport = viewport.normalized();
        let discs = chart::sanitize(bubbles);
        let mut rng = SeededRng::new(opts.random_seed);

        let targets_y: Vec<f64> = discs.iter().map(|d| target::risk_y(d, viewport)).collect();
        let positions: Vec<Pos2> = discs
            .iter()
            .zip(&targets_y)
            .map(|(d, &ty)| {
                chart::clamp_to_viewport(pos2(target::seeded_x(d, viewport, &mut rng), ty), d.radius, viewport)
            })
            .collect();

        let settled = discs.is_empty();
        Ok(Self {
            ids: bubbles.iter().map(|b| b.id.clone()).collect(),
            velocities: vec![Vec2::zero(); discs.len()],
            discs,
            viewport,
            opts: opts.clone(),
            positions,
            targets_y,
            alpha: 1.0,
            ticks: 0,
            settled,
            stopped: false,
        })
    }

    /// Advances the simulation by one tick. A stopped or settled simulation
    /// is inert: the call mutates nothing and reports [`Tick::Settled`].
    pub fn tick(&mut self) -> Tick {
        if self.stopped || self.settled {
            return Tick::Settled;
        }

        let mut displacement = vec![Vec2::zero(); self.discs.len()];
        let frame = SimFrame {
            discs: &self.discs,
            positions: &self.positions,
            targets_y: &self.targets_y,
            viewport: self.viewport,
            alpha: self.alpha,
            opts: &self.opts,
        };
        for pass in FORCE_PASSES {
            pass(&frame, &mut displacement);
        }

        let mut max_speed = 0.0f64;
        for i in 0..self.discs.len() {
            let velocity = (self.velocities[i] + displacement[i]) * self.opts.velocity_decay;
            let next = chart::clamp_to_viewport(
                self.positions[i] + velocity,
                self.discs[i].radius,
                self.viewport,
            );
            // Store the effective movement so a wall contact sheds the
            // velocity that pushed into it instead of accumulating.
            self.velocities[i] = next - self.positions[i];
            max_speed = max_speed.max(self.velocities[i].length());
            self.positions[i] = next;
        }

        self.ticks += 1;
        self.alpha = (self.alpha * (1.0 - self.opts.alpha_decay)).max(0.0);

        let at_rest = self.alpha <= self.opts.alpha_min || max_speed < SLEEP_SPEED;
        if at_rest || self.ticks >= self.opts.max_ticks.max(1) {
            self.settled = true;
            tracing::debug!(ticks = self.ticks, converged = at_rest, "force simulation settled");
            return Tick::Settled;
        }
        Tick::Running
    }

    /// Synchronously cancels the simulation: no further tick will mutate any
    /// position, including a tick already requested by the host.
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn ticks(&self) -> usize {
        self.ticks
    }

    /// Current positions, delivered once per tick (and once at settlement).
    pub fn snapshot(&self) -> BTreeMap<String, Point> {
        self.ids
            .iter()
            .zip(&self.positions)
            .map(|(id, p)| (id.clone(), Point::from_pos(*p)))
            .collect()
    }

    pub fn result(&self) -> LayoutResult {
        let converged = self.settled && self.ticks < self.opts.max_ticks.max(1);
        LayoutResult {
            positions: self.snapshot(),
            stats: LayoutStats {
                rounds: self.ticks,
                converged,
                residual_overlap: residual_overlap(&self.positions, &self.discs, self.opts.margin),
            },
        }
    }

    /// Batch convenience: runs until settled and returns the final layout.
    pub fn run_to_settlement(&mut self) -> LayoutResult {
        while self.tick() == Tick::Running {}
        self.result()
    }
}

pub fn layout(bubbles: &[Bubble], viewport: Viewport, opts: &ForceOptions) -> Result<LayoutResult> {
    let mut sim = Simulation::new(bubbles, viewport, opts)?;
    Ok(sim.run_to_settlement())
}

/// Deterministic direction for a coincident pair; never NaN, distinct per
/// index pair so piles of identical positions fan out instead of stacking.
fn coincident_direction(i: usize, j: usize) -> Vec2 {
    let angle = ((i as f64) * 0.618_034 + (j as f64) * 0.414_214) * std::f64::consts::TAU;
    vec2(angle.cos(), angle.sin())
}

fn pair_direction(from: Pos2, to: Pos2, i: usize, j: usize) -> (Vec2, f64) {
    let delta = to - from;
    let dist = delta.length();
    if dist > COINCIDENT_EPSILON {
        (delta / dist, dist)
    } else {
        (coincident_direction(i, j), 0.0)
    }
}

/// Constant-strength mutual repulsion inside a cutoff (edge-to-edge), zero
/// beyond it. Scaled by the activity coefficient.
fn repulsion_pass(frame: &SimFrame<'_>, displacement: &mut [Vec2]) {
    let push = frame.opts.repulsion * frame.alpha;
    if push <= 0.0 {
        return;
    }
    for i in 0..frame.positions.len() {
        for j in (i + 1)..frame.positions.len() {
            let (dir, dist) = pair_direction(frame.positions[i], frame.positions[j], i, j);
            let gap = dist - frame.discs[i].radius - frame.discs[j].radius;
            if gap > frame.opts.repulsion_range {
                continue;
            }
            displacement[i] -= dir * push;
            displacement[j] += dir * push;
        }
    }
}

/// The no-overlap constraint: same term as the relaxation family, applied at
/// full strength every tick so overlaps resolve even late in the decay.
fn separation_pass(frame: &SimFrame<'_>, displacement: &mut [Vec2]) {
    for i in 0..frame.positions.len() {
        for j in (i + 1)..frame.positions.len() {
            let min_dist = frame.discs[i].radius + frame.discs[j].radius + frame.opts.margin;
            let (dir, dist) = pair_direction(frame.positions[i], frame.positions[j], i, j);
            if dist >= min_dist {
                continue;
            }
            let shift = (min_dist - dist) / 2.0;
            displacement[i] -= dir * shift;
            displacement[j] += dir * shift;
        }
    }
}

/// Weighted pull of y toward the risk target; below 1.0 so settling stays
/// visible instead of snapping.
fn target_pass(frame: &SimFrame<'_>, displacement: &mut [Vec2]) {
    let strength = frame.opts.target_strength * frame.alpha;
    for i in 0..frame.positions.len() {
        displacement[i].y += (frame.targets_y[i] - frame.positions[i].y) * strength;
    }
}

/// Weak pull of x toward the horizontal center; keeps the cloud centered.
fn center_pass(frame: &SimFrame<'_>, displacement: &mut [Vec2]) {
    let strength = frame.opts.center_strength * frame.alpha;
    let center_x = frame.viewport.width / 2.0;
    for i in 0..frame.positions.len() {
        displacement[i].x += (center_x - frame.positions[i].x) * strength;
    }
}
