//! Layout passes and the re-layout trigger.
//!
//! A [`LayoutPass`] owns the whole working state of one layout computation;
//! there is no shared mutable layout state for a render side to reach into.
//! The [`LayoutDriver`] owns at most one live pass. New input (`submit`,
//! `resize`, `set_algorithm`) is only *recorded*; it is applied exactly once
//! at the next [`LayoutDriver::advance`] call, which first cancels any
//! in-flight pass. A resize storm between two ticks therefore costs one
//! recompute, and a cancelled pass can never deliver another update: its
//! simulation is stopped and the pass value is dropped before the new pass
//! starts.

use std::collections::BTreeMap;

use crate::algo::{Algorithm, Simulation, Tick};
use crate::chart::{Bubble, LayoutResult, Point, Viewport};
use crate::error::Result;

/// Where the driver currently is in the `Idle → Computing → Settled` cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassState {
    /// No data has been accepted yet (or the last pass was cancelled outright).
    Idle,
    /// A pass is in flight; `advance` yields per-tick snapshots.
    Computing,
    /// The last pass terminated; its result is available via
    /// [`LayoutDriver::settled_result`].
    Settled,
}

/// One position delivery. `generation` identifies the accepted input that
/// produced it, so a consumer can discard deliveries from superseded passes.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub generation: u64,
    pub positions: BTreeMap<String, Point>,
    pub settled: bool,
}

/// An owned, cancellable layout computation.
#[derive(Debug)]
pub struct LayoutPass {
    generation: u64,
    kind: PassKind,
}

#[derive(Debug)]
enum PassKind {
    /// Batch family: computed up front, delivered once.
    Batch {
        result: LayoutResult,
        delivered: bool,
    },
    /// Tick family: advanced by the host, one tick per `advance`.
    Ticking(Simulation),
}

enum PassStep {
    Running(Snapshot),
    Done(Snapshot, LayoutResult),
    Spent,
}

impl LayoutPass {
    fn begin(
        bubbles: &[Bubble],
        viewport: Viewport,
        algorithm: &Algorithm,
        generation: u64,
    ) -> Result<Self> {
        let kind = match algorithm {
            Algorithm::Relaxation(opts) => PassKind::Batch {
                result: crate::algo::relax::layout(bubbles, viewport, opts)?,
                delivered: false,
            },
            Algorithm::Force(opts) => PassKind::Ticking(Simulation::new(bubbles, viewport, opts)?),
        };
        Ok(Self { generation, kind })
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Synchronous cancellation: after this call the pass delivers nothing,
    /// not even a tick the host already scheduled.
    pub fn cancel(&mut self) {
        match &mut self.kind {
            PassKind::Batch { delivered, .. } => *delivered = true,
            PassKind::Ticking(sim) => sim.stop(),
        }
    }

    fn advance(&mut self) -> PassStep {
        match &mut self.kind {
            PassKind::Batch { result, delivered } => {
                if *delivered {
                    return PassStep::Spent;
                }
                *delivered = true;
                PassStep::Done(
                    Snapshot {
                        generation: self.generation,
                        positions: result.positions.clone(),
                        settled: true,
                    },
                    result.clone(),
                )
            }
            PassKind::Ticking(sim) => {
                if sim.is_stopped() {
                    return PassStep::Spent;
                }
                let status = sim.tick();
                let snapshot = Snapshot {
                    generation: self.generation,
                    positions: sim.snapshot(),
                    settled: status == Tick::Settled,
                };
                match status {
                    Tick::Running => PassStep::Running(snapshot),
                    Tick::Settled => PassStep::Done(snapshot, sim.result()),
                }
            }
        }
    }
}

/// Re-layout trigger: accepts data/viewport/options changes, coalesces them,
/// and drives one cancellable pass at a time.
#[derive(Debug)]
pub struct LayoutDriver {
    algorithm: Algorithm,
    viewport: Viewport,
    bubbles: Option<Vec<Bubble>>,
    pending_bubbles: Option<Vec<Bubble>>,
    pending_viewport: Option<Viewport>,
    pending_algorithm: Option<Algorithm>,
    pass: Option<LayoutPass>,
    generation: u64,
    state: PassState,
    settled: Option<LayoutResult>,
}

impl LayoutDriver {
    pub fn new(viewport: Viewport, algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            viewport,
            bubbles: None,
            pending_bubbles: None,
            pending_viewport: None,
            pending_algorithm: None,
            pass: None,
            generation: 0,
            state: PassState::Idle,
            settled: None,
        }
    }

    /// Replaces the item set at the next `advance`. Repeated calls between
    /// two ticks coalesce; only the last set wins.
    pub fn submit(&mut self, bubbles: Vec<Bubble>) {
        self.pending_bubbles = Some(bubbles);
    }

    /// Records a viewport change, applied at the next `advance`. A storm of
    /// resize events costs a single recompute.
    pub fn resize(&mut self, viewport: Viewport) {
        self.pending_viewport = Some(viewport);
    }

    pub fn set_algorithm(&mut self, algorithm: Algorithm) {
        self.pending_algorithm = Some(algorithm);
    }

    /// Cancels the in-flight pass without starting a new one.
    pub fn cancel(&mut self) {
        if let Some(mut pass) = self.pass.take() {
            pass.cancel();
        }
        self.state = if self.settled.is_some() {
            PassState::Settled
        } else {
            PassState::Idle
        };
    }

    pub fn state(&self) -> PassState {
        self.state
    }

    /// Generation of the most recently accepted input.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Result of the last pass that ran to settlement, if any.
    pub fn settled_result(&self) -> Option<&LayoutResult> {
        self.settled.as_ref()
    }

    /// One cooperative turn: applies pending input (cancelling any in-flight
    /// pass first), then advances the current pass by one tick. Returns the
    /// tick's snapshot, or `None` when there is nothing to do.
    pub fn advance(&mut self) -> Result<Option<Snapshot>> {
        self.apply_pending()?;

        let Some(pass) = self.pass.as_mut() else {
            return Ok(None);
        };
        match pass.advance() {
            PassStep::Running(snapshot) => {
                self.state = PassState::Computing;
                Ok(Some(snapshot))
            }
            PassStep::Done(snapshot, result) => {
                self.pass = None;
                self.state = PassState::Settled;
                self.settled = Some(result);
                Ok(Some(snapshot))
            }
            PassStep::Spent => {
                self.pass = None;
                Ok(None)
            }
        }
    }

    fn apply_pending(&mut self) -> Result<()> {
        let dirty = self.pending_bubbles.is_some()
            || self.pending_viewport.is_some()
            || self.pending_algorithm.is_some();
        if !dirty {
            return Ok(());
        }

        // Cancel before the new pass exists; two passes must never overlap.
        if let Some(mut pass) = self.pass.take() {
            pass.cancel();
        }

        if let Some(bubbles) = self.pending_bubbles.take() {
            self.bubbles = Some(bubbles);
        }
        if let Some(viewport) = self.pending_viewport.take() {
            self.viewport = viewport;
        }
        if let Some(algorithm) = self.pending_algorithm.take() {
            self.algorithm = algorithm;
        }

        // A resize or option change before any data arrives leaves us Idle.
        let Some(bubbles) = self.bubbles.as_deref() else {
            return Ok(());
        };

        self.generation += 1;
        self.pass = Some(LayoutPass::begin(
            bubbles,
            self.viewport,
            &self.algorithm,
            self.generation,
        )?);
        self.state = PassState::Computing;
        Ok(())
    }
}
