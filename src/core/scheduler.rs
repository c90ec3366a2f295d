//=========================================================================
// Frame Scheduler
//=========================================================================
//
// Owns the single outstanding frame timer of an engine.
//
// Architecture:
//   start() ──register──▶ TimerService ──TimerFired──▶ on_fire()
//                                                        │
//                                    mark_dirty(surface) ◀┘
//
// The scheduler never draws. A fired timer only marks the surface dirty;
// the host's redraw pass runs the frame later in a drawing context.
//
// Invariant: `pending` is `Some` exactly while a timer is registered
// and has neither fired nor been cancelled.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use log::trace;

//=== Internal Dependencies ===============================================

use crate::platform::{LayerId, LayerService, TimerHandle, TimerService};

//=== FrameScheduler ======================================================

/// Fixed-period, single-timer frame pacing.
#[derive(Debug)]
pub struct FrameScheduler {
    period: Duration,
    surface: LayerId,
    pending: Option<TimerHandle>,
    running: bool,
}

impl FrameScheduler {
    //--- Construction -----------------------------------------------------

    /// Creates a stopped scheduler that paces `surface` every `period`.
    pub fn new(period: Duration, surface: LayerId) -> Self {
        Self {
            period,
            surface,
            pending: None,
            running: false,
        }
    }

    //--- Control ----------------------------------------------------------

    /// Cancels any pending frame, marks the loop running and schedules
    /// the next frame one period from now.
    pub fn start<T: TimerService + ?Sized>(&mut self, timers: &mut T) {
        self.stop(timers);
        self.running = true;
        self.pending = Some(timers.register_timer(self.period));
        trace!(target: "pge::scheduler", "Started, first frame {:?}", self.pending);
    }

    /// Cancels any pending frame and marks the loop stopped.
    ///
    /// Safe to call repeatedly.
    pub fn stop<T: TimerService + ?Sized>(&mut self, timers: &mut T) {
        if let Some(handle) = self.pending.take() {
            timers.cancel_timer(handle);
            trace!(target: "pge::scheduler", "Cancelled {:?}", handle);
        }
        self.running = false;
    }

    /// Schedules exactly one more frame, replacing any pending one.
    ///
    /// Called by the frame cycle after a completed frame.
    pub fn schedule_next<T: TimerService + ?Sized>(&mut self, timers: &mut T) {
        if let Some(handle) = self.pending.take() {
            timers.cancel_timer(handle);
        }
        self.pending = Some(timers.register_timer(self.period));
    }

    /// Handles a fired timer.
    ///
    /// Returns `false` for handles this scheduler is not waiting on
    /// (stale or foreign). Otherwise clears the pending handle and marks
    /// the surface dirty.
    pub fn on_fire<L: LayerService + ?Sized>(&mut self, layers: &mut L, handle: TimerHandle) -> bool {
        if self.pending != Some(handle) {
            return false;
        }
        self.pending = None;
        layers.mark_dirty(self.surface);
        true
    }

    //--- Queries ----------------------------------------------------------

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn pending(&self) -> Option<TimerHandle> {
        self.pending
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn surface(&self) -> LayerId {
        self.surface
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
