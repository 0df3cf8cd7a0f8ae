//! Progression Scheduler
//!
//! Per-pawn countdown deciding when the evaluator runs.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use super::evaluator::{Evaluation, Evaluator};
use super::{ForcePawn, CHECK_INTERVAL};
use crate::events::NotificationSink;
use crate::random::RandomSource;

/// Chance that a pawn the player has never seen already awakened before
/// being observed.
pub const HIDDEN_AWAKENING_CHANCE: f64 = 0.5;

/// Countdown to the pawn's next progression check.
///
/// Only `ticks_until_next_check` and `initialized` are persisted; see
/// [`crate::persistence`].
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionState {
    pub ticks_until_next_check: u32,
    pub initialized: bool,
    /// Tick most recently counted down, so repeated calls within one tick
    /// count once.
    #[serde(skip)]
    last_ticked: Option<u64>,
}

impl ProgressionState {
    pub fn new(ticks_until_next_check: u32, initialized: bool) -> Self {
        Self {
            ticks_until_next_check,
            initialized,
            last_ticked: None,
        }
    }

    /// Called once when progression is attached to a pawn.
    ///
    /// Staggers the first check uniformly over `[0, interval)`. A pawn the
    /// player has never seen and that is not yet a Force user gets one
    /// immediate awakening roll at [`HIDDEN_AWAKENING_CHANCE`].
    pub fn on_attach<P, R, S>(
        &mut self,
        evaluator: &Evaluator,
        pawn: &mut P,
        rng: &mut R,
        sink: &mut S,
        tick: u64,
    ) -> Option<Evaluation>
    where
        P: ForcePawn + ?Sized,
        R: RandomSource + ?Sized,
        S: NotificationSink + ?Sized,
    {
        self.ticks_until_next_check = rng.below(evaluator.check_interval);
        self.initialized = true;
        self.last_ticked = None;

        if pawn.seen_by_player() || pawn.is_force_user() {
            return None;
        }
        if rng.chance(HIDDEN_AWAKENING_CHANCE) {
            Some(evaluator.awaken(pawn, sink, tick))
        } else {
            Some(Evaluation::NoChange)
        }
    }

    /// Called by the host once per tick.
    ///
    /// Counts down and runs the evaluator when the countdown reaches zero,
    /// then rearms it to the full interval. If the evaluator reports
    /// [`Evaluation::Unavailable`] the countdown stays at zero so the check
    /// retries on the next tick.
    pub fn on_tick<P, R, S>(
        &mut self,
        evaluator: &Evaluator,
        pawn: &mut P,
        rng: &mut R,
        sink: &mut S,
        tick: u64,
    ) -> Option<Evaluation>
    where
        P: ForcePawn + ?Sized,
        R: RandomSource + ?Sized,
        S: NotificationSink + ?Sized,
    {
        if !self.initialized || !pawn.is_active() {
            return None;
        }
        if self.last_ticked == Some(tick) {
            return None;
        }
        self.last_ticked = Some(tick);

        self.ticks_until_next_check = self
            .ticks_until_next_check
            .min(evaluator.check_interval)
            .saturating_sub(1);
        if self.ticks_until_next_check > 0 {
            return None;
        }

        let evaluation = evaluator.evaluate(pawn, rng, sink, tick);
        if evaluation != Evaluation::Unavailable {
            self.ticks_until_next_check = evaluator.check_interval;
        }
        Some(evaluation)
    }
}

impl Default for ProgressionState {
    fn default() -> Self {
        Self::new(CHECK_INTERVAL, false)
    }
}
