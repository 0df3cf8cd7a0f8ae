//! Step Sequences
//!
//! An ordered list of `{ wait, action }` steps advanced by an external
//! per-tick pump. Each step waits its number of ticks, then hands its action
//! back to the caller exactly once. A pump yields at most one action, so a
//! step acts no sooner than the pump after the previous step acted: waits of
//! 0 and 1 behave alike.
//!
//! ```
//! use force_core::sequence::{Step, StepEvent, StepSequence};
//!
//! let mut seq = StepSequence::new(vec![Step::new(2, "focus"), Step::new(0, "strike")]);
//! assert_eq!(seq.pump(), StepEvent::Waiting);
//! assert_eq!(seq.pump(), StepEvent::Act("focus"));
//! assert_eq!(seq.pump(), StepEvent::Act("strike"));
//! assert_eq!(seq.pump(), StepEvent::Finished);
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step<A> {
    /// Ticks to wait before acting
    pub wait_ticks: u32,
    pub action: A,
}

impl<A> Step<A> {
    pub fn new(wait_ticks: u32, action: A) -> Self {
        Self { wait_ticks, action }
    }
}

/// What a single pump produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepEvent<A> {
    Waiting,
    Act(A),
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSequence<A> {
    steps: Vec<Step<A>>,
    current: usize,
    /// Ticks already waited on the current step
    waited: u32,
    cancelled: bool,
}

impl<A: Clone> StepSequence<A> {
    pub fn new(steps: Vec<Step<A>>) -> Self {
        Self {
            steps,
            current: 0,
            waited: 0,
            cancelled: false,
        }
    }

    /// Advances by one tick.
    ///
    /// The pump that completes a step's wait also acts, so a step waiting
    /// `n` ticks acts on the `max(n, 1)`th pump counted from the one after
    /// the previous action.
    pub fn pump(&mut self) -> StepEvent<A> {
        if self.is_finished() {
            return StepEvent::Finished;
        }
        let step = &self.steps[self.current];
        if step.wait_ticks > 0 {
            self.waited += 1;
            if self.waited < step.wait_ticks {
                return StepEvent::Waiting;
            }
        }
        let action = step.action.clone();
        self.current += 1;
        self.waited = 0;
        StepEvent::Act(action)
    }

    /// Drops all remaining steps.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_finished(&self) -> bool {
        self.cancelled || self.current >= self.steps.len()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Steps that have not acted yet.
    pub fn remaining(&self) -> usize {
        if self.cancelled {
            0
        } else {
            self.steps.len().saturating_sub(self.current)
        }
    }

    /// Ticks left before the whole sequence has acted.
    pub fn ticks_remaining(&self) -> u64 {
        if self.is_finished() {
            return 0;
        }
        let current = &self.steps[self.current];
        let first = current.wait_ticks.saturating_sub(self.waited).max(1) as u64;
        let rest: u64 = self.steps[self.current + 1..]
            .iter()
            .map(|s| s.wait_ticks.max(1) as u64)
            .sum();
        first + rest
    }
}
