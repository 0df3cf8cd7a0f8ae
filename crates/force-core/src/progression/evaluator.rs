//! Progression Evaluator
//!
//! Rolls one activation or level-up trial and applies its result.

use force_events::NotificationKind;

use super::mtb::mtb_chance;
use super::{ForcePawn, ProgressionConfig, CHECK_INTERVAL};
use crate::events::{deliver, Alert, NotificationSink};
use crate::random::RandomSource;

/// Result of one progression check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    /// A trial was rolled and did not fire
    NoChange,
    /// The pawn became a Force user
    Awakened,
    /// The pawn gained exactly one level
    LeveledUp { level: u32, reached_maximum: bool },
    /// Capped at the maximum level; no trial rolled
    AtMaximum,
    /// Required pawn inputs are missing; nothing was changed
    Unavailable,
}

impl Evaluation {
    pub fn changed_pawn(&self) -> bool {
        matches!(self, Evaluation::Awakened | Evaluation::LeveledUp { .. })
    }
}

/// Progression tuning bound to a check interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluator {
    pub config: ProgressionConfig,
    pub check_interval: u32,
}

impl Evaluator {
    /// Binds a config to an interval; an interval of 0 is raised to 1.
    pub fn new(config: ProgressionConfig, check_interval: u32) -> Self {
        Self {
            config,
            check_interval: check_interval.max(1),
        }
    }

    /// Runs the trial selected by the pawn's current status.
    pub fn evaluate<P, R, S>(&self, pawn: &mut P, rng: &mut R, sink: &mut S, tick: u64) -> Evaluation
    where
        P: ForcePawn + ?Sized,
        R: RandomSource + ?Sized,
        S: NotificationSink + ?Sized,
    {
        let Some(age_rate) = pawn.age_rate() else {
            return Evaluation::Unavailable;
        };

        if !pawn.is_force_user() {
            let p = mtb_chance(
                self.config.mean_time_to_activate_sensitivity_years,
                age_rate,
                self.check_interval,
            );
            tracing::debug!("Activation trial for {} (p={:.6})", pawn.pawn_ref().pawn_id, p);
            if !rng.chance(p) {
                return Evaluation::NoChange;
            }
            return self.awaken(pawn, sink, tick);
        }

        let Some(level) = pawn.force_level() else {
            return Evaluation::Unavailable;
        };
        if self.config.cap_at_maximum && level >= self.config.maximum_level {
            return Evaluation::AtMaximum;
        }

        let p = mtb_chance(
            self.config.mean_time_between_level_ups_years,
            age_rate,
            self.check_interval,
        );
        tracing::debug!("Level-up trial for {} at level {} (p={:.6})", pawn.pawn_ref().pawn_id, level, p);
        if !rng.chance(p) {
            return Evaluation::NoChange;
        }

        let new_level = level.saturating_add(1);
        pawn.set_force_level(new_level);
        let reached_maximum = new_level == self.config.maximum_level;

        let who = pawn.pawn_ref();
        tracing::info!("{} reached Force level {}", who.name, new_level);
        if pawn.is_player_controlled() {
            deliver(
                sink,
                Alert::new(NotificationKind::LevelGained, who.clone()).with_value(new_level as f64),
                tick,
            );
            if reached_maximum {
                deliver(
                    sink,
                    Alert::new(NotificationKind::MaximumLevelReached, who).with_value(new_level as f64),
                    tick,
                );
            }
        }

        Evaluation::LeveledUp {
            level: new_level,
            reached_maximum,
        }
    }

    /// Makes the pawn a Force user: trait, full pool, one ability point.
    /// A pawn that already is one is left untouched.
    ///
    /// A pawn without a level starts at 1, or at `maximum_level` if that is
    /// lower and the archetype is capped.
    pub fn awaken<P, S>(&self, pawn: &mut P, sink: &mut S, tick: u64) -> Evaluation
    where
        P: ForcePawn + ?Sized,
        S: NotificationSink + ?Sized,
    {
        let had_level = pawn.force_level().is_some();
        if !pawn.grant_sensitivity() {
            return Evaluation::NoChange;
        }
        if !had_level && self.config.cap_at_maximum {
            if let Some(level) = pawn.force_level() {
                if level > self.config.maximum_level {
                    pawn.set_force_level(self.config.maximum_level);
                }
            }
        }
        pawn.fill_force_pool();
        pawn.grant_ability_points(1);

        let who = pawn.pawn_ref();
        tracing::info!("{} awakened to the Force", who.name);
        if pawn.is_player_controlled() {
            deliver(sink, Alert::new(NotificationKind::SensitivityAwakened, who.clone()), tick);
            if let Some(level) = pawn.force_level().filter(|l| *l == self.config.maximum_level) {
                deliver(
                    sink,
                    Alert::new(NotificationKind::MaximumLevelReached, who).with_value(level as f64),
                    tick,
                );
            }
        }
        Evaluation::Awakened
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(ProgressionConfig::default(), CHECK_INTERVAL)
    }
}
