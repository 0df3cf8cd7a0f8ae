//! Force Progression
//!
//! Per-pawn stochastic process that decides whether a latent pawn awakens to
//! the Force and whether an awakened pawn gains a level.
//!
//! The host (here the ECS schedule in [`crate::systems::progression`]) calls
//! [`ProgressionState::on_tick`] once per tick per pawn. Every
//! [`Evaluator::check_interval`] ticks the [`Evaluator`] converts a
//! mean-time-to-event into a per-check probability ([`mtb_chance`]) and rolls
//! either an activation trial or a level-up trial, never both.
//!
//! ```
//! use force_core::progression::{mtb_chance, CHECK_INTERVAL};
//!
//! // Ten-year mean wait, baseline ageing, one check per day
//! let p = mtb_chance(10.0, 1.0, CHECK_INTERVAL);
//! assert!((p - 1.0 / 600.0).abs() < 1e-12);
//! ```

pub mod evaluator;
pub mod mtb;
pub mod scheduler;

pub use evaluator::{Evaluation, Evaluator};
pub use mtb::mtb_chance;
pub use scheduler::{ProgressionState, HIDDEN_AWAKENING_CHANCE};

use force_events::PawnRef;
use serde::{Deserialize, Serialize};

use crate::components::{pawn_ref, FactionMembership, ForceUser, PawnId, PawnName, Vitals};

/// Default ticks between two progression checks (one in-game day).
pub const CHECK_INTERVAL: u32 = 60_000;

/// Progression tuning for one pawn archetype. Immutable at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressionConfig {
    /// Mean wait, in years, before a latent pawn awakens
    pub mean_time_to_activate_sensitivity_years: f32,
    /// Mean wait, in years, between two level gains
    pub mean_time_between_level_ups_years: f32,
    pub maximum_level: u32,
    /// Stop rolling level-ups once `maximum_level` is reached
    pub cap_at_maximum: bool,
}

impl ProgressionConfig {
    /// True if either mean time would make every check fire.
    pub fn is_degenerate(&self) -> bool {
        !(self.mean_time_to_activate_sensitivity_years > 0.0)
            || !(self.mean_time_between_level_ups_years > 0.0)
    }
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            mean_time_to_activate_sensitivity_years: 20.0,
            mean_time_between_level_ups_years: 1.0,
            maximum_level: 20,
            cap_at_maximum: true,
        }
    }
}

/// Per-pawn attributes the progression model reads and writes.
pub trait ForcePawn {
    fn pawn_ref(&self) -> PawnRef;
    /// Alive and present in the simulation.
    fn is_active(&self) -> bool;
    fn seen_by_player(&self) -> bool;
    fn is_player_controlled(&self) -> bool;
    /// Biological ageing rate; `None` while the pawn is not fully set up.
    fn age_rate(&self) -> Option<f32>;
    fn is_force_user(&self) -> bool;
    /// Current level; `None` while the pawn's Force data is not set up.
    fn force_level(&self) -> Option<u32>;
    /// Grants Force-user status. Returns false if the pawn already had it.
    fn grant_sensitivity(&mut self) -> bool;
    fn set_force_level(&mut self, level: u32);
    fn fill_force_pool(&mut self);
    fn grant_ability_points(&mut self, points: u32);
}

/// Borrowed view over a pawn's ECS components.
pub struct ForcePawnView<'a> {
    pub id: &'a PawnId,
    pub name: &'a PawnName,
    pub faction: &'a FactionMembership,
    pub vitals: &'a Vitals,
    pub force: &'a mut ForceUser,
}

impl ForcePawn for ForcePawnView<'_> {
    fn pawn_ref(&self) -> PawnRef {
        pawn_ref(self.id, self.name, self.faction)
    }

    fn is_active(&self) -> bool {
        self.vitals.is_active()
    }

    fn seen_by_player(&self) -> bool {
        self.vitals.seen_by_player
    }

    fn is_player_controlled(&self) -> bool {
        self.faction.player_controlled
    }

    fn age_rate(&self) -> Option<f32> {
        self.vitals.age_rate
    }

    fn is_force_user(&self) -> bool {
        self.force.is_force_user()
    }

    fn force_level(&self) -> Option<u32> {
        self.force.level
    }

    fn grant_sensitivity(&mut self) -> bool {
        self.force.grant_sensitivity()
    }

    fn set_force_level(&mut self, level: u32) {
        self.force.level = Some(level);
    }

    fn fill_force_pool(&mut self) {
        self.force.pool.fill();
    }

    fn grant_ability_points(&mut self, points: u32) {
        self.force.ability_points = self.force.ability_points.saturating_add(points);
    }
}
