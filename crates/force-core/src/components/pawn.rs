//! Pawn Components
//!
//! Identity, faction and vitals for individual pawns.

use bevy_ecs::prelude::*;
use force_events::PawnRef;
use serde::{Deserialize, Serialize};

/// Marker component identifying an entity as a pawn
#[derive(Component, Debug, Clone, Default)]
pub struct Pawn;

/// Unique identifier for a pawn
#[derive(Component, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PawnId(pub String);

/// Human-readable name for a pawn
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct PawnName(pub String);

/// Faction the pawn belongs to
#[derive(Component, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionMembership {
    pub faction_id: String,
    /// True for the player's own faction; notifications are only raised for these pawns
    pub player_controlled: bool,
}

impl FactionMembership {
    pub fn new(faction_id: impl Into<String>, player_controlled: bool) -> Self {
        Self {
            faction_id: faction_id.into(),
            player_controlled,
        }
    }
}

/// Life and visibility state read by the progression scheduler
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    pub alive: bool,
    /// Present on the map and ticking
    pub spawned: bool,
    /// Whether the player has ever observed this pawn
    pub seen_by_player: bool,
    /// Biological ageing rate relative to baseline. `None` until the pawn's
    /// body is fully generated.
    pub age_rate: Option<f32>,
}

impl Vitals {
    pub fn new(age_rate: f32) -> Self {
        Self {
            alive: true,
            spawned: true,
            seen_by_player: false,
            age_rate: Some(age_rate),
        }
    }

    pub fn seen(mut self) -> Self {
        self.seen_by_player = true;
        self
    }

    /// Alive and spawned.
    pub fn is_active(&self) -> bool {
        self.alive && self.spawned
    }

    pub fn kill(&mut self) {
        self.alive = false;
    }
}

impl Default for Vitals {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Key into the archetype registry selecting the pawn's progression tuning
#[derive(Component, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Archetype(pub String);

/// Builds the notification identity for a pawn.
pub fn pawn_ref(id: &PawnId, name: &PawnName, faction: &FactionMembership) -> PawnRef {
    PawnRef::new(id.0.clone(), name.0.clone(), faction.faction_id.clone())
}
