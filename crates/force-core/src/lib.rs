//! Force Progression Simulation Library
//!
//! Pawns slowly awaken to the Force and gain levels through a
//! mean-time-between-events process evaluated on a fixed interval. Around
//! that core sit appearance copying, step-sequenced Force jobs, meditation
//! rituals, notifications and save/load.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;
use thiserror::Error;

pub mod components;
pub mod config;
pub mod events;
pub mod persistence;
pub mod progression;
pub mod random;
pub mod ritual;
pub mod sequence;
pub mod setup;
pub mod systems;

pub use components::*;

pub use config::{ArchetypeRegistry, Config, ConfigError};
pub use persistence::{SaveError, SaveGame};
pub use setup::{spawn_demo_pawns, spawn_summary, SpawnSummary};

/// Seeded random number generator resource
#[derive(Resource)]
pub struct SimRng(pub SmallRng);

/// Current simulation tick
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct SimClock {
    pub current_tick: u64,
}

impl SimClock {
    pub fn advance(&mut self) {
        self.current_tick += 1;
    }
}

/// Any error the driver can surface
#[derive(Debug, Error)]
pub enum ForceError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Save(#[from] SaveError),
    #[error(transparent)]
    Notify(#[from] events::NotifyError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
