//! World Setup
//!
//! World initialization and demo pawn spawning for the headless driver.

pub mod pawns;

pub use pawns::*;

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::config::Config;
use crate::events::NotificationOutbox;
use crate::ritual::QualityScorer;
use crate::systems::{
    register_appearance_hooks, MeditationSchedule, ProgressionSettings, ProgressionStats,
};
use crate::{SimClock, SimRng};

/// Builds an empty world with every resource and hook the schedule needs.
pub fn create_world(config: &Config, seed: u64) -> World {
    let mut world = World::new();
    register_appearance_hooks(&mut world);

    world.insert_resource(SimClock::default());
    world.insert_resource(SimRng(SmallRng::seed_from_u64(seed)));
    world.insert_resource(config.archetype_registry());
    world.insert_resource(ProgressionSettings {
        check_interval: config.simulation.check_interval,
    });
    world.insert_resource(ProgressionStats::default());
    world.insert_resource(config.appearance.clone());
    world.insert_resource(QualityScorer::from_config(&config.ritual));
    world.insert_resource(MeditationSchedule::from_config(&config.ritual));
    world.insert_resource(NotificationOutbox::new());
    world
}
