//! ECS Systems
//!
//! Progression, appearance overrides, Force jobs and meditation rituals.

pub mod appearance;
pub mod jobs;
pub mod progression;
pub mod ritual;

use bevy_ecs::prelude::*;

pub use appearance::{
    expire_appearance_overrides, register_appearance_hooks, release_overrides_on_death,
};
pub use jobs::{pump_force_jobs, start_disguise_jobs, ForceJob, JobAction};
pub use progression::{
    attach_force_progression, tick_force_progression, ProgressionSettings, ProgressionStats,
};
pub use ritual::{run_meditation_rituals, MeditationSchedule};

/// The per-tick schedule: progression, then jobs and meditations, then
/// override release.
pub fn build_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            attach_force_progression,
            tick_force_progression,
            start_disguise_jobs,
            pump_force_jobs,
            run_meditation_rituals,
            expire_appearance_overrides,
            release_overrides_on_death,
        )
            .chain(),
    );
    schedule
}
