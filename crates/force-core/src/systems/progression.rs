//! Progression Systems
//!
//! Drive each pawn's [`ProgressionState`] from the ECS schedule: attach once,
//! then tick every simulation step.

use bevy_ecs::prelude::*;
use std::collections::HashSet;

use crate::components::{
    Archetype, FactionMembership, ForceUser, Pawn, PawnId, PawnName, Vitals,
};
use crate::config::ArchetypeRegistry;
use crate::events::NotificationOutbox;
use crate::progression::{Evaluation, Evaluator, ForcePawnView, ProgressionState, CHECK_INTERVAL};
use crate::{SimClock, SimRng};

/// Interval shared by every pawn's evaluator
#[derive(Resource, Debug, Clone, Copy)]
pub struct ProgressionSettings {
    pub check_interval: u32,
}

impl Default for ProgressionSettings {
    fn default() -> Self {
        Self {
            check_interval: CHECK_INTERVAL,
        }
    }
}

/// Running totals for the driver's summary
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressionStats {
    pub checks: u64,
    pub awakenings: u64,
    pub level_ups: u64,
    pub capped: u64,
    pub unavailable: u64,
}

impl ProgressionStats {
    pub fn record(&mut self, evaluation: Evaluation) {
        self.checks += 1;
        match evaluation {
            Evaluation::Awakened => self.awakenings += 1,
            Evaluation::LeveledUp { .. } => self.level_ups += 1,
            Evaluation::AtMaximum => self.capped += 1,
            Evaluation::Unavailable => self.unavailable += 1,
            Evaluation::NoChange => {}
        }
    }
}

type ProgressionQuery<'w, 's> = Query<
    'w,
    's,
    (
        &'static PawnId,
        &'static PawnName,
        &'static FactionMembership,
        &'static Vitals,
        &'static Archetype,
        &'static mut ForceUser,
        &'static mut ProgressionState,
    ),
    With<Pawn>,
>;

/// Runs `on_attach` for every pawn whose progression is not initialized yet.
pub fn attach_force_progression(
    clock: Res<SimClock>,
    settings: Res<ProgressionSettings>,
    registry: Res<ArchetypeRegistry>,
    mut rng: ResMut<SimRng>,
    mut outbox: ResMut<NotificationOutbox>,
    mut stats: ResMut<ProgressionStats>,
    mut reported: Local<HashSet<String>>,
    mut query: ProgressionQuery,
) {
    for (id, name, faction, vitals, archetype, mut force, mut state) in &mut query {
        if state.initialized {
            continue;
        }
        let Some(config) = registry.get(&archetype.0) else {
            if reported.insert(archetype.0.clone()) {
                tracing::warn!("Unknown archetype '{}'; pawns using it will not progress", archetype.0);
            }
            continue;
        };

        let evaluator = Evaluator::new(*config, settings.check_interval);
        let mut pawn = ForcePawnView {
            id,
            name,
            faction,
            vitals,
            force: &mut *force,
        };
        let result = state.on_attach(&evaluator, &mut pawn, &mut rng.0, &mut *outbox, clock.current_tick);
        if let Some(Evaluation::Awakened) = result {
            stats.awakenings += 1;
        }
        tracing::debug!("Attached progression to {} (next check in {})", id.0, state.ticks_until_next_check);
    }
}

/// Counts every initialized pawn down and evaluates those that are due.
pub fn tick_force_progression(
    clock: Res<SimClock>,
    settings: Res<ProgressionSettings>,
    registry: Res<ArchetypeRegistry>,
    mut rng: ResMut<SimRng>,
    mut outbox: ResMut<NotificationOutbox>,
    mut stats: ResMut<ProgressionStats>,
    mut query: ProgressionQuery,
) {
    for (id, name, faction, vitals, archetype, mut force, mut state) in &mut query {
        let Some(config) = registry.get(&archetype.0) else {
            continue;
        };

        let evaluator = Evaluator::new(*config, settings.check_interval);
        let mut pawn = ForcePawnView {
            id,
            name,
            faction,
            vitals,
            force: &mut *force,
        };
        if let Some(evaluation) =
            state.on_tick(&evaluator, &mut pawn, &mut rng.0, &mut *outbox, clock.current_tick)
        {
            stats.record(evaluation);
        }
    }
}
