//! Meditation Ritual System
//!
//! Each faction's Force users periodically meditate together. The gathering
//! is scored by the [`QualityScorer`]; a decent or better meditation refills
//! every participant's Force pool.

use bevy_ecs::prelude::*;
use force_events::{NotificationKind, Severity};
use std::collections::BTreeMap;

use crate::components::{pawn_ref, FactionMembership, ForceUser, PawnId, PawnName, Vitals};
use crate::config::RitualConfig;
use crate::events::{deliver, Alert, NotificationOutbox};
use crate::ritual::{Participant, QualityScorer, RitualGathering, RitualOutcome};
use crate::SimClock;

/// Tick of the next meditation for each faction
#[derive(Resource, Debug, Default)]
pub struct MeditationSchedule {
    /// Maps faction_id -> next meditation tick
    next_meditations: BTreeMap<String, u64>,
    /// Interval between meditations (in ticks)
    pub interval: u64,
    pub min_participants: usize,
    /// Meditations actually held
    pub held: u64,
}

impl MeditationSchedule {
    pub fn new(interval: u64, min_participants: usize) -> Self {
        Self {
            next_meditations: BTreeMap::new(),
            interval: interval.max(1),
            min_participants: min_participants.max(2),
            held: 0,
        }
    }

    pub fn from_config(config: &RitualConfig) -> Self {
        Self::new(config.interval_ticks, config.min_participants)
    }

    pub fn schedule(&mut self, faction_id: impl Into<String>, tick: u64) {
        self.next_meditations.insert(faction_id.into(), tick);
    }

    pub fn next_meditation(&self, faction_id: &str) -> Option<u64> {
        self.next_meditations.get(faction_id).copied()
    }

    pub fn is_due(&self, faction_id: &str, current_tick: u64) -> bool {
        self.next_meditations
            .get(faction_id)
            .is_some_and(|&tick| current_tick >= tick)
    }

    pub fn advance(&mut self, faction_id: &str) {
        if let Some(tick) = self.next_meditations.get_mut(faction_id) {
            *tick += self.interval;
        }
    }
}

fn outcome_severity(outcome: RitualOutcome) -> Severity {
    match outcome {
        RitualOutcome::Good | RitualOutcome::Excellent => Severity::Positive,
        RitualOutcome::Decent => Severity::Neutral,
        RitualOutcome::Poor | RitualOutcome::Terrible => Severity::Negative,
    }
}

/// Holds every meditation that is due this tick.
pub fn run_meditation_rituals(
    clock: Res<SimClock>,
    scorer: Res<QualityScorer>,
    mut schedule: ResMut<MeditationSchedule>,
    mut outbox: ResMut<NotificationOutbox>,
    mut query: Query<(Entity, &PawnId, &PawnName, &FactionMembership, &Vitals, &mut ForceUser)>,
) {
    let tick = clock.current_tick;

    // Group active Force users by faction; first sighting of a faction
    // schedules its first meditation one interval out
    let mut by_faction: BTreeMap<String, Vec<(Entity, Participant, bool)>> = BTreeMap::new();
    for (entity, id, name, faction, vitals, force) in &query {
        if schedule.next_meditation(&faction.faction_id).is_none() {
            let first = tick + schedule.interval;
            schedule.schedule(faction.faction_id.clone(), first);
        }
        if !vitals.is_active() || !force.is_force_user() {
            continue;
        }
        by_faction.entry(faction.faction_id.clone()).or_default().push((
            entity,
            Participant {
                pawn: pawn_ref(id, name, faction),
                force_level: force.level,
            },
            faction.player_controlled,
        ));
    }

    let due: Vec<String> = schedule
        .next_meditations
        .keys()
        .filter(|faction_id| schedule.is_due(faction_id, tick))
        .cloned()
        .collect();

    for faction_id in due {
        schedule.advance(&faction_id);

        let mut attendees = by_faction.remove(&faction_id).unwrap_or_default();
        if attendees.len() < schedule.min_participants {
            tracing::debug!(
                "Meditation for {} skipped: {} participants",
                faction_id,
                attendees.len()
            );
            continue;
        }
        attendees.sort_by(|a, b| a.1.pawn.pawn_id.cmp(&b.1.pawn.pawn_id));

        // The most advanced participant leads; ties go to the lowest id
        let leader = attendees
            .iter()
            .enumerate()
            .max_by(|(ia, a), (ib, b)| {
                a.1.force_level
                    .cmp(&b.1.force_level)
                    .then_with(|| ib.cmp(ia))
            })
            .map(|(i, _)| i);

        let player_controlled = attendees.iter().any(|(_, _, player)| *player);
        let entities: Vec<Entity> = attendees.iter().map(|(entity, _, _)| *entity).collect();
        let gathering = RitualGathering {
            faction_id: faction_id.clone(),
            participants: attendees.into_iter().map(|(_, p, _)| p).collect(),
            leader,
        };

        let score = scorer.score(&gathering);
        schedule.held += 1;
        tracing::info!(
            "{} meditated with {} participants: {:?} (quality {:.2})",
            faction_id,
            gathering.participants.len(),
            score.outcome,
            score.quality
        );

        if score.outcome.restores_pools() {
            for entity in &entities {
                if let Ok((_, _, _, _, _, mut force)) = query.get_mut(*entity) {
                    force.pool.fill();
                }
            }
        }

        if player_controlled {
            if let Some(leader) = gathering.leader() {
                let mut alert = Alert::new(NotificationKind::RitualConcluded, leader.pawn.clone())
                    .with_value(score.quality as f64);
                alert.severity = outcome_severity(score.outcome);
                deliver(&mut *outbox, alert, tick);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Pawn;

    fn setup_world(interval: u64) -> World {
        let mut world = World::new();
        world.insert_resource(SimClock::default());
        world.insert_resource(NotificationOutbox::new());
        world.insert_resource(QualityScorer::from_config(&RitualConfig::default()));
        world.insert_resource(MeditationSchedule::new(interval, 2));
        world
    }

    fn spawn_user(world: &mut World, id: &str, faction: &str, level: Option<u32>) -> Entity {
        let force = match level {
            Some(level) => ForceUser::awakened(level),
            None => ForceUser::latent(),
        };
        world
            .spawn((
                Pawn,
                PawnId(id.into()),
                PawnName(id.to_uppercase()),
                FactionMembership::new(faction, faction == "player_colony"),
                Vitals::new(1.0).seen(),
                force,
            ))
            .id()
    }

    fn run_at(world: &mut World, schedule: &mut Schedule, tick: u64) {
        world.resource_mut::<SimClock>().current_tick = tick;
        schedule.run(world);
    }

    #[test]
    fn test_schedule_due_and_advance() {
        let mut schedule = MeditationSchedule::new(100, 2);
        assert!(!schedule.is_due("jedi", 0));
        schedule.schedule("jedi", 100);
        assert!(!schedule.is_due("jedi", 99));
        assert!(schedule.is_due("jedi", 100));
        schedule.advance("jedi");
        assert_eq!(schedule.next_meditation("jedi"), Some(200));
    }

    #[test]
    fn test_meditation_restores_pools_and_notifies() {
        let mut world = setup_world(10);
        let mut pawns = Vec::new();
        for (i, level) in [8, 12, 10, 9].into_iter().enumerate() {
            pawns.push(spawn_user(&mut world, &format!("pawn_{}", i), "player_colony", Some(level)));
        }
        for pawn in &pawns {
            world.get_mut::<ForceUser>(*pawn).unwrap().pool.current = 0.0;
        }
        let mut schedule = Schedule::default();
        schedule.add_systems(run_meditation_rituals);

        run_at(&mut world, &mut schedule, 0);
        assert_eq!(world.resource::<MeditationSchedule>().held, 0);

        run_at(&mut world, &mut schedule, 10);
        assert_eq!(world.resource::<MeditationSchedule>().held, 1);
        for pawn in &pawns {
            assert!(world.get::<ForceUser>(*pawn).unwrap().pool.is_full());
        }

        let outbox = world.resource::<NotificationOutbox>();
        assert_eq!(outbox.len(), 1);
        let note = &outbox.pending()[0];
        assert_eq!(note.kind, NotificationKind::RitualConcluded);
        assert_eq!(note.pawn.pawn_id, "pawn_1");
        // 0.2 base + 0.2 participants + 0.29 level + 0.15 leader
        assert_eq!(note.severity, Severity::Positive);
    }

    #[test]
    fn test_too_few_participants_skips() {
        let mut world = setup_world(10);
        spawn_user(&mut world, "pawn_a", "player_colony", Some(3));
        spawn_user(&mut world, "pawn_b", "player_colony", None);
        let mut schedule = Schedule::default();
        schedule.add_systems(run_meditation_rituals);

        run_at(&mut world, &mut schedule, 0);
        run_at(&mut world, &mut schedule, 10);
        assert_eq!(world.resource::<MeditationSchedule>().held, 0);
        assert_eq!(world.resource::<MeditationSchedule>().next_meditation("player_colony"), Some(20));
        assert!(world.resource::<NotificationOutbox>().is_empty());
    }

    #[test]
    fn test_other_factions_are_silent() {
        let mut world = setup_world(10);
        spawn_user(&mut world, "pawn_a", "sith_cell", Some(3));
        spawn_user(&mut world, "pawn_b", "sith_cell", Some(4));
        let mut schedule = Schedule::default();
        schedule.add_systems(run_meditation_rituals);

        run_at(&mut world, &mut schedule, 0);
        run_at(&mut world, &mut schedule, 10);
        assert_eq!(world.resource::<MeditationSchedule>().held, 1);
        assert!(world.resource::<NotificationOutbox>().is_empty());
    }
}
