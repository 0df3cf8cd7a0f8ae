//! Force Jobs
//!
//! Multi-step Force actions run as a [`StepSequence`] pumped once per tick.
//! The only job today is the appearance copy: focus for a while, then take
//! on another pawn's look for a limited time.

use bevy_ecs::prelude::*;
use force_events::{NotificationKind, DAYS_PER_SEASON, SEASONS_PER_YEAR, TICKS_PER_HOUR};

use crate::components::{
    pawn_ref, Appearance, AppearanceOverride, AppearanceSnapshot, FactionMembership, ForceUser,
    PawnId, PawnName, Vitals,
};
use crate::config::AppearanceConfig;
use crate::events::{deliver, Alert, NotificationOutbox};
use crate::progression::mtb_chance;
use crate::random::RandomSource;
use crate::sequence::{Step, StepEvent, StepSequence};
use crate::{SimClock, SimRng};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobAction {
    /// One channelling beat
    Focus,
    /// Take on `source`'s look for `duration_ticks`
    CopyAppearance { source: Entity, duration_ticks: u64 },
}

/// A Force job in progress on a pawn
#[derive(Component, Debug, Clone)]
pub struct ForceJob {
    pub label: &'static str,
    pub steps: StepSequence<JobAction>,
}

impl ForceJob {
    /// Focus for `channel_ticks`, then copy `source`.
    pub fn copy_appearance(source: Entity, channel_ticks: u32, duration_ticks: u64) -> Self {
        Self {
            label: "copy_appearance",
            steps: StepSequence::new(vec![
                Step::new(channel_ticks, JobAction::Focus),
                Step::new(0, JobAction::CopyAppearance { source, duration_ticks }),
            ]),
        }
    }
}

/// Advances every job by one tick and removes finished ones.
///
/// Jobs on pawns that are no longer active are cancelled, as are copies
/// whose source is gone or dead.
pub fn pump_force_jobs(
    mut commands: Commands,
    clock: Res<SimClock>,
    mut outbox: ResMut<NotificationOutbox>,
    mut jobs: Query<(
        Entity,
        &PawnId,
        &PawnName,
        &FactionMembership,
        &Vitals,
        &mut ForceJob,
    )>,
    mut looks: Query<(&mut Appearance, Option<&mut AppearanceOverride>)>,
    others: Query<(&PawnId, &Vitals)>,
) {
    for (entity, id, name, faction, vitals, mut job) in &mut jobs {
        if !vitals.is_active() && !job.steps.is_finished() {
            tracing::debug!("Cancelling {} on inactive pawn {}", job.label, id.0);
            job.steps.cancel();
        }

        match job.steps.pump() {
            StepEvent::Waiting => {}
            StepEvent::Act(JobAction::Focus) => {
                tracing::debug!("{} focuses ({})", id.0, job.label);
            }
            StepEvent::Act(JobAction::CopyAppearance {
                source,
                duration_ticks,
            }) => {
                let source_id = match others.get(source) {
                    Ok((source_id, source_vitals)) if source_vitals.alive && source != entity => {
                        source_id.0.clone()
                    }
                    _ => {
                        tracing::debug!("Copy source for {} is unavailable; cancelling", id.0);
                        job.steps.cancel();
                        continue;
                    }
                };
                let Ok((source_look, _)) = looks.get(source) else {
                    job.steps.cancel();
                    continue;
                };
                let copied = AppearanceSnapshot::capture_from(source_look);
                let Ok((mut look, existing)) = looks.get_mut(entity) else {
                    job.steps.cancel();
                    continue;
                };

                let expires_at = Some(clock.current_tick.saturating_add(duration_ticks));
                match existing {
                    // Already disguised: keep the pawn's true original
                    Some(mut over) => {
                        copied.apply_to(&mut look);
                        over.copied_from = source_id.clone();
                        over.expires_at = expires_at;
                    }
                    None => {
                        let over =
                            AppearanceOverride::apply(&mut look, &copied, source_id.clone(), expires_at);
                        commands.entity(entity).insert(over);
                    }
                }

                tracing::info!("{} took on the appearance of {}", name.0, source_id);
                if faction.player_controlled {
                    deliver(
                        &mut *outbox,
                        Alert::new(NotificationKind::AppearanceCopied, pawn_ref(id, name, faction)),
                        clock.current_tick,
                    );
                }
            }
            StepEvent::Finished => {
                commands.entity(entity).remove::<ForceJob>();
            }
        }
    }
}

/// Once per in-game hour, eligible Force users may start copying a
/// random other pawn.
pub fn start_disguise_jobs(
    mut commands: Commands,
    clock: Res<SimClock>,
    settings: Res<AppearanceConfig>,
    mut rng: ResMut<SimRng>,
    casters: Query<
        (Entity, &PawnId, &Vitals, &ForceUser),
        (With<Appearance>, Without<ForceJob>, Without<AppearanceOverride>),
    >,
    targets: Query<(Entity, &PawnId, &Vitals), With<Appearance>>,
) {
    if clock.current_tick == 0 || clock.current_tick % TICKS_PER_HOUR != 0 {
        return;
    }
    let days_per_year = (DAYS_PER_SEASON as u32 * SEASONS_PER_YEAR as u32) as f32;
    let p = mtb_chance(
        settings.mean_days_between_copies / days_per_year,
        1.0,
        TICKS_PER_HOUR as u32,
    );

    let mut sources: Vec<(Entity, &PawnId)> = targets
        .iter()
        .filter(|(_, _, vitals)| vitals.is_active())
        .map(|(entity, id, _)| (entity, id))
        .collect();
    sources.sort_by(|a, b| a.1 .0.cmp(&b.1 .0));

    let mut casters: Vec<_> = casters.iter().collect();
    casters.sort_by(|a, b| a.1 .0.cmp(&b.1 .0));

    for (entity, id, vitals, force) in casters {
        let eligible = vitals.is_active()
            && force.is_force_user()
            && force.level.is_some_and(|level| level >= settings.min_level);
        if !eligible || !rng.0.chance(p) {
            continue;
        }
        let candidates: Vec<&(Entity, &PawnId)> =
            sources.iter().filter(|(other, _)| *other != entity).collect();
        if candidates.is_empty() {
            continue;
        }
        let (source, source_id) = candidates[rng.0.below(candidates.len() as u32) as usize];
        tracing::debug!("{} begins focusing on {}", id.0, source_id.0);
        commands.entity(entity).insert(ForceJob::copy_appearance(
            *source,
            settings.channel_ticks,
            settings.copy_duration_ticks,
        ));
    }
}
