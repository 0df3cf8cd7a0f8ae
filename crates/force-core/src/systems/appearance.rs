//! Appearance Override Systems
//!
//! An [`AppearanceOverride`] is released by removing the component. The
//! `on_remove` hook registered here puts the original look back no matter
//! what removed it: expiry, death, an explicit remove or a despawn.

use bevy_ecs::component::ComponentId;
use bevy_ecs::prelude::*;
use bevy_ecs::world::DeferredWorld;
use force_events::NotificationKind;

use crate::components::{
    pawn_ref, Appearance, AppearanceOverride, FactionMembership, PawnId, PawnName, Vitals,
};
use crate::events::{deliver, Alert, NotificationOutbox};
use crate::SimClock;

/// Installs the restore hook. Must run before any override is inserted.
pub fn register_appearance_hooks(world: &mut World) {
    world
        .register_component_hooks::<AppearanceOverride>()
        .on_remove(restore_original_appearance);
}

fn restore_original_appearance(mut world: DeferredWorld, entity: Entity, _: ComponentId) {
    let Some(over) = world.get::<AppearanceOverride>(entity).cloned() else {
        return;
    };

    let restored = match world.get_mut::<Appearance>(entity) {
        Some(mut appearance) => over.restore(&mut appearance),
        None => false,
    };
    tracing::debug!(
        "Released appearance copied from {} on {:?} (changed: {})",
        over.copied_from,
        entity,
        restored
    );
    if !restored {
        return;
    }

    let who = match (
        world.get::<PawnId>(entity),
        world.get::<PawnName>(entity),
        world.get::<FactionMembership>(entity),
    ) {
        (Some(id), Some(name), Some(faction)) if faction.player_controlled => {
            pawn_ref(id, name, faction)
        }
        _ => return,
    };
    let tick = world
        .get_resource::<SimClock>()
        .map_or(0, |clock| clock.current_tick);
    if let Some(mut outbox) = world.get_resource_mut::<NotificationOutbox>() {
        deliver(
            &mut *outbox,
            Alert::new(NotificationKind::AppearanceRestored, who),
            tick,
        );
    }
}

/// Removes overrides whose expiry tick has passed.
pub fn expire_appearance_overrides(
    mut commands: Commands,
    clock: Res<SimClock>,
    query: Query<(Entity, &AppearanceOverride)>,
) {
    for (entity, over) in &query {
        if over.is_expired(clock.current_tick) {
            commands.entity(entity).remove::<AppearanceOverride>();
        }
    }
}

/// Dead pawns drop any borrowed look.
pub fn release_overrides_on_death(
    mut commands: Commands,
    query: Query<(Entity, &Vitals), With<AppearanceOverride>>,
) {
    for (entity, vitals) in &query {
        if !vitals.alive {
            commands.entity(entity).remove::<AppearanceOverride>();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{AppearanceSnapshot, BodyType, Color, Pawn};

    fn setup_world() -> World {
        let mut world = World::new();
        register_appearance_hooks(&mut world);
        world.insert_resource(SimClock::default());
        world.insert_resource(NotificationOutbox::new());
        world
    }

    fn own_look() -> Appearance {
        let mut a = Appearance::new("male_narrow_pointy", BodyType::Hulk, "shaved");
        a.beard = Some("full".into());
        a
    }

    fn copied_look() -> AppearanceSnapshot {
        let mut a = Appearance::new("female_average_normal", BodyType::Thin, "braid");
        a.skin_color_override = Some(Color::rgb(0.3, 0.5, 0.9));
        a.body_tattoo = Some("sith_glyphs".into());
        AppearanceSnapshot::capture_from(&a)
    }

    fn spawn_disguised(world: &mut World, expires_at: Option<u64>) -> Entity {
        let mut appearance = own_look();
        let over = AppearanceOverride::apply(&mut appearance, &copied_look(), "pawn_0002", expires_at);
        world
            .spawn((
                Pawn,
                PawnId("pawn_0001".into()),
                PawnName("Vos".into()),
                FactionMembership::new("player_colony", true),
                Vitals::new(1.0).seen(),
                appearance,
                over,
            ))
            .id()
    }

    fn assert_original(world: &World, entity: Entity) {
        let appearance = world.get::<Appearance>(entity).unwrap();
        assert!(AppearanceSnapshot::capture_from(&own_look()).matches(appearance));
    }

    #[test]
    fn test_expiry_restores() {
        let mut world = setup_world();
        let pawn = spawn_disguised(&mut world, Some(5));
        let mut schedule = Schedule::default();
        schedule.add_systems(expire_appearance_overrides);

        world.resource_mut::<SimClock>().current_tick = 4;
        schedule.run(&mut world);
        assert!(world.get::<AppearanceOverride>(pawn).is_some());

        world.resource_mut::<SimClock>().current_tick = 5;
        schedule.run(&mut world);
        assert!(world.get::<AppearanceOverride>(pawn).is_none());
        assert_original(&world, pawn);
        assert!(world.get::<Appearance>(pawn).unwrap().graphics_dirty);

        let outbox = world.resource::<NotificationOutbox>();
        assert_eq!(outbox.len(), 1);
        assert_eq!(outbox.pending()[0].kind, NotificationKind::AppearanceRestored);
        assert_eq!(outbox.pending()[0].timestamp.tick, 5);
    }

    #[test]
    fn test_death_restores() {
        let mut world = setup_world();
        let pawn = spawn_disguised(&mut world, None);
        world.get_mut::<Vitals>(pawn).unwrap().kill();

        let mut schedule = Schedule::default();
        schedule.add_systems(release_overrides_on_death);
        schedule.run(&mut world);

        assert!(world.get::<AppearanceOverride>(pawn).is_none());
        assert_original(&world, pawn);
    }

    #[test]
    fn test_forced_removal_restores() {
        let mut world = setup_world();
        let pawn = spawn_disguised(&mut world, None);
        world.entity_mut(pawn).remove::<AppearanceOverride>();
        assert_original(&world, pawn);
    }

    #[test]
    fn test_despawn_runs_hook() {
        let mut world = setup_world();
        let pawn = spawn_disguised(&mut world, None);
        assert!(world.despawn(pawn));
        assert_eq!(world.resource::<NotificationOutbox>().len(), 1);
    }

    #[test]
    fn test_unchanged_appearance_is_silent() {
        let mut world = setup_world();
        let mut appearance = own_look();
        let same = AppearanceSnapshot::capture_from(&appearance);
        let over = AppearanceOverride::apply(&mut appearance, &same, "pawn_0001", None);
        let pawn = world
            .spawn((
                PawnId("pawn_0001".into()),
                PawnName("Vos".into()),
                FactionMembership::new("player_colony", true),
                appearance,
                over,
            ))
            .id();

        world.entity_mut(pawn).remove::<AppearanceOverride>();
        assert!(!world.get::<Appearance>(pawn).unwrap().graphics_dirty);
        assert!(world.resource::<NotificationOutbox>().is_empty());
    }
}
