//! Pawn Spawning
//!
//! Spawns a demo population spread over a player colony and two non-player
//! Force factions, with randomized looks, ageing rates and Force potential.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;
use rand::Rng;
use std::collections::BTreeMap;

use crate::components::{
    Appearance, Archetype, BodyType, Color, FactionMembership, ForcePool, ForceUser, Pawn, PawnId,
    PawnName, Vitals,
};
use crate::config::ArchetypeRegistry;
use crate::progression::ProgressionState;

/// Faction data: (faction_id, player_controlled, default archetype)
const FACTIONS: &[(&str, bool, &str)] = &[
    ("player_colony", true, "latent_colonist"),
    ("jedi_enclave", false, "jedi_initiate"),
    ("sith_cell", false, "sith_acolyte"),
];

const COLONY_NAMES: &[&str] = &[
    "Kira", "Bodhi", "Jyn", "Cassian", "Rey", "Finn", "Poe", "Rose", "Hera", "Kanan",
    "Sabine", "Ezra", "Zeb", "Wedge", "Biggs", "Jess", "Lando", "Nien", "Tallie", "Mon",
];

const ENCLAVE_NAMES: &[&str] = &[
    "Ahsoka", "Plo", "Kit", "Aayla", "Shaak", "Luminara", "Barriss", "Quinlan", "Depa", "Eeth",
    "Adi", "Saesee", "Stass", "Coleman", "Oppo", "Jocasta", "Tera", "Cal", "Cere", "Eno",
];

const CELL_NAMES: &[&str] = &[
    "Vos", "Tenebrae", "Malak", "Nihil", "Kreia", "Exar", "Ajunta", "Naga", "Marka", "Ludo",
    "Tulak", "Freedon", "Sion", "Traya", "Bane", "Zannah", "Cognus", "Plagueis", "Ventress", "Maul",
];

const HEAD_TYPES: &[&str] = &[
    "male_average_normal", "male_narrow_pointy", "female_average_normal", "female_narrow_wide",
];
const HAIRS: &[&str] = &["shaved", "braid", "bun", "mohawk", "topknot", "long_wavy"];
const BEARDS: &[&str] = &["full", "goatee", "stubble"];
const TATTOOS: &[&str] = &["tribal_cheek", "sith_glyphs", "jedi_sigil"];

/// Get the name list for a faction
fn name_list(faction_id: &str) -> &'static [&'static str] {
    match faction_id {
        "jedi_enclave" => ENCLAVE_NAMES,
        "sith_cell" => CELL_NAMES,
        _ => COLONY_NAMES,
    }
}

fn generate_pawn_id(faction_id: &str, index: usize) -> String {
    format!("pawn_{}_{:04}", faction_id, index)
}

fn pick<'a>(list: &[&'a str], rng: &mut SmallRng) -> &'a str {
    list[rng.gen_range(0..list.len())]
}

fn random_color(rng: &mut SmallRng) -> Color {
    Color::rgb(rng.gen(), rng.gen(), rng.gen())
}

fn generate_appearance(rng: &mut SmallRng) -> Appearance {
    let body_type = match rng.gen_range(0..4) {
        0 => BodyType::Thin,
        1 => BodyType::Hulk,
        2 => BodyType::Fat,
        _ => BodyType::Standard,
    };
    let mut appearance = Appearance::new(pick(HEAD_TYPES, rng), body_type, pick(HAIRS, rng));
    appearance.hair_color = random_color(rng);
    appearance.skin_color = random_color(rng);
    if rng.gen_bool(0.4) {
        appearance.beard = Some(pick(BEARDS, rng).to_string());
    }
    if rng.gen_bool(0.2) {
        appearance.face_tattoo = Some(pick(TATTOOS, rng).to_string());
    }
    appearance
}

/// Non-player factions start with one trained Force user; everyone else is
/// latent or dormant.
fn generate_force(index: usize, player_controlled: bool, rng: &mut SmallRng) -> ForceUser {
    let mut force = if !player_controlled && index == 0 {
        ForceUser::awakened(rng.gen_range(3..8))
    } else if rng.gen_bool(0.5) {
        ForceUser::latent()
    } else {
        ForceUser::dormant()
    };
    let current = force.pool.current;
    force.pool = ForcePool::new(rng.gen_range(50.0..100.0));
    if current > 0.0 {
        force.pool.fill();
    }
    force
}

/// Falls back to any configured archetype if the faction's default is missing.
fn resolve_archetype(default: &str, registry: &ArchetypeRegistry) -> String {
    if registry.get(default).is_some() {
        return default.to_string();
    }
    registry.ids().next().unwrap_or(default).to_string()
}

/// Spawns `count` pawns round-robin over the demo factions.
pub fn spawn_demo_pawns(
    world: &mut World,
    count: usize,
    registry: &ArchetypeRegistry,
    rng: &mut SmallRng,
) -> Vec<Entity> {
    let mut spawned = Vec::with_capacity(count);
    let mut per_faction = [0usize; FACTIONS.len()];

    for i in 0..count {
        let slot = i % FACTIONS.len();
        let (faction_id, player_controlled, default_archetype) = FACTIONS[slot];
        let index = per_faction[slot];
        per_faction[slot] += 1;

        let names = name_list(faction_id);
        let name = format!("{} {}", names[(index + rng.gen_range(0..names.len())) % names.len()], index + 1);

        let mut vitals = Vitals::new(rng.gen_range(0.8..1.2));
        vitals.seen_by_player = player_controlled || rng.gen_bool(0.5);

        let entity = world
            .spawn((
                Pawn,
                PawnId(generate_pawn_id(faction_id, index)),
                PawnName(name),
                FactionMembership::new(faction_id, player_controlled),
                vitals,
                generate_force(index, player_controlled, rng),
                generate_appearance(rng),
                Archetype(resolve_archetype(default_archetype, registry)),
                ProgressionState::default(),
            ))
            .id();
        spawned.push(entity);
    }

    spawned
}

/// Summary of the pawns currently in the world
#[derive(Debug, Default)]
pub struct SpawnSummary {
    pub total_pawns: u32,
    pub force_users: u32,
    pub by_faction: BTreeMap<String, u32>,
    pub by_level: BTreeMap<u32, u32>,
}

pub fn spawn_summary(world: &mut World) -> SpawnSummary {
    let mut summary = SpawnSummary::default();
    let mut query = world.query_filtered::<(&FactionMembership, &ForceUser), With<Pawn>>();

    for (membership, force) in query.iter(world) {
        summary.total_pawns += 1;
        *summary.by_faction.entry(membership.faction_id.clone()).or_insert(0) += 1;
        if force.is_force_user() {
            summary.force_users += 1;
            *summary.by_level.entry(force.level.unwrap_or(0)).or_insert(0) += 1;
        }
    }

    summary
}

impl std::fmt::Display for SpawnSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Total pawns: {} ({} Force users)", self.total_pawns, self.force_users)?;
        writeln!(f, "By faction:")?;
        for (faction, count) in &self.by_faction {
            writeln!(f, "  {}: {}", faction, count)?;
        }
        writeln!(f, "By Force level:")?;
        for (level, count) in &self.by_level {
            writeln!(f, "  {}: {}", level, count)?;
        }
        Ok(())
    }
}
