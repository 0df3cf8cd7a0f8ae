//! Save and Load
//!
//! Progression state goes through an opaque key-value [`SaveRecord`] so that
//! missing or mistyped keys fall back to safe defaults instead of failing the
//! load. Whole worlds are written as a JSON [`SaveGame`].

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::components::{
    Appearance, AppearanceOverride, Archetype, FactionMembership, ForceUser, Pawn, PawnId,
    PawnName, Vitals,
};
use crate::progression::{ProgressionState, CHECK_INTERVAL};
use crate::systems::ProgressionSettings;

/// Current save format version
pub const SAVE_VERSION: u32 = 1;

const KEY_TICKS_UNTIL_NEXT_CHECK: &str = "ticks_until_next_check";
const KEY_INITIALIZED: &str = "initialized";

/// Opaque key-value record handed to the save system
pub type SaveRecord = serde_json::Map<String, Value>;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported save version {0}")]
    UnsupportedVersion(u32),
}

impl ProgressionState {
    /// Writes the persisted fields into `record`.
    pub fn expose(&self, record: &mut SaveRecord) {
        record.insert(
            KEY_TICKS_UNTIL_NEXT_CHECK.to_string(),
            Value::from(self.ticks_until_next_check),
        );
        record.insert(KEY_INITIALIZED.to_string(), Value::from(self.initialized));
    }

    /// Reads the persisted fields back for a pawn checked every
    /// `check_interval` ticks. Missing or mistyped keys default to a full
    /// countdown and `initialized = false`; the countdown is clamped to
    /// `[0, check_interval]`.
    pub fn restore(record: &SaveRecord, check_interval: u32) -> Self {
        let check_interval = check_interval.max(1);
        let ticks = record
            .get(KEY_TICKS_UNTIL_NEXT_CHECK)
            .and_then(Value::as_u64)
            .map(|t| t.min(check_interval as u64) as u32)
            .unwrap_or(check_interval);
        let initialized = record
            .get(KEY_INITIALIZED)
            .and_then(Value::as_bool)
            .unwrap_or(false);
        ProgressionState::new(ticks, initialized)
    }
}

/// One pawn as written to disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PawnSave {
    pub id: PawnId,
    pub name: PawnName,
    pub faction: FactionMembership,
    pub vitals: Vitals,
    #[serde(default)]
    pub archetype: Option<Archetype>,
    #[serde(default)]
    pub force: ForceUser,
    #[serde(default)]
    pub appearance: Option<Appearance>,
    #[serde(default)]
    pub appearance_override: Option<AppearanceOverride>,
    /// Present for pawns carrying progression
    #[serde(default)]
    pub progression: Option<SaveRecord>,
}

/// A whole world as written to disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveGame {
    pub version: u32,
    pub tick: u64,
    pub pawns: Vec<PawnSave>,
}

/// Collects every pawn in the world, ordered by id.
pub fn capture_save(world: &mut World, tick: u64) -> SaveGame {
    let mut query = world.query_filtered::<(
        &PawnId,
        &PawnName,
        &FactionMembership,
        &Vitals,
        &ForceUser,
        Option<&Archetype>,
        Option<&Appearance>,
        Option<&AppearanceOverride>,
        Option<&ProgressionState>,
    ), With<Pawn>>();

    let mut pawns: Vec<PawnSave> = query
        .iter(world)
        .map(
            |(id, name, faction, vitals, force, archetype, appearance, over, progression)| {
                let progression = progression.map(|state| {
                    let mut record = SaveRecord::new();
                    state.expose(&mut record);
                    record
                });
                PawnSave {
                    id: id.clone(),
                    name: name.clone(),
                    faction: faction.clone(),
                    vitals: *vitals,
                    archetype: archetype.cloned(),
                    force: force.clone(),
                    appearance: appearance.cloned(),
                    appearance_override: over.cloned(),
                    progression,
                }
            },
        )
        .collect();
    pawns.sort_by(|a, b| a.id.0.cmp(&b.id.0));

    SaveGame {
        version: SAVE_VERSION,
        tick,
        pawns,
    }
}

/// Spawns every saved pawn into `world`.
///
/// Countdowns are restored against the world's [`ProgressionSettings`]
/// interval. An override is only restored together with the appearance it
/// belongs to.
pub fn spawn_from_save(world: &mut World, save: &SaveGame) -> Vec<Entity> {
    let check_interval = world
        .get_resource::<ProgressionSettings>()
        .map_or(CHECK_INTERVAL, |settings| settings.check_interval);
    save.pawns
        .iter()
        .map(|pawn| {
            let mut entity = world.spawn((
                Pawn,
                pawn.id.clone(),
                pawn.name.clone(),
                pawn.faction.clone(),
                pawn.vitals,
                pawn.force.clone(),
            ));
            if let Some(archetype) = &pawn.archetype {
                entity.insert(archetype.clone());
            }
            if let Some(record) = &pawn.progression {
                entity.insert(ProgressionState::restore(record, check_interval));
            }
            if let Some(appearance) = &pawn.appearance {
                entity.insert(appearance.clone());
                if let Some(over) = &pawn.appearance_override {
                    entity.insert(over.clone());
                }
            }
            entity.id()
        })
        .collect()
}

pub fn write_save(path: impl AsRef<Path>, save: &SaveGame) -> Result<(), SaveError> {
    let json = serde_json::to_string_pretty(save)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn read_save(path: impl AsRef<Path>) -> Result<SaveGame, SaveError> {
    let content = fs::read_to_string(path)?;
    let save: SaveGame = serde_json::from_str(&content)?;
    if save.version != SAVE_VERSION {
        return Err(SaveError::UnsupportedVersion(save.version));
    }
    Ok(save)
}
