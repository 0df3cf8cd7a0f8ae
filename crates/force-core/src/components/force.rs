//! Force Components
//!
//! Sensitivity traits, level, ability points and the Force pool.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Traits relevant to Force use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForceTrait {
    /// Awakened sensitivity; makes the pawn a Force user
    ForceSensitive,
    /// Inherited potential carried by pawns that may awaken later
    LatentPotential,
}

impl ForceTrait {
    pub fn grants_force_use(&self) -> bool {
        matches!(self, ForceTrait::ForceSensitive)
    }
}

/// Force resource pool
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForcePool {
    pub current: f32,
    pub capacity: f32,
}

impl ForcePool {
    pub fn new(capacity: f32) -> Self {
        Self {
            current: 0.0,
            capacity: capacity.max(0.0),
        }
    }

    pub fn fill(&mut self) {
        self.current = self.capacity;
    }

    pub fn is_full(&self) -> bool {
        self.current >= self.capacity
    }
}

impl Default for ForcePool {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Per-pawn Force data.
///
/// Whether the pawn counts as a Force user is derived from its traits and
/// memoized here; every trait mutation goes through this type so the memo
/// is dropped exactly when the underlying fact can change.
#[derive(Component, Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForceUser {
    traits: Vec<ForceTrait>,
    /// Current Force level; `None` until the pawn's Force data is set up
    pub level: Option<u32>,
    pub ability_points: u32,
    pub pool: ForcePool,
    #[serde(skip)]
    sensitivity: OnceLock<bool>,
}

impl ForceUser {
    /// A pawn with no Force traits.
    pub fn dormant() -> Self {
        Self::default()
    }

    /// A pawn that may awaken later.
    pub fn latent() -> Self {
        Self::dormant().with_trait(ForceTrait::LatentPotential)
    }

    /// An already awakened pawn at the given level.
    pub fn awakened(level: u32) -> Self {
        let mut force = Self::dormant().with_trait(ForceTrait::ForceSensitive);
        force.level = Some(level);
        force.pool.fill();
        force
    }

    pub fn with_trait(mut self, force_trait: ForceTrait) -> Self {
        self.add_trait(force_trait);
        self
    }

    pub fn traits(&self) -> &[ForceTrait] {
        &self.traits
    }

    pub fn has_trait(&self, force_trait: ForceTrait) -> bool {
        self.traits.contains(&force_trait)
    }

    /// Adds a trait; returns false if the pawn already had it.
    pub fn add_trait(&mut self, force_trait: ForceTrait) -> bool {
        if self.has_trait(force_trait) {
            return false;
        }
        self.traits.push(force_trait);
        self.sensitivity.take();
        true
    }

    pub fn remove_trait(&mut self, force_trait: ForceTrait) -> bool {
        let before = self.traits.len();
        self.traits.retain(|t| *t != force_trait);
        let removed = self.traits.len() != before;
        if removed {
            self.sensitivity.take();
        }
        removed
    }

    /// Memoized Force-user check.
    pub fn is_force_user(&self) -> bool {
        *self
            .sensitivity
            .get_or_init(|| self.traits.iter().any(ForceTrait::grants_force_use))
    }

    /// Whether the memo currently holds a value.
    pub fn sensitivity_cached(&self) -> bool {
        self.sensitivity.get().is_some()
    }

    /// Grants Force sensitivity. Returns false (and changes nothing) when the
    /// pawn already had it. A pawn without Force data starts at level 1.
    pub fn grant_sensitivity(&mut self) -> bool {
        if !self.add_trait(ForceTrait::ForceSensitive) {
            return false;
        }
        self.level.get_or_insert(1);
        true
    }
}
