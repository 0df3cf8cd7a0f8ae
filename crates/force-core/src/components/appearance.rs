//! Appearance Components
//!
//! A pawn's visual identity, the value snapshot used to copy it between
//! pawns, and the override marker that remembers what to restore.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// RGBA colour with components in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BodyType {
    #[default]
    Standard,
    Thin,
    Hulk,
    Fat,
}

/// Rendered look of a pawn
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appearance {
    pub head_type: String,
    pub body_type: BodyType,
    pub hair: String,
    pub hair_color: Color,
    pub skin_color: Color,
    /// Replaces `skin_color` when set (genes, dyes)
    pub skin_color_override: Option<Color>,
    pub beard: Option<String>,
    pub face_tattoo: Option<String>,
    pub body_tattoo: Option<String>,
    pub fur: Option<String>,
    /// Render cache needs rebuilding
    #[serde(default)]
    pub graphics_dirty: bool,
}

impl Appearance {
    pub fn new(head_type: impl Into<String>, body_type: BodyType, hair: impl Into<String>) -> Self {
        Self {
            head_type: head_type.into(),
            body_type,
            hair: hair.into(),
            hair_color: Color::rgb(0.2, 0.15, 0.1),
            skin_color: Color::rgb(0.85, 0.7, 0.6),
            skin_color_override: None,
            beard: None,
            face_tattoo: None,
            body_tattoo: None,
            fur: None,
            graphics_dirty: false,
        }
    }

    /// Skin colour after applying any override.
    pub fn effective_skin_color(&self) -> Color {
        self.skin_color_override.unwrap_or(self.skin_color)
    }
}

/// Captured visual identity, detached from any pawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppearanceSnapshot {
    pub head_type: String,
    pub body_type: BodyType,
    pub hair: String,
    pub hair_color: Color,
    pub skin_color: Color,
    pub skin_color_override: Option<Color>,
    pub beard: Option<String>,
    pub face_tattoo: Option<String>,
    pub body_tattoo: Option<String>,
    pub fur: Option<String>,
}

impl AppearanceSnapshot {
    pub fn capture_from(appearance: &Appearance) -> Self {
        Self {
            head_type: appearance.head_type.clone(),
            body_type: appearance.body_type,
            hair: appearance.hair.clone(),
            hair_color: appearance.hair_color,
            skin_color: appearance.skin_color,
            skin_color_override: appearance.skin_color_override,
            beard: appearance.beard.clone(),
            face_tattoo: appearance.face_tattoo.clone(),
            body_tattoo: appearance.body_tattoo.clone(),
            fur: appearance.fur.clone(),
        }
    }

    /// Whether `appearance` already looks exactly like this snapshot.
    pub fn matches(&self, appearance: &Appearance) -> bool {
        *self == Self::capture_from(appearance)
    }

    /// Writes the snapshot onto `appearance`. Returns true and marks the
    /// graphics dirty only if something actually changed.
    pub fn apply_to(&self, appearance: &mut Appearance) -> bool {
        if self.matches(appearance) {
            return false;
        }
        appearance.head_type = self.head_type.clone();
        appearance.body_type = self.body_type;
        appearance.hair = self.hair.clone();
        appearance.hair_color = self.hair_color;
        appearance.skin_color = self.skin_color;
        appearance.skin_color_override = self.skin_color_override;
        appearance.beard = self.beard.clone();
        appearance.face_tattoo = self.face_tattoo.clone();
        appearance.body_tattoo = self.body_tattoo.clone();
        appearance.fur = self.fur.clone();
        appearance.graphics_dirty = true;
        true
    }
}

/// Present while a pawn wears another pawn's look.
///
/// Holds the pawn's own appearance; removing the component from the entity
/// (for any reason) restores it, see `systems::appearance`.
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppearanceOverride {
    pub original: AppearanceSnapshot,
    /// Pawn id whose appearance was copied
    pub copied_from: String,
    /// Tick at which the override lapses; `None` lasts until removed
    pub expires_at: Option<u64>,
}

impl AppearanceOverride {
    /// Captures `appearance` as the original, then applies `copied`.
    pub fn apply(
        appearance: &mut Appearance,
        copied: &AppearanceSnapshot,
        copied_from: impl Into<String>,
        expires_at: Option<u64>,
    ) -> Self {
        let original = AppearanceSnapshot::capture_from(appearance);
        copied.apply_to(appearance);
        Self {
            original,
            copied_from: copied_from.into(),
            expires_at,
        }
    }

    /// Puts the original look back.
    pub fn restore(&self, appearance: &mut Appearance) -> bool {
        self.original.apply_to(appearance)
    }

    pub fn is_expired(&self, tick: u64) -> bool {
        self.expires_at.is_some_and(|at| tick >= at)
    }
}
