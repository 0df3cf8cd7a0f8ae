//! ECS Components
//!
//! Pawn identity, vitals, Force data, progression state and appearance.

pub mod appearance;
pub mod force;
pub mod pawn;

pub use appearance::*;
pub use force::*;
pub use pawn::*;
