//! Meditation Ritual Scoring
//!
//! A gathering's quality is a base value plus the clamped contribution of
//! each [`QualityFactor`], clamped again to `[0, 1]`, then bucketed into a
//! [`RitualOutcome`].

use bevy_ecs::prelude::*;
use force_events::PawnRef;
use serde::{Deserialize, Serialize};

use crate::config::RitualConfig;

/// One pawn taking part in a gathering
#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    pub pawn: PawnRef,
    /// `None` for pawns that are not Force users
    pub force_level: Option<u32>,
}

/// Who attended a faction's meditation
#[derive(Debug, Clone, PartialEq)]
pub struct RitualGathering {
    pub faction_id: String,
    pub participants: Vec<Participant>,
    /// Index into `participants` of the pawn leading the meditation
    pub leader: Option<usize>,
}

impl RitualGathering {
    pub fn leader(&self) -> Option<&Participant> {
        self.leader.and_then(|i| self.participants.get(i))
    }

    /// Mean Force level over participants that have one.
    pub fn mean_force_level(&self) -> f32 {
        let levels: Vec<u32> = self
            .participants
            .iter()
            .filter_map(|p| p.force_level)
            .collect();
        if levels.is_empty() {
            return 0.0;
        }
        levels.iter().sum::<u32>() as f32 / levels.len() as f32
    }
}

/// One term of the quality sum.
pub trait QualityFactor: Send + Sync {
    fn label(&self) -> &'static str;
    fn max_contribution(&self) -> f32;
    /// Unclamped contribution for this gathering.
    fn raw(&self, gathering: &RitualGathering) -> f32;

    fn contribution(&self, gathering: &RitualGathering) -> f32 {
        self.raw(gathering).clamp(0.0, self.max_contribution().max(0.0))
    }
}

/// More participants, better meditation
pub struct ParticipantCount {
    pub per_participant: f32,
    pub cap: f32,
}

impl QualityFactor for ParticipantCount {
    fn label(&self) -> &'static str {
        "participants"
    }

    fn max_contribution(&self) -> f32 {
        self.cap
    }

    fn raw(&self, gathering: &RitualGathering) -> f32 {
        gathering.participants.len() as f32 * self.per_participant
    }
}

/// Experienced Force users deepen the meditation
pub struct MeanForceLevel {
    pub per_level: f32,
    pub cap: f32,
}

impl QualityFactor for MeanForceLevel {
    fn label(&self) -> &'static str {
        "mean_force_level"
    }

    fn max_contribution(&self) -> f32 {
        self.cap
    }

    fn raw(&self, gathering: &RitualGathering) -> f32 {
        gathering.mean_force_level() * self.per_level
    }
}

/// Flat bonus when the leader is a Force user
pub struct ForceLeader {
    pub bonus: f32,
}

impl QualityFactor for ForceLeader {
    fn label(&self) -> &'static str {
        "force_leader"
    }

    fn max_contribution(&self) -> f32 {
        self.bonus
    }

    fn raw(&self, gathering: &RitualGathering) -> f32 {
        match gathering.leader() {
            Some(leader) if leader.force_level.is_some() => self.bonus,
            _ => 0.0,
        }
    }
}

/// Quality bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RitualOutcome {
    Terrible,
    Poor,
    Decent,
    Good,
    Excellent,
}

impl RitualOutcome {
    pub fn from_quality(quality: f32) -> Self {
        match quality {
            q if q >= 0.9 => RitualOutcome::Excellent,
            q if q >= 0.7 => RitualOutcome::Good,
            q if q >= 0.45 => RitualOutcome::Decent,
            q if q >= 0.2 => RitualOutcome::Poor,
            _ => RitualOutcome::Terrible,
        }
    }

    /// Decent or better meditations refill participants' Force pools.
    pub fn restores_pools(&self) -> bool {
        *self >= RitualOutcome::Decent
    }
}

/// Scored gathering with a per-factor breakdown
#[derive(Debug, Clone, PartialEq)]
pub struct RitualScore {
    pub quality: f32,
    pub outcome: RitualOutcome,
    pub breakdown: Vec<(&'static str, f32)>,
}

#[derive(Resource)]
pub struct QualityScorer {
    base: f32,
    factors: Vec<Box<dyn QualityFactor>>,
}

impl QualityScorer {
    pub fn new(base: f32) -> Self {
        Self {
            base,
            factors: Vec::new(),
        }
    }

    pub fn with_factor(mut self, factor: impl QualityFactor + 'static) -> Self {
        self.factors.push(Box::new(factor));
        self
    }

    /// The stock factor set, tuned from config.
    pub fn from_config(config: &RitualConfig) -> Self {
        Self::new(config.base_quality)
            .with_factor(ParticipantCount {
                per_participant: config.per_participant,
                cap: config.participant_cap,
            })
            .with_factor(MeanForceLevel {
                per_level: config.per_mean_level,
                cap: config.level_cap,
            })
            .with_factor(ForceLeader {
                bonus: config.leader_bonus,
            })
    }

    pub fn score(&self, gathering: &RitualGathering) -> RitualScore {
        let breakdown: Vec<(&'static str, f32)> = self
            .factors
            .iter()
            .map(|f| (f.label(), f.contribution(gathering)))
            .collect();
        let quality = (self.base + breakdown.iter().map(|(_, c)| c).sum::<f32>()).clamp(0.0, 1.0);
        RitualScore {
            quality,
            outcome: RitualOutcome::from_quality(quality),
            breakdown,
        }
    }
}

impl std::fmt::Debug for QualityScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let labels: Vec<&str> = self.factors.iter().map(|f| f.label()).collect();
        f.debug_struct("QualityScorer")
            .field("base", &self.base)
            .field("factors", &labels)
            .finish()
    }
}
