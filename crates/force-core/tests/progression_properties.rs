//! Progression model properties and scenarios
//!
//! Exercises the evaluator and scheduler through the public `ForcePawn`
//! seam with scripted random draws.

use force_core::events::{Alert, NotificationSink, NotifyError};
use force_core::progression::{
    mtb_chance, Evaluation, Evaluator, ForcePawn, ProgressionConfig, ProgressionState,
    CHECK_INTERVAL,
};
use force_core::random::ScriptedRandom;
use force_events::{Notification, NotificationKind, PawnRef, SimTimestamp, TICKS_PER_YEAR};

/// Minimal attribute provider standing in for a host pawn
struct StubPawn {
    player_controlled: bool,
    seen: bool,
    active: bool,
    age_rate: Option<f32>,
    force_user: bool,
    level: Option<u32>,
    pool_full: bool,
    ability_points: u32,
}

impl StubPawn {
    fn latent() -> Self {
        Self {
            player_controlled: true,
            seen: true,
            active: true,
            age_rate: Some(1.0),
            force_user: false,
            level: None,
            pool_full: false,
            ability_points: 0,
        }
    }

    fn user(level: u32) -> Self {
        Self {
            force_user: true,
            level: Some(level),
            ..Self::latent()
        }
    }
}

impl ForcePawn for StubPawn {
    fn pawn_ref(&self) -> PawnRef {
        PawnRef::new("pawn_stub", "Stub", "player_colony")
    }
    fn is_active(&self) -> bool {
        self.active
    }
    fn seen_by_player(&self) -> bool {
        self.seen
    }
    fn is_player_controlled(&self) -> bool {
        self.player_controlled
    }
    fn age_rate(&self) -> Option<f32> {
        self.age_rate
    }
    fn is_force_user(&self) -> bool {
        self.force_user
    }
    fn force_level(&self) -> Option<u32> {
        self.level
    }
    fn grant_sensitivity(&mut self) -> bool {
        if self.force_user {
            return false;
        }
        self.force_user = true;
        self.level.get_or_insert(1);
        true
    }
    fn set_force_level(&mut self, level: u32) {
        self.level = Some(level);
    }
    fn fill_force_pool(&mut self) {
        self.pool_full = true;
    }
    fn grant_ability_points(&mut self, points: u32) {
        self.ability_points += points;
    }
}

/// Sink whose every delivery fails
struct BrokenSink;

impl NotificationSink for BrokenSink {
    fn notify(&mut self, _alert: Alert, _at: SimTimestamp) -> Result<(), NotifyError> {
        Err(NotifyError::Closed)
    }
}

fn config(activate_years: f32, level_years: f32, maximum_level: u32, cap: bool) -> ProgressionConfig {
    ProgressionConfig {
        mean_time_to_activate_sensitivity_years: activate_years,
        mean_time_between_level_ups_years: level_years,
        maximum_level,
        cap_at_maximum: cap,
    }
}

#[test]
fn test_mtb_monotonicity() {
    let rates = [0.1f32, 0.5, 1.0, 2.0];
    let intervals = [1_000u32, 60_000, 600_000];
    let means = [0.5f32, 5.0, 50.0];

    for &m in &means {
        for &i in &intervals {
            for pair in rates.windows(2) {
                assert!(mtb_chance(m, pair[0], i) <= mtb_chance(m, pair[1], i));
            }
        }
        for pair in intervals.windows(2) {
            assert!(mtb_chance(m, 1.0, pair[0]) <= mtb_chance(m, 1.0, pair[1]));
        }
    }
    for pair in means.windows(2) {
        assert!(mtb_chance(pair[0], 1.0, 60_000) >= mtb_chance(pair[1], 1.0, 60_000));
    }
}

#[test]
fn test_scenario_activation_threshold() {
    // A 3.6M-tick year makes M=10, r=1 come out at 1/600 per check; an age
    // rate of 0.06 brings the check probability to 0.0001.
    assert_eq!(TICKS_PER_YEAR, 3_600_000);
    let p = mtb_chance(10.0, 0.06, CHECK_INTERVAL);
    assert!((p - 0.0001).abs() < 1e-9);

    let eval = Evaluator::new(config(10.0, 1.0, 20, true), CHECK_INTERVAL);

    let mut pawn = StubPawn::latent();
    pawn.age_rate = Some(0.06);
    let mut notes: Vec<Notification> = Vec::new();
    let fired = eval.evaluate(&mut pawn, &mut ScriptedRandom::constant(0.00005), &mut notes, 0);
    assert_eq!(fired, Evaluation::Awakened);
    assert!(pawn.force_user && pawn.pool_full);
    assert_eq!(pawn.ability_points, 1);

    let mut pawn = StubPawn::latent();
    pawn.age_rate = Some(0.06);
    let missed = eval.evaluate(&mut pawn, &mut ScriptedRandom::constant(0.0002), &mut notes, 0);
    assert_eq!(missed, Evaluation::NoChange);
    assert!(!pawn.force_user);
}

#[test]
fn test_scenario_capped_pawn_draws_nothing() {
    let eval = Evaluator::new(config(10.0, 0.0, 5, true), CHECK_INTERVAL);
    let mut pawn = StubPawn::user(5);
    let mut rng = ScriptedRandom::constant(0.0);
    let mut notes: Vec<Notification> = Vec::new();

    for tick in 0..10 {
        assert_eq!(eval.evaluate(&mut pawn, &mut rng, &mut notes, tick), Evaluation::AtMaximum);
    }
    assert_eq!(pawn.level, Some(5));
    assert_eq!(rng.draws_taken(), 0);
    assert!(notes.is_empty());
}

#[test]
fn test_scenario_degenerate_level_up_mean() {
    let eval = Evaluator::new(config(10.0, 0.0, 50, true), CHECK_INTERVAL);
    let mut pawn = StubPawn::user(1);
    let mut notes: Vec<Notification> = Vec::new();

    let result = eval.evaluate(&mut pawn, &mut ScriptedRandom::constant(0.999_999), &mut notes, 0);
    assert_eq!(
        result,
        Evaluation::LeveledUp {
            level: 2,
            reached_maximum: false
        }
    );
    assert_eq!(mtb_chance(0.0, 1.0, CHECK_INTERVAL), 1.0);
    assert_eq!(mtb_chance(-3.0, 1.0, CHECK_INTERVAL), 1.0);
    assert_eq!(mtb_chance(1.0, 0.0, CHECK_INTERVAL), 1.0);
}

#[test]
fn test_activation_and_level_up_are_exclusive() {
    let eval = Evaluator::new(config(0.0, 0.0, 50, true), CHECK_INTERVAL);
    let mut pawn = StubPawn::latent();
    let mut rng = ScriptedRandom::constant(0.0);
    let mut notes: Vec<Notification> = Vec::new();

    assert_eq!(eval.evaluate(&mut pawn, &mut rng, &mut notes, 0), Evaluation::Awakened);
    assert_eq!(pawn.level, Some(1));
    assert_eq!(rng.draws_taken(), 1);

    assert!(matches!(
        eval.evaluate(&mut pawn, &mut rng, &mut notes, 1),
        Evaluation::LeveledUp { level: 2, .. }
    ));
    assert_eq!(pawn.ability_points, 1);
}

#[test]
fn test_level_rises_by_one_per_check_and_respects_cap() {
    let eval = Evaluator::new(config(0.0, 0.0, 7, true), 10);
    let mut pawn = StubPawn::user(1);
    let mut rng = ScriptedRandom::constant(0.0);
    let mut notes: Vec<Notification> = Vec::new();
    let mut state = ProgressionState::new(10, true);

    let mut previous = pawn.level.unwrap_or(0);
    for tick in 1..=1_000 {
        state.on_tick(&eval, &mut pawn, &mut rng, &mut notes, tick);
        let level = pawn.level.unwrap_or(0);
        assert!(level <= previous + 1);
        assert!(level <= 7);
        previous = level;
    }
    assert_eq!(pawn.level, Some(7));

    let maxed = notes
        .iter()
        .filter(|n| n.kind == NotificationKind::MaximumLevelReached)
        .count();
    assert_eq!(maxed, 1);
}

#[test]
fn test_zero_maximum_caps_awakened_pawn() {
    let eval = Evaluator::new(config(0.0, 0.0, 0, true), 10);
    let mut pawn = StubPawn::latent();
    let mut rng = ScriptedRandom::constant(0.0);
    let mut notes: Vec<Notification> = Vec::new();
    let mut state = ProgressionState::new(10, true);

    for tick in 1..=100 {
        state.on_tick(&eval, &mut pawn, &mut rng, &mut notes, tick);
        assert_eq!(pawn.level.unwrap_or(0), 0);
    }
    assert!(pawn.force_user);
    assert_eq!(pawn.level, Some(0));
    let maxed = notes
        .iter()
        .filter(|n| n.kind == NotificationKind::MaximumLevelReached)
        .count();
    assert_eq!(maxed, 1);
}

#[test]
fn test_uncapped_pawn_passes_maximum() {
    let eval = Evaluator::new(config(0.0, 0.0, 3, false), CHECK_INTERVAL);
    let mut pawn = StubPawn::user(1);
    let mut rng = ScriptedRandom::constant(0.0);
    let mut notes: Vec<Notification> = Vec::new();

    for tick in 0..5 {
        eval.evaluate(&mut pawn, &mut rng, &mut notes, tick);
    }
    assert_eq!(pawn.level, Some(6));
    let maxed = notes
        .iter()
        .filter(|n| n.kind == NotificationKind::MaximumLevelReached)
        .count();
    assert_eq!(maxed, 1);
}

#[test]
fn test_missing_inputs_skip_without_mutation() {
    let eval = Evaluator::new(config(0.0, 0.0, 10, true), CHECK_INTERVAL);
    let mut rng = ScriptedRandom::constant(0.0);
    let mut notes: Vec<Notification> = Vec::new();

    let mut pawn = StubPawn::latent();
    pawn.age_rate = None;
    assert_eq!(eval.evaluate(&mut pawn, &mut rng, &mut notes, 0), Evaluation::Unavailable);
    assert!(!pawn.force_user);

    let mut pawn = StubPawn::user(1);
    pawn.level = None;
    assert_eq!(eval.evaluate(&mut pawn, &mut rng, &mut notes, 0), Evaluation::Unavailable);
    assert_eq!(pawn.level, None);

    assert_eq!(rng.draws_taken(), 0);
}

#[test]
fn test_failing_sink_does_not_stop_progression() {
    let eval = Evaluator::new(config(0.0, 0.0, 10, true), CHECK_INTERVAL);
    let mut pawn = StubPawn::latent();
    let mut rng = ScriptedRandom::constant(0.0);

    assert_eq!(eval.evaluate(&mut pawn, &mut rng, &mut BrokenSink, 0), Evaluation::Awakened);
    assert!(matches!(
        eval.evaluate(&mut pawn, &mut rng, &mut BrokenSink, 1),
        Evaluation::LeveledUp { level: 2, .. }
    ));
}

#[test]
fn test_non_player_pawns_are_silent() {
    let eval = Evaluator::new(config(0.0, 0.0, 2, true), CHECK_INTERVAL);
    let mut pawn = StubPawn::latent();
    pawn.player_controlled = false;
    let mut rng = ScriptedRandom::constant(0.0);
    let mut notes: Vec<Notification> = Vec::new();

    for tick in 0..3 {
        eval.evaluate(&mut pawn, &mut rng, &mut notes, tick);
    }
    assert_eq!(pawn.level, Some(2));
    assert!(notes.is_empty());
}

#[test]
fn test_hidden_pawn_attach_roll() {
    let eval = Evaluator::new(config(100.0, 100.0, 10, true), CHECK_INTERVAL);
    let mut notes: Vec<Notification> = Vec::new();

    let mut pawn = StubPawn::latent();
    pawn.seen = false;
    let mut state = ProgressionState::default();
    let result = state.on_attach(&eval, &mut pawn, &mut ScriptedRandom::new([0.5, 0.49]), &mut notes, 0);
    assert_eq!(result, Some(Evaluation::Awakened));
    assert!(state.initialized);
    assert!(state.ticks_until_next_check < CHECK_INTERVAL);

    let mut pawn = StubPawn::latent();
    pawn.seen = false;
    let mut state = ProgressionState::default();
    let result = state.on_attach(&eval, &mut pawn, &mut ScriptedRandom::new([0.5, 0.5]), &mut notes, 0);
    assert_eq!(result, Some(Evaluation::NoChange));
    assert!(!pawn.force_user);
}
