//! Mean-time-between conversion.

use force_events::TICKS_PER_YEAR;

/// Probability that an event with a mean wait of `mean_years` fires during one
/// check spanning `interval_ticks`, for a pawn ageing at `age_rate`.
///
/// `p = interval / (mean_years * TICKS_PER_YEAR / age_rate)`, clamped to
/// `[0, 1]`. A non-positive or NaN mean or rate means the wait is zero and
/// the check always fires.
pub fn mtb_chance(mean_years: f32, age_rate: f32, interval_ticks: u32) -> f64 {
    let mean_years = mean_years as f64;
    let age_rate = age_rate as f64;
    if !(mean_years > 0.0) || !(age_rate > 0.0) {
        return 1.0;
    }

    let mean_ticks = mean_years * TICKS_PER_YEAR as f64 / age_rate;
    if !(mean_ticks > 0.0) {
        return 1.0;
    }
    (interval_ticks as f64 / mean_ticks).clamp(0.0, 1.0)
}
