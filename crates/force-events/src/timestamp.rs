//! Simulation Clock Types
//!
//! The simulation only counts ticks; the calendar date is always derived
//! from the tick and carried alongside it for readers of the logs.
//!
//! ```
//! use force_events::{SimTimestamp, Season, TICKS_PER_DAY};
//!
//! let ts = SimTimestamp::at(TICKS_PER_DAY * 16);
//! assert_eq!(ts.date.season, Season::Summer);
//! assert_eq!(ts.date.to_string(), "year 1, summer day 2");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

pub const TICKS_PER_HOUR: u64 = 2_500;

/// 24 hours; also the default progression check interval.
pub const TICKS_PER_DAY: u64 = TICKS_PER_HOUR * 24;

pub const DAYS_PER_SEASON: u8 = 15;

pub const SEASONS_PER_YEAR: u8 = 4;

/// 3,600,000 ticks.
pub const TICKS_PER_YEAR: u64 = TICKS_PER_DAY * DAYS_PER_SEASON as u64 * SEASONS_PER_YEAR as u64;

const SEASONS: [Season; SEASONS_PER_YEAR as usize] =
    [Season::Spring, Season::Summer, Season::Autumn, Season::Winter];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub fn name(&self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
            Season::Winter => "winter",
        }
    }
}

/// Calendar position of a tick. Years and days are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SimDate {
    pub year: u32,
    pub season: Season,
    pub day: u8,
}

impl SimDate {
    pub fn from_tick(tick: u64) -> Self {
        let days = tick / TICKS_PER_DAY;
        let season_count = days / DAYS_PER_SEASON as u64;
        Self {
            year: (season_count / SEASONS_PER_YEAR as u64) as u32 + 1,
            season: SEASONS[(season_count % SEASONS_PER_YEAR as u64) as usize],
            day: (days % DAYS_PER_SEASON as u64) as u8 + 1,
        }
    }
}

impl fmt::Display for SimDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "year {}, {} day {}", self.year, self.season.name(), self.day)
    }
}

/// An absolute tick together with its calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimTimestamp {
    pub tick: u64,
    pub date: SimDate,
}

impl SimTimestamp {
    pub fn at(tick: u64) -> Self {
        Self {
            tick,
            date: SimDate::from_tick(tick),
        }
    }

    pub fn start() -> Self {
        Self::at(0)
    }
}
