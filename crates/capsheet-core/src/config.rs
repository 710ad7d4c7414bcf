// Run configuration shared by every stage of the cap analysis.

use serde::{Deserialize, Serialize};

/// Number of highest cap hits counted against the ceiling in Top-51 mode.
pub const TOP_51: usize = 51;

/// Immutable configuration for a single analysis run.
///
/// Amounts are expressed in cap units (one unit = $10,000), the same units
/// the roster records carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapConfig {
    /// Season anchor: index 0 of every contract sequence is this year.
    pub current_year: i32,
    /// League salary ceiling before adjustments.
    pub league_cap_limit: i64,
    /// Unused room rolled over from the previous season. May be negative.
    #[serde(default)]
    pub carry_over: i64,
    /// Off-season accounting: only the top 51 cap hits count.
    #[serde(default)]
    pub top51_mode: bool,
    #[serde(default)]
    pub timeline: TimelineOptions,
}

impl CapConfig {
    pub fn new(current_year: i32, league_cap_limit: i64) -> Self {
        CapConfig {
            current_year,
            league_cap_limit,
            carry_over: 0,
            top51_mode: false,
            timeline: TimelineOptions::default(),
        }
    }

    /// The effective ceiling the team total is measured against.
    pub fn cap_ceiling(&self) -> i64 {
        self.league_cap_limit.saturating_add(self.carry_over)
    }
}

/// Controls which players appear in the multi-year projection and how far
/// it reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineOptions {
    /// How many of the highest current-year charges to project.
    #[serde(default = "default_player_count")]
    pub player_count: usize,
    /// Minimum number of seasons shown, even if every contract is shorter.
    #[serde(default = "default_min_horizon")]
    pub min_horizon: usize,
}

fn default_player_count() -> usize {
    15
}

fn default_min_horizon() -> usize {
    5
}

impl Default for TimelineOptions {
    fn default() -> Self {
        TimelineOptions {
            player_count: default_player_count(),
            min_horizon: default_min_horizon(),
        }
    }
}
