// Multi-year cap projection.
//
// Builds the player x season grid behind the contract timeline: one cell per
// player per season with the amount charged that year and the hints a
// renderer needs (void years, the suggested cut year, free agency with
// nothing left on the books).

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use crate::analysis::PlayerAnalysis;
use crate::config::{CapConfig, TimelineOptions};
use crate::unit::Unit;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One player-season in the projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineCell {
    pub year: i32,
    /// Cap hit plus dead money, or the accelerated dead money of a void year.
    pub amount: i64,
    /// Charged at or after free agency.
    pub is_void: bool,
    /// This is the player's suggested cut year.
    pub is_potential_cut: bool,
    /// Free agency starts this year and nothing is charged.
    pub is_free_agent_empty: bool,
    /// `amount` is potential dead money surfacing after free agency rather
    /// than a scheduled cap hit. Applies to Dead rows too.
    pub is_void_burst: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineRow {
    pub id: String,
    pub name: String,
    pub unit: Unit,
    pub fa_year: i32,
    pub potential_out_year: Option<i32>,
    pub cells: Vec<TimelineCell>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub years: Vec<i32>,
    pub rows: Vec<TimelineRow>,
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// The `count` players with the largest current-season charge (cap hit plus
/// dead money). Equal charges keep input order.
pub fn select_core_players(players: &[PlayerAnalysis], count: usize) -> Vec<&PlayerAnalysis> {
    let mut sorted: Vec<&PlayerAnalysis> = players.iter().collect();
    sorted.sort_by_key(|p| Reverse(p.current_charge()));
    sorted.truncate(count);
    sorted
}

/// Seasons to show: the longest contract among `players`, but never fewer
/// than `min_horizon`.
pub fn horizon(players: &[&PlayerAnalysis], min_horizon: usize) -> usize {
    players
        .iter()
        .map(|p| p.contract_length)
        .max()
        .unwrap_or(0)
        .max(min_horizon)
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// Compute a single cell.
pub fn project_cell(player: &PlayerAnalysis, year: i32) -> TimelineCell {
    let charge = player.charge_for(year);
    let dead = player.is_dead();
    let after_fa = year >= player.fa_year;

    let mut amount = charge.cap.saturating_add(charge.actual_dead);
    let mut is_void_burst = false;
    if after_fa && amount == 0 && charge.potential_dead != 0 {
        amount = charge.potential_dead;
        is_void_burst = true;
    }

    TimelineCell {
        year,
        amount,
        is_void: !dead && after_fa && amount > 0,
        is_potential_cut: player.potential_out_year == Some(year),
        is_free_agent_empty: !dead && year == player.fa_year && amount == 0,
        is_void_burst,
    }
}

/// Project an explicit set of players across the horizon.
pub fn project(players: &[&PlayerAnalysis], current_year: i32, min_horizon: usize) -> Timeline {
    let span = horizon(players, min_horizon);
    let years: Vec<i32> = (0..span).map(|i| current_year + i as i32).collect();

    let rows = players
        .iter()
        .map(|p| TimelineRow {
            id: p.id.clone(),
            name: p.name.clone(),
            unit: p.unit,
            fa_year: p.fa_year,
            potential_out_year: p.potential_out_year,
            cells: years.iter().map(|&y| project_cell(p, y)).collect(),
        })
        .collect();

    Timeline { years, rows }
}

/// Project the highest-impact players using the configured options.
pub fn project_core(players: &[PlayerAnalysis], config: &CapConfig) -> Timeline {
    let TimelineOptions {
        player_count,
        min_horizon,
    } = config.timeline;
    let selected = select_core_players(players, player_count);
    project(&selected, config.current_year, min_horizon)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
