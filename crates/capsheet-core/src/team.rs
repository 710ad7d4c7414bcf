// Team-level cap aggregation.
//
// Reduces the analyzed roster to the numbers a cap sheet leads with: the
// countable cap total (optionally restricted to the Top-51), dead money,
// remaining space, unit and position allocation, the top-5 rankings, and
// the active roster ledger.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use crate::analysis::PlayerAnalysis;
use crate::config::{CapConfig, TOP_51};
use crate::unit::Unit;

/// Number of entries in each ranking.
pub const RANKING_SIZE: usize = 5;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Cap share attributed to one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitAllocation {
    pub unit: Unit,
    pub cap: i64,
    /// Share of the countable cap total, 0-100.
    pub pct: f64,
}

/// Cap share attributed to one primary position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionAllocation {
    pub position: String,
    pub cap: i64,
    pub pct: f64,
}

/// One line of a top-N ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedPlayer {
    pub rank: usize,
    pub id: String,
    pub name: String,
    pub position: String,
    pub amount: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rankings {
    /// Highest current cap hits among active players.
    pub cap_hits: Vec<RankedPlayer>,
    /// Highest potential dead money among active players.
    pub potential_dead: Vec<RankedPlayer>,
    /// Largest release savings among active players.
    pub savings: Vec<RankedPlayer>,
    /// Largest dead-money charges among departed players.
    pub actual_dead: Vec<RankedPlayer>,
}

/// Active roster row, ordered by cap hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub rank: usize,
    pub id: String,
    pub name: String,
    pub position: String,
    pub unit: Unit,
    pub cap: i64,
    pub potential_dead: i64,
    pub savings: i64,
    /// False when Top-51 accounting leaves this cap hit off the books.
    pub counted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamAggregate {
    pub top51_mode: bool,
    /// Cap hits of countable active players.
    pub total_cap: i64,
    /// Dead money of every analyzed player, countable or not.
    pub total_actual_dead: i64,
    pub team_total: i64,
    pub cap_ceiling: i64,
    /// Negative when the team is over the cap.
    pub cap_space: i64,
    pub active_players: usize,
    pub dead_players: usize,
    pub counted_players: usize,
    pub unit_allocation: Vec<UnitAllocation>,
    /// Dead money's share of the team total, 0-100.
    pub dead_pct: f64,
    pub position_allocation: Vec<PositionAllocation>,
    pub max_potential_savings: i64,
    pub rankings: Rankings,
    pub roster: Vec<RosterEntry>,
}

impl TeamAggregate {
    pub fn unit_cap(&self, unit: Unit) -> i64 {
        self.unit_allocation
            .iter()
            .find(|a| a.unit == unit)
            .map(|a| a.cap)
            .unwrap_or(0)
    }

    pub fn is_over_cap(&self) -> bool {
        self.cap_space < 0
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `part / whole` as a percentage, 0 when `whole` is 0.
pub fn percentage(part: i64, whole: i64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Sum that sticks at the `i64` bounds instead of overflowing.
fn saturating_sum(values: impl Iterator<Item = i64>) -> i64 {
    values.fold(0i64, i64::saturating_add)
}

/// Top `RANKING_SIZE` players by `key`, descending. Equal keys keep input
/// order.
fn rank_by<'a>(
    players: impl Iterator<Item = &'a PlayerAnalysis>,
    key: impl Fn(&PlayerAnalysis) -> i64,
) -> Vec<RankedPlayer> {
    let mut sorted: Vec<&PlayerAnalysis> = players.collect();
    sorted.sort_by_key(|p| Reverse(key(p)));
    sorted
        .into_iter()
        .take(RANKING_SIZE)
        .enumerate()
        .map(|(i, p)| RankedPlayer {
            rank: i + 1,
            id: p.id.clone(),
            name: p.name.clone(),
            position: p.position.clone(),
            amount: key(p),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// Aggregate the analyzed roster.
///
/// Algorithm:
/// 1. Split players into active (unit != Dead) and dead.
/// 2. Order active players by cap hit, descending; the first 51 form the
///    Top-51 set.
/// 3. Countable players are all active players, or only the Top-51 set when
///    `top51_mode` is on.
/// 4. `total_cap` sums countable cap hits; `total_actual_dead` sums every
///    player's current dead money regardless of countability.
/// 5. `cap_space = cap_ceiling - (total_cap + total_actual_dead)`.
/// 6. Unit and position shares are computed over countable players against
///    `total_cap`.
pub fn aggregate(players: &[PlayerAnalysis], config: &CapConfig) -> TeamAggregate {
    let mut active: Vec<(usize, &PlayerAnalysis)> = players
        .iter()
        .enumerate()
        .filter(|(_, p)| !p.is_dead())
        .collect();
    active.sort_by_key(|(_, p)| Reverse(p.current_cap));

    // Countability per input index.
    let mut counted = vec![false; players.len()];
    for (rank, (idx, _)) in active.iter().enumerate() {
        counted[*idx] = !config.top51_mode || rank < TOP_51;
    }

    let countable: Vec<&PlayerAnalysis> = players
        .iter()
        .zip(&counted)
        .filter(|(_, c)| **c)
        .map(|(p, _)| p)
        .collect();

    let total_cap = saturating_sum(countable.iter().map(|p| p.current_cap));
    let total_actual_dead = saturating_sum(players.iter().map(|p| p.current_actual_dead));
    let team_total = total_cap.saturating_add(total_actual_dead);
    let cap_ceiling = config.cap_ceiling();
    let cap_space = cap_ceiling.saturating_sub(team_total);

    let unit_allocation = Unit::ALLOCATION_ORDER
        .iter()
        .map(|&unit| {
            let cap = saturating_sum(
                countable
                    .iter()
                    .filter(|p| p.unit == unit)
                    .map(|p| p.current_cap),
            );
            UnitAllocation {
                unit,
                cap,
                pct: percentage(cap, total_cap),
            }
        })
        .collect();

    // Positions in first-seen order, then stable-sorted by cap.
    let mut by_position: Vec<(String, i64)> = Vec::new();
    for p in &countable {
        let existing = by_position.iter().position(|(pos, _)| *pos == p.position);
        match existing {
            Some(i) => by_position[i].1 = by_position[i].1.saturating_add(p.current_cap),
            None => by_position.push((p.position.clone(), p.current_cap)),
        }
    }
    by_position.sort_by_key(|(_, cap)| Reverse(*cap));
    let position_allocation = by_position
        .into_iter()
        .map(|(position, cap)| PositionAllocation {
            position,
            cap,
            pct: percentage(cap, total_cap),
        })
        .collect();

    let active_iter = || players.iter().filter(|p| !p.is_dead());
    let rankings = Rankings {
        cap_hits: rank_by(active_iter(), |p| p.current_cap),
        potential_dead: rank_by(active_iter(), |p| p.potential_dead),
        savings: rank_by(active_iter(), |p| p.savings),
        actual_dead: rank_by(players.iter().filter(|p| p.is_dead()), |p| {
            p.current_actual_dead
        }),
    };

    let max_potential_savings = active_iter().map(|p| p.savings).max().unwrap_or(0);

    let roster = active
        .iter()
        .enumerate()
        .map(|(i, (idx, p))| RosterEntry {
            rank: i + 1,
            id: p.id.clone(),
            name: p.name.clone(),
            position: p.position.clone(),
            unit: p.unit,
            cap: p.current_cap,
            potential_dead: p.potential_dead,
            savings: p.savings,
            counted: counted[*idx],
        })
        .collect();

    TeamAggregate {
        top51_mode: config.top51_mode,
        total_cap,
        total_actual_dead,
        team_total,
        cap_ceiling,
        cap_space,
        active_players: active.len(),
        dead_players: players.len() - active.len(),
        counted_players: countable.len(),
        unit_allocation,
        dead_pct: if team_total > 0 {
            percentage(total_actual_dead, team_total)
        } else {
            0.0
        },
        position_allocation,
        max_potential_savings,
        rankings,
        roster,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
