// Per-player cap analysis.
//
// Turns a parsed `PlayerRecord` into a `PlayerAnalysis`: unit assignment
// (including the Dead override for departed players), current-season
// figures, cut savings, the per-year charge table, and the automatically
// detected earliest sensible cut year.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CapConfig;
use crate::record::{ContractSeries, PlayerRecord, PlayerStatus, YearCharge};
use crate::unit::{classify, Unit};

// ---------------------------------------------------------------------------
// PlayerAnalysis
// ---------------------------------------------------------------------------

/// Computed cap picture for one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerAnalysis {
    pub id: String,
    pub name: String,
    /// Primary position code as written in the source.
    pub position: String,
    pub unit: Unit,
    pub fa_year: i32,
    /// Current-season cap hit.
    pub current_cap: i64,
    /// Current-season dead money already charged.
    pub current_actual_dead: i64,
    /// Dead money that releasing the player this season would trigger.
    pub potential_dead: i64,
    /// Cap relief from releasing the player now. Zero for Dead players and
    /// negative when a release costs more than it saves.
    pub savings: i64,
    pub contract_length: usize,
    /// Earliest season where a release clears at least its own dead money.
    pub potential_out_year: Option<i32>,
    /// Absolute season -> charges, one entry per contract year.
    pub timeline_data: BTreeMap<i32, YearCharge>,
}

impl PlayerAnalysis {
    pub fn is_dead(&self) -> bool {
        self.unit.is_dead()
    }

    /// Charges for an absolute season; zero outside the contract.
    pub fn charge_for(&self, year: i32) -> YearCharge {
        self.timeline_data.get(&year).copied().unwrap_or_default()
    }

    /// Total current-season charge against the cap (cap hit + dead money).
    pub fn current_charge(&self) -> i64 {
        self.current_cap.saturating_add(self.current_actual_dead)
    }
}

// ---------------------------------------------------------------------------
// Unit resolution
// ---------------------------------------------------------------------------

/// Decide the player's unit, or `None` if the record is stale.
///
/// A departed player keeps counting (as `Dead`) when the departure year is
/// unknown or no older than last season. Older departures are no longer
/// relevant to the cap and are dropped.
pub fn resolve_unit(record: &PlayerRecord, current_year: i32) -> Option<Unit> {
    match record.status {
        PlayerStatus::Left => match record.leave_year {
            Some(year) if year < current_year - 1 => None,
            _ => Some(Unit::Dead),
        },
        PlayerStatus::Active => Some(classify(record.primary_position())),
    }
}

// ---------------------------------------------------------------------------
// Cut-year detection
// ---------------------------------------------------------------------------

/// Find the first season, before free agency, in which releasing the player
/// saves money and the saving is at least the dead money it triggers.
///
/// The scan is greedy: the earliest qualifying season wins even when a later
/// one would save more. Dead players never get a cut year.
pub fn detect_cut_year(
    contract: &ContractSeries,
    unit: Unit,
    fa_year: i32,
    current_year: i32,
) -> Option<i32> {
    if unit.is_dead() {
        return None;
    }

    let cap = contract.cap();
    let potential_dead = contract.potential_dead();

    for (offset, (&cap_i, &dead_i)) in cap.iter().zip(potential_dead).enumerate() {
        let year = current_year + offset as i32;
        if year >= fa_year {
            break;
        }
        let savings_i = cap_i.saturating_sub(dead_i);
        if savings_i > 0 && cap_i > 0 && savings_i >= dead_i {
            return Some(year);
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// Analyze a single parsed record. Returns `None` for stale departures.
pub fn analyze_player(record: &PlayerRecord, config: &CapConfig) -> Option<PlayerAnalysis> {
    let Some(unit) = resolve_unit(record, config.current_year) else {
        debug!(
            "excluding '{}': left in {:?}, before {}",
            record.name,
            record.leave_year,
            config.current_year - 1
        );
        return None;
    };

    let contract = &record.contract;
    let current = contract.charge_at(0);
    let savings = if unit.is_dead() {
        0
    } else {
        current.cap.saturating_sub(current.potential_dead)
    };

    let timeline_data: BTreeMap<i32, YearCharge> = (0..contract.contract_length())
        .map(|i| (config.current_year + i as i32, contract.charge_at(i)))
        .collect();

    let potential_out_year =
        detect_cut_year(contract, unit, record.fa_year, config.current_year);

    Some(PlayerAnalysis {
        id: record.id.clone(),
        name: record.name.clone(),
        position: record.primary_position().to_string(),
        unit,
        fa_year: record.fa_year,
        current_cap: current.cap,
        current_actual_dead: current.actual_dead,
        potential_dead: current.potential_dead,
        savings,
        contract_length: contract.contract_length(),
        potential_out_year,
        timeline_data,
    })
}

/// Analyze every record, preserving input order and skipping stale ones.
pub fn analyze_players(records: &[PlayerRecord], config: &CapConfig) -> Vec<PlayerAnalysis> {
    let players: Vec<PlayerAnalysis> = records
        .iter()
        .filter_map(|r| analyze_player(r, config))
        .collect();
    debug!(
        "analyzed {} of {} records ({} dead)",
        players.len(),
        records.len(),
        players.iter().filter(|p| p.is_dead()).count()
    );
    players
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
