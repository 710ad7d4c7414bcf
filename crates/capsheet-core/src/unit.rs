// Position -> unit classification.

use serde::{Deserialize, Serialize};
use std::fmt;

const OFFENSE: &[&str] = &["QB", "RB", "FB", "WR", "TE", "OL", "C", "G", "T", "OT", "OG"];
const DEFENSE: &[&str] = &[
    "DL", "DT", "DE", "NT", "EDGE", "LB", "ILB", "OLB", "CB", "S", "FS", "SS", "DB",
];
const SPECIAL_TEAMS: &[&str] = &["K", "P", "LS"];

/// Coarse roster grouping a player's cap charge is attributed to.
///
/// `Dead` is never produced by [`classify`]; the player analyzer assigns it
/// to departed players whose money still counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Unit {
    Offense,
    Defense,
    #[serde(rename = "Special Teams")]
    SpecialTeams,
    Unknown,
    Dead,
}

impl Unit {
    /// Units reported in the allocation breakdown, in display order.
    pub const ALLOCATION_ORDER: [Unit; 4] =
        [Unit::Offense, Unit::Defense, Unit::SpecialTeams, Unit::Unknown];

    pub fn label(&self) -> &'static str {
        match self {
            Unit::Offense => "Offense",
            Unit::Defense => "Defense",
            Unit::SpecialTeams => "Special Teams",
            Unit::Unknown => "Unknown",
            Unit::Dead => "Dead",
        }
    }

    pub fn is_dead(&self) -> bool {
        matches!(self, Unit::Dead)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Map a primary position code to its unit. Case-insensitive; surrounding
/// whitespace is ignored and unrecognised codes map to `Unknown`.
pub fn classify(position: &str) -> Unit {
    let code = position.trim().to_uppercase();
    let code = code.as_str();
    if OFFENSE.contains(&code) {
        Unit::Offense
    } else if DEFENSE.contains(&code) {
        Unit::Defense
    } else if SPECIAL_TEAMS.contains(&code) {
        Unit::SpecialTeams
    } else {
        Unit::Unknown
    }
}
