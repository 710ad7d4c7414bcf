// End-to-end cap analysis: parse -> analyze -> aggregate -> project.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::{analyze_players, PlayerAnalysis};
use crate::config::CapConfig;
use crate::record::{parse_records, PlayerRecord, RawPlayerRecord};
use crate::team::{aggregate, TeamAggregate};
use crate::timeline::{project_core, Timeline};

/// Everything one run produces. Recomputed from scratch on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapReport {
    pub players: Vec<PlayerAnalysis>,
    pub team: TeamAggregate,
    pub timeline: Timeline,
}

/// Run the full analysis over raw source records.
pub fn build_report(raws: &[RawPlayerRecord], config: &CapConfig) -> CapReport {
    let records = parse_records(raws);
    debug!("parsed {} of {} raw records", records.len(), raws.len());
    analyze_roster(&records, config)
}

/// Run the analysis over already-parsed records.
pub fn analyze_roster(records: &[PlayerRecord], config: &CapConfig) -> CapReport {
    let players = analyze_players(records, config);
    let team = aggregate(&players, config);
    let timeline = project_core(&players, config);
    CapReport {
        players,
        team,
        timeline,
    }
}
