// Report emission: the JSON document and the plain-text summary.

use capsheet_core::money::format_money;
use capsheet_core::pipeline::CapReport;
use capsheet_core::team::RankedPlayer;
use capsheet_core::unit::Unit;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write report to {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

pub const MODE_TOP51: &str = "top51";
pub const MODE_FULL_ROSTER: &str = "full-roster";

/// The emitted JSON: run metadata plus the flattened core report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDocument {
    pub season: i32,
    /// RFC 3339 timestamp of the run.
    pub generated_at: String,
    pub mode: String,
    #[serde(flatten)]
    pub report: CapReport,
}

impl ReportDocument {
    pub fn new(report: CapReport, season: i32, generated_at: DateTime<Utc>) -> Self {
        let mode = if report.team.top51_mode {
            MODE_TOP51
        } else {
            MODE_FULL_ROSTER
        };
        ReportDocument {
            season,
            generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            mode: mode.to_string(),
            report,
        }
    }
}

// ---------------------------------------------------------------------------
// JSON output
// ---------------------------------------------------------------------------

/// Pretty-print the document to any writer, followed by a newline.
pub fn write_json<W: Write>(doc: &ReportDocument, mut writer: W) -> Result<(), ReportError> {
    serde_json::to_writer_pretty(&mut writer, doc)?;
    writer.write_all(b"\n").map_err(|e| ReportError::Io {
        path: "<writer>".into(),
        source: e,
    })
}

/// Write the document to `path`, or to stdout when `path` is `None`.
pub fn write_report(doc: &ReportDocument, path: Option<&Path>) -> Result<(), ReportError> {
    match path {
        Some(path) => {
            let io_err = |e| ReportError::Io {
                path: path.display().to_string(),
                source: e,
            };
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(io_err)?;
            }
            let file = std::fs::File::create(path).map_err(io_err)?;
            let mut writer = std::io::BufWriter::new(file);
            write_json(doc, &mut writer)?;
            writer.flush().map_err(io_err)
        }
        None => {
            let stdout = std::io::stdout();
            write_json(doc, stdout.lock())
        }
    }
}

// ---------------------------------------------------------------------------
// Text summary
// ---------------------------------------------------------------------------

fn ranking_section(out: &mut String, title: &str, entries: &[RankedPlayer]) {
    let _ = writeln!(out, "{title}:");
    if entries.is_empty() {
        let _ = writeln!(out, "  (none)");
        return;
    }
    for entry in entries {
        let _ = writeln!(
            out,
            "  {}. {} ({}) {}",
            entry.rank,
            entry.name,
            entry.position,
            format_money(entry.amount)
        );
    }
}

/// Human-readable cap sheet summary: headline numbers, unit split and the
/// top-5 rankings.
pub fn render_summary(doc: &ReportDocument) -> String {
    let team = &doc.report.team;
    let mut out = String::new();

    let _ = writeln!(out, "{} cap summary ({})", doc.season, doc.mode);
    let _ = writeln!(out, "Cap ceiling:     {}", format_money(team.cap_ceiling));
    let _ = writeln!(out, "Active cap:      {}", format_money(team.total_cap));
    let _ = writeln!(out, "Dead money:      {}", format_money(team.total_actual_dead));
    let _ = writeln!(out, "Team total:      {}", format_money(team.team_total));
    let space_label = if team.is_over_cap() { "Over cap by" } else { "Cap space" };
    let _ = writeln!(
        out,
        "{:<17}{}",
        format!("{space_label}:"),
        format_money(team.cap_space.abs())
    );
    let _ = writeln!(
        out,
        "Players:         {} active ({} counted), {} dead",
        team.active_players, team.counted_players, team.dead_players
    );

    let _ = writeln!(out);
    let _ = writeln!(out, "Unit allocation:");
    for alloc in &team.unit_allocation {
        let _ = writeln!(
            out,
            "  {:<14}{:>10} {:>5.1}%",
            alloc.unit.label(),
            format_money(alloc.cap),
            alloc.pct
        );
    }
    let _ = writeln!(
        out,
        "  {:<14}{:>10} {:>5.1}%",
        Unit::Dead.label(),
        format_money(team.total_actual_dead),
        team.dead_pct
    );

    let rankings = &team.rankings;
    let _ = writeln!(out);
    ranking_section(&mut out, "Top cap hits", &rankings.cap_hits);
    ranking_section(&mut out, "Top potential dead money", &rankings.potential_dead);
    ranking_section(&mut out, "Top release savings", &rankings.savings);
    ranking_section(&mut out, "Top dead money", &rankings.actual_dead);
    let _ = writeln!(
        out,
        "Max potential savings: {}",
        format_money(team.max_potential_savings)
    );

    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
