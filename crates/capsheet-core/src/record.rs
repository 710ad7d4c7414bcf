// Player record parsing and contract-sequence alignment.
//
// Raw records arrive from the record source as loosely typed text: a
// comma-joined position list and comma-joined per-season amounts. This module
// turns them into typed `PlayerRecord`s. Parsing never fails: malformed
// tokens become zero, missing years become a sentinel, and a record without
// a name is dropped.

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Free-agency year assigned when the source value is absent or unreadable.
/// Far enough out that every contract year is treated as pre-free-agency.
pub const NO_FREE_AGENCY_YEAR: i32 = 2099;

/// Primary position placeholder for records with an empty position field.
pub const UNKNOWN_POSITION: &str = "UNK";

/// Largest magnitude a single amount token may carry ($10 trillion).
/// Larger values are clamped so team totals stay well inside `i64`.
pub const MAX_AMOUNT: i64 = 1_000_000_000;

// ---------------------------------------------------------------------------
// Raw input
// ---------------------------------------------------------------------------

/// A roster record as delivered by the record source.
///
/// Field aliases accept the source's column names ("Cap Salary", "FA", ...)
/// so CSV exports and JSON dumps deserialize directly. Every cell may be
/// text or a number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPlayerRecord {
    #[serde(default, alias = "ID", alias = "Id", deserialize_with = "lenient_text")]
    pub id: Option<String>,
    #[serde(default, alias = "Name", deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(
        default,
        alias = "Position",
        alias = "positions",
        deserialize_with = "lenient_text"
    )]
    pub position: Option<String>,
    #[serde(default, alias = "Status", deserialize_with = "lenient_text")]
    pub status: Option<String>,
    #[serde(
        default,
        alias = "Leave",
        alias = "leaveYear",
        deserialize_with = "lenient_text"
    )]
    pub leave: Option<String>,
    #[serde(
        default,
        alias = "FA",
        alias = "faYear",
        deserialize_with = "lenient_text"
    )]
    pub fa: Option<String>,
    #[serde(
        default,
        alias = "Cap Salary",
        alias = "capSequence",
        deserialize_with = "lenient_text"
    )]
    pub cap_salary: Option<String>,
    #[serde(
        default,
        alias = "Actual Dead",
        alias = "actualDeadSequence",
        deserialize_with = "lenient_text"
    )]
    pub actual_dead: Option<String>,
    #[serde(
        default,
        alias = "Potential Dead",
        alias = "potentialDeadSequence",
        deserialize_with = "lenient_text"
    )]
    pub potential_dead: Option<String>,
}

/// Accept text, integer, float or boolean cells and keep them as text.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Cell {
        Text(String),
        Int(i64),
        Float(f64),
        Bool(bool),
    }

    let cell: Option<Cell> = Option::deserialize(deserializer)?;
    Ok(cell.map(|c| match c {
        Cell::Text(s) => s,
        Cell::Int(n) => n.to_string(),
        Cell::Float(f) => f.to_string(),
        Cell::Bool(b) => b.to_string(),
    }))
}

// ---------------------------------------------------------------------------
// Token parsing
// ---------------------------------------------------------------------------

/// Outcome of parsing one numeric token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedValue {
    Parsed(i64),
    /// The token was empty or not an integer; it counts as zero.
    Defaulted,
}

impl ParsedValue {
    pub fn value(self) -> i64 {
        match self {
            ParsedValue::Parsed(v) => v,
            ParsedValue::Defaulted => 0,
        }
    }

    pub fn is_defaulted(self) -> bool {
        matches!(self, ParsedValue::Defaulted)
    }
}

/// Parse a single integer token, tolerating surrounding whitespace.
/// Values are clamped to `[-MAX_AMOUNT, MAX_AMOUNT]`.
pub fn parse_token(token: &str) -> ParsedValue {
    match token.trim().parse::<i64>() {
        Ok(v) => ParsedValue::Parsed(v.clamp(-MAX_AMOUNT, MAX_AMOUNT)),
        Err(_) => ParsedValue::Defaulted,
    }
}

/// Parse a comma-joined amount list. An absent or blank field is a single
/// zero season, so index 0 always exists.
pub fn parse_sequence(text: Option<&str>) -> Vec<ParsedValue> {
    match text.map(str::trim) {
        None | Some("") => vec![ParsedValue::Parsed(0)],
        Some(s) => s.split(',').map(parse_token).collect(),
    }
}

/// Parse a year cell. Accepts integral or fractional text ("2027",
/// "2027.0"); fractions are truncated. Negative or non-finite values are
/// treated as absent.
pub fn parse_year(text: Option<&str>) -> Option<i32> {
    let value = text?.trim().parse::<f64>().ok()?;
    if !value.is_finite() || value < 0.0 || value > i32::MAX as f64 {
        return None;
    }
    Some(value.trunc() as i32)
}

/// Free-agency year, or [`NO_FREE_AGENCY_YEAR`] when unreadable.
pub fn parse_fa_year(text: Option<&str>) -> i32 {
    parse_year(text).unwrap_or(NO_FREE_AGENCY_YEAR)
}

/// Split a comma-joined position list into trimmed codes, keeping their
/// order. A blank field gives an empty list; empty tokens inside a
/// non-blank list are kept so the first token stays first.
pub fn parse_positions(text: Option<&str>) -> Vec<String> {
    match text.map(str::trim) {
        None | Some("") => Vec::new(),
        Some(s) => s.split(',').map(|p| p.trim().to_string()).collect(),
    }
}

// ---------------------------------------------------------------------------
// Contract sequences
// ---------------------------------------------------------------------------

/// One season's charges for a player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearCharge {
    pub cap: i64,
    pub actual_dead: i64,
    pub potential_dead: i64,
}

/// The three per-season amount sequences, right-padded with zeros to a
/// common length. Index 0 is the current season.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContractSeries {
    cap: Vec<i64>,
    actual_dead: Vec<i64>,
    potential_dead: Vec<i64>,
}

impl ContractSeries {
    /// Align the three sequences to the longest of them.
    pub fn aligned(cap: Vec<i64>, actual_dead: Vec<i64>, potential_dead: Vec<i64>) -> Self {
        let len = cap
            .len()
            .max(actual_dead.len())
            .max(potential_dead.len())
            .max(1);
        let pad = |mut v: Vec<i64>| {
            v.resize(len, 0);
            v
        };
        ContractSeries {
            cap: pad(cap),
            actual_dead: pad(actual_dead),
            potential_dead: pad(potential_dead),
        }
    }

    /// Number of seasons covered; at least 1.
    pub fn contract_length(&self) -> usize {
        self.cap.len()
    }

    pub fn cap(&self) -> &[i64] {
        &self.cap
    }

    pub fn actual_dead(&self) -> &[i64] {
        &self.actual_dead
    }

    pub fn potential_dead(&self) -> &[i64] {
        &self.potential_dead
    }

    /// Charges at a season offset; zero past the end of the contract.
    pub fn charge_at(&self, index: usize) -> YearCharge {
        YearCharge {
            cap: self.cap.get(index).copied().unwrap_or(0),
            actual_dead: self.actual_dead.get(index).copied().unwrap_or(0),
            potential_dead: self.potential_dead.get(index).copied().unwrap_or(0),
        }
    }
}

// ---------------------------------------------------------------------------
// Parsed record
// ---------------------------------------------------------------------------

/// Roster status as far as cap accounting cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerStatus {
    Active,
    /// No longer with the team; remaining money is dead money.
    Left,
}

impl PlayerStatus {
    /// Anything other than "Left" (any case) is treated as on the roster.
    pub fn parse(text: Option<&str>) -> Self {
        match text.map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("left") => PlayerStatus::Left,
            _ => PlayerStatus::Active,
        }
    }
}

/// A fully typed roster record.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRecord {
    pub id: String,
    pub name: String,
    pub positions: Vec<String>,
    pub status: PlayerStatus,
    pub leave_year: Option<i32>,
    pub fa_year: i32,
    pub contract: ContractSeries,
    /// How many amount tokens were unreadable and counted as zero.
    pub defaulted_tokens: usize,
}

impl PlayerRecord {
    /// First listed position, or [`UNKNOWN_POSITION`] when that token is
    /// missing or empty.
    pub fn primary_position(&self) -> &str {
        self.positions
            .first()
            .map(String::as_str)
            .filter(|p| !p.is_empty())
            .unwrap_or(UNKNOWN_POSITION)
    }

    pub fn contract_length(&self) -> usize {
        self.contract.contract_length()
    }
}

/// Parse one raw record. Returns `None` when the record has no name.
///
/// `index` is the record's position in the source list and is used as the
/// identifier when the source did not provide one.
pub fn parse_record(raw: &RawPlayerRecord, index: usize) -> Option<PlayerRecord> {
    let name = raw.name.as_deref().map(str::trim).unwrap_or("");
    if name.is_empty() {
        debug!("dropping record #{index}: missing name");
        return None;
    }

    let id = raw
        .id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("row-{index}"));

    let cap = parse_sequence(raw.cap_salary.as_deref());
    let actual_dead = parse_sequence(raw.actual_dead.as_deref());
    let potential_dead = parse_sequence(raw.potential_dead.as_deref());

    let defaulted_tokens = cap
        .iter()
        .chain(actual_dead.iter())
        .chain(potential_dead.iter())
        .filter(|v| v.is_defaulted())
        .count();
    if defaulted_tokens > 0 {
        debug!("'{name}': {defaulted_tokens} unreadable amount token(s) counted as zero");
    }

    let values =
        |seq: Vec<ParsedValue>| -> Vec<i64> { seq.into_iter().map(ParsedValue::value).collect() };
    let contract = ContractSeries::aligned(values(cap), values(actual_dead), values(potential_dead));

    Some(PlayerRecord {
        id,
        name: name.to_string(),
        positions: parse_positions(raw.position.as_deref()),
        status: PlayerStatus::parse(raw.status.as_deref()),
        leave_year: parse_year(raw.leave.as_deref()),
        fa_year: parse_fa_year(raw.fa.as_deref()),
        contract,
        defaulted_tokens,
    })
}

/// Parse every raw record, dropping the nameless ones.
pub fn parse_records(raws: &[RawPlayerRecord]) -> Vec<PlayerRecord> {
    raws.iter()
        .enumerate()
        .filter_map(|(i, raw)| parse_record(raw, i))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str, cap: &str, act: &str, pot: &str) -> RawPlayerRecord {
        RawPlayerRecord {
            id: Some(format!("id-{name}")),
            name: Some(name.into()),
            position: Some("QB".into()),
            status: Some("Active".into()),
            cap_salary: Some(cap.into()),
            actual_dead: Some(act.into()),
            potential_dead: Some(pot.into()),
            ..Default::default()
        }
    }

    // -- Token parsing --

    #[test]
    fn sequence_parses_integers() {
        let values: Vec<i64> = parse_sequence(Some("500, 450,400"))
            .into_iter()
            .map(ParsedValue::value)
            .collect();
        assert_eq!(values, vec![500, 450, 400]);
    }

    #[test]
    fn malformed_tokens_default_to_zero() {
        let parsed = parse_sequence(Some("500,abc,,12.5"));
        assert_eq!(parsed[0], ParsedValue::Parsed(500));
        assert!(parsed[1].is_defaulted());
        assert!(parsed[2].is_defaulted());
        assert!(parsed[3].is_defaulted());
        assert_eq!(parsed.iter().map(|v| v.value()).sum::<i64>(), 500);
    }

    #[test]
    fn blank_sequence_is_single_zero_season() {
        assert_eq!(parse_sequence(None), vec![ParsedValue::Parsed(0)]);
        assert_eq!(parse_sequence(Some("  ")), vec![ParsedValue::Parsed(0)]);
    }

    #[test]
    fn negative_amounts_are_kept() {
        assert_eq!(parse_token("-25"), ParsedValue::Parsed(-25));
    }

    #[test]
    fn extreme_amounts_clamped() {
        assert_eq!(parse_token("9223372036854775807"), ParsedValue::Parsed(MAX_AMOUNT));
        assert_eq!(parse_token("-9223372036854775808"), ParsedValue::Parsed(-MAX_AMOUNT));
        assert_eq!(parse_token(" 1000000000 "), ParsedValue::Parsed(MAX_AMOUNT));
        // Past i64 entirely: unreadable, not clamped.
        assert!(parse_token("99999999999999999999").is_defaulted());
    }

    // -- Years --

    #[test]
    fn fa_year_parsing() {
        assert_eq!(parse_fa_year(Some("2027")), 2027);
        assert_eq!(parse_fa_year(Some("2027.0")), 2027);
        assert_eq!(parse_fa_year(Some("2027.9")), 2027);
        assert_eq!(parse_fa_year(Some("")), NO_FREE_AGENCY_YEAR);
        assert_eq!(parse_fa_year(Some("TBD")), NO_FREE_AGENCY_YEAR);
        assert_eq!(parse_fa_year(Some("-5")), NO_FREE_AGENCY_YEAR);
        assert_eq!(parse_fa_year(None), NO_FREE_AGENCY_YEAR);
    }

    #[test]
    fn leave_year_absent_when_unreadable() {
        assert_eq!(parse_year(Some("2024")), Some(2024));
        assert_eq!(parse_year(Some("soon")), None);
        assert_eq!(parse_year(Some("NaN")), None);
        assert_eq!(parse_year(None), None);
    }

    // -- Positions --

    #[test]
    fn positions_trimmed_and_primary_first() {
        let mut r = raw("A", "1", "0", "0");
        r.position = Some(" edge , LB ".into());
        let rec = parse_record(&r, 0).unwrap();
        assert_eq!(rec.positions, vec!["edge", "LB"]);
        assert_eq!(rec.primary_position(), "edge");
    }

    #[test]
    fn leading_empty_token_is_not_skipped() {
        let mut r = raw("A", "1", "0", "0");
        r.position = Some(",QB".into());
        let rec = parse_record(&r, 0).unwrap();
        assert_eq!(rec.positions, vec!["", "QB"]);
        assert_eq!(rec.primary_position(), UNKNOWN_POSITION);
    }

    #[test]
    fn empty_position_uses_placeholder() {
        let mut r = raw("A", "1", "0", "0");
        r.position = None;
        let rec = parse_record(&r, 0).unwrap();
        assert!(rec.positions.is_empty());
        assert_eq!(rec.primary_position(), UNKNOWN_POSITION);
    }

    // -- Padding --

    #[test]
    fn sequences_padded_to_longest() {
        let rec = parse_record(&raw("A", "500,450", "0", "100,50,25,10"), 0).unwrap();
        assert_eq!(rec.contract_length(), 4);
        assert_eq!(rec.contract.cap(), &[500, 450, 0, 0]);
        assert_eq!(rec.contract.actual_dead(), &[0, 0, 0, 0]);
        assert_eq!(rec.contract.potential_dead(), &[100, 50, 25, 10]);
    }

    #[test]
    fn charge_past_contract_end_is_zero() {
        let series = ContractSeries::aligned(vec![10], vec![2], vec![3]);
        assert_eq!(series.charge_at(5), YearCharge::default());
        assert_eq!(
            series.charge_at(0),
            YearCharge { cap: 10, actual_dead: 2, potential_dead: 3 }
        );
    }

    // -- Record-level rules --

    #[test]
    fn nameless_record_dropped() {
        let mut r = raw("A", "1", "0", "0");
        r.name = Some("   ".into());
        assert!(parse_record(&r, 0).is_none());
        r.name = None;
        assert!(parse_record(&r, 0).is_none());
    }

    #[test]
    fn missing_id_falls_back_to_row_index() {
        let mut r = raw("A", "1", "0", "0");
        r.id = None;
        assert_eq!(parse_record(&r, 7).unwrap().id, "row-7");
    }

    #[test]
    fn status_left_matched_case_insensitively() {
        assert_eq!(PlayerStatus::parse(Some(" left ")), PlayerStatus::Left);
        assert_eq!(PlayerStatus::parse(Some("Left")), PlayerStatus::Left);
        assert_eq!(PlayerStatus::parse(Some("Active")), PlayerStatus::Active);
        assert_eq!(PlayerStatus::parse(Some("Injured Reserve")), PlayerStatus::Active);
        assert_eq!(PlayerStatus::parse(None), PlayerStatus::Active);
    }

    #[test]
    fn defaulted_tokens_counted() {
        let rec = parse_record(&raw("A", "500,x", "y", "0"), 0).unwrap();
        assert_eq!(rec.defaulted_tokens, 2);
    }

    #[test]
    fn parse_records_keeps_order_and_drops_nameless() {
        let mut nameless = raw("B", "1", "0", "0");
        nameless.name = None;
        let recs = parse_records(&[raw("A", "1", "0", "0"), nameless, raw("C", "1", "0", "0")]);
        let names: Vec<&str> = recs.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
    }

    // -- Deserialization --

    #[test]
    fn raw_record_accepts_source_column_names_and_numbers() {
        let json = r#"{
            "id": "p1",
            "Name": "Test Player",
            "Position": "WR,KR",
            "Status": "Active",
            "FA": 2027,
            "Cap Salary": "500,450",
            "Actual Dead": "0",
            "Potential Dead": 100
        }"#;
        let raw: RawPlayerRecord = serde_json::from_str(json).unwrap();
        assert_eq!(raw.fa.as_deref(), Some("2027"));
        assert_eq!(raw.potential_dead.as_deref(), Some("100"));
        assert_eq!(raw.leave, None);

        let rec = parse_record(&raw, 0).unwrap();
        assert_eq!(rec.fa_year, 2027);
        assert_eq!(rec.contract.cap(), &[500, 450]);
        assert_eq!(rec.contract.potential_dead(), &[100, 0]);
    }

    #[test]
    fn raw_record_null_cells_are_absent() {
        let json = r#"{"name": "X", "leave": null, "fa": 2026.0}"#;
        let raw: RawPlayerRecord = serde_json::from_str(json).unwrap();
        assert_eq!(raw.leave, None);
        assert_eq!(parse_fa_year(raw.fa.as_deref()), 2026);
    }
}
