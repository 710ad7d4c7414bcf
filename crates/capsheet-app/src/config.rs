// Configuration loading and parsing (season.toml).

use capsheet_core::config::{CapConfig, TimelineOptions};
use chrono::Datelike;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// The one config file the app reads, under `config/`.
pub const SEASON_FILE: &str = "season.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub cap: CapConfig,
    pub data: DataPaths,
    pub output: OutputConfig,
}

// ---------------------------------------------------------------------------
// season.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire season.toml file.
#[derive(Debug, Clone, Deserialize)]
struct SeasonFile {
    season: SeasonSection,
    #[serde(default)]
    timeline: TimelineOptions,
    data: DataPaths,
    #[serde(default)]
    output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
struct SeasonSection {
    /// Defaults to the current calendar year when omitted.
    #[serde(default)]
    current_year: Option<i32>,
    league_cap_limit: i64,
    #[serde(default)]
    carry_over: i64,
    #[serde(default)]
    top51_mode: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    /// Roster records, CSV or JSON by extension.
    pub roster: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Where to write the JSON report. Stdout when absent.
    #[serde(default)]
    pub report: Option<String>,
    /// Print a plain-text summary to stdout. Defaults to on when the report
    /// goes to a file and off when it goes to stdout.
    #[serde(default)]
    pub summary: Option<bool>,
}

impl OutputConfig {
    pub fn wants_summary(&self) -> bool {
        self.summary.unwrap_or(self.report.is_some())
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Path of the season file inside `base_dir`.
pub fn season_path(base_dir: &Path) -> PathBuf {
    base_dir.join("config").join(SEASON_FILE)
}

/// Load and validate `config/season.toml` under `base_dir`. Does not seed
/// the file from `defaults/`; see [`load_config`].
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = season_path(base_dir);
    let text = std::fs::read_to_string(&path)
        .map_err(|_| ConfigError::FileNotFound { path: path.clone() })?;
    let file: SeasonFile =
        toml::from_str(&text).map_err(|e| ConfigError::ParseError { path, source: e })?;

    let season = file.season;
    let cap = CapConfig {
        current_year: season
            .current_year
            .unwrap_or_else(|| chrono::Local::now().year()),
        league_cap_limit: season.league_cap_limit,
        carry_over: season.carry_over,
        top51_mode: season.top51_mode,
        timeline: file.timeline,
    };

    let config = Config {
        cap,
        data: file.data,
        output: file.output,
    };

    validate(&config)?;

    Ok(config)
}

/// Seed `config/season.toml` from `defaults/season.toml` on first run.
///
/// Returns the seeded path, or `None` when a season file already exists. An
/// existing file is never overwritten.
pub fn ensure_season_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = season_path(base_dir);
    if target.exists() {
        return Ok(None);
    }

    let source = base_dir.join("defaults").join(SEASON_FILE);
    if !source.is_file() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "no config/{SEASON_FILE} and no defaults/{SEASON_FILE} to seed it from in {}",
                base_dir.display()
            ),
        });
    }

    if let Some(config_dir) = target.parent() {
        std::fs::create_dir_all(config_dir).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to create {}: {e}", config_dir.display()),
        })?;
    }
    std::fs::copy(&source, &target).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to copy {} to {}: {e}", source.display(), target.display()),
    })?;
    info!("seeded {} from {}", target.display(), source.display());

    Ok(Some(target))
}

/// Seed the season file if needed, then load it from `base_dir`.
pub fn load_config(base_dir: &Path) -> Result<Config, ConfigError> {
    ensure_season_file(base_dir)?;
    load_config_from(base_dir)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let cap = &config.cap;

    if cap.league_cap_limit <= 0 {
        return Err(ConfigError::ValidationError {
            field: "season.league_cap_limit".into(),
            message: format!("must be > 0, got {}", cap.league_cap_limit),
        });
    }

    if !(1900..=2200).contains(&cap.current_year) {
        return Err(ConfigError::ValidationError {
            field: "season.current_year".into(),
            message: format!("must be between 1900 and 2200, got {}", cap.current_year),
        });
    }

    let timeline_fields: &[(&str, usize)] = &[
        ("timeline.player_count", cap.timeline.player_count),
        ("timeline.min_horizon", cap.timeline.min_horizon),
    ];
    for (name, val) in timeline_fields {
        if *val == 0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must be > 0".into(),
            });
        }
    }

    if config.data.roster.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data.roster".into(),
            message: "must not be empty".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Helper: returns the path to the capsheet-app crate root
    /// (works whether `cargo test` runs from the crate root or repo root).
    fn project_root() -> PathBuf {
        let cwd = std::env::current_dir().unwrap();
        if cwd.join("defaults").exists() {
            cwd
        } else if cwd.join("crates/capsheet-app/defaults").exists() {
            cwd.join("crates/capsheet-app")
        } else {
            panic!("Cannot locate defaults/ directory from CWD {:?}", cwd);
        }
    }

    /// Fresh temp dir with an empty `config/` inside.
    fn temp_base(name: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        tmp
    }

    fn default_season_text() -> String {
        fs::read_to_string(project_root().join("defaults/season.toml")).unwrap()
    }

    fn expect_validation_field(base: &Path, expected: &str) {
        let err = load_config_from(base).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, expected),
            other => panic!("expected ValidationError, got: {other}"),
        }
    }

    #[test]
    fn load_valid_config_from_defaults() {
        let tmp = temp_base("capsheet_config_defaults");
        fs::write(tmp.join("config/season.toml"), default_season_text()).unwrap();

        let config = load_config_from(&tmp).expect("should load valid config");
        assert_eq!(config.cap.current_year, 2025);
        assert_eq!(config.cap.league_cap_limit, 27920);
        assert_eq!(config.cap.carry_over, 0);
        assert!(!config.cap.top51_mode);
        assert_eq!(config.cap.timeline.player_count, 15);
        assert_eq!(config.cap.timeline.min_horizon, 5);
        assert_eq!(config.data.roster, "data/roster.csv");
        assert_eq!(config.output.report.as_deref(), Some("cap-report.json"));
        assert!(config.output.wants_summary());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn minimal_config_fills_defaults() {
        let tmp = temp_base("capsheet_config_minimal");
        let text = r#"
[season]
league_cap_limit = 25540

[data]
roster = "roster.json"
"#;
        fs::write(tmp.join("config/season.toml"), text).unwrap();

        let config = load_config_from(&tmp).expect("should load minimal config");
        assert_eq!(config.cap.current_year, chrono::Local::now().year());
        assert_eq!(config.cap.timeline, TimelineOptions::default());
        assert!(config.output.report.is_none());
        assert!(!config.output.wants_summary());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn carry_over_and_top51_parsed() {
        let tmp = temp_base("capsheet_config_carry");
        let text = default_season_text()
            .replace("carry_over = 0", "carry_over = 1250")
            .replace("top51_mode = false", "top51_mode = true");
        fs::write(tmp.join("config/season.toml"), text).unwrap();

        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config.cap.carry_over, 1250);
        assert!(config.cap.top51_mode);
        assert_eq!(config.cap.cap_ceiling(), 29170);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_cap_limit() {
        let tmp = temp_base("capsheet_config_zero_cap");
        let text = default_season_text().replace("league_cap_limit = 27920", "league_cap_limit = 0");
        fs::write(tmp.join("config/season.toml"), text).unwrap();

        expect_validation_field(&tmp, "season.league_cap_limit");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_implausible_year() {
        let tmp = temp_base("capsheet_config_bad_year");
        let text = default_season_text().replace("current_year = 2025", "current_year = 25");
        fs::write(tmp.join("config/season.toml"), text).unwrap();

        expect_validation_field(&tmp, "season.current_year");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_timeline_players() {
        let tmp = temp_base("capsheet_config_zero_timeline");
        let text = default_season_text().replace("player_count = 15", "player_count = 0");
        fs::write(tmp.join("config/season.toml"), text).unwrap();

        expect_validation_field(&tmp, "timeline.player_count");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_empty_roster_path() {
        let tmp = temp_base("capsheet_config_empty_roster");
        let text = default_season_text().replace("roster = \"data/roster.csv\"", "roster = \"  \"");
        fs::write(tmp.join("config/season.toml"), text).unwrap();

        expect_validation_field(&tmp, "data.roster");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn file_not_found_for_missing_season_toml() {
        let tmp = temp_base("capsheet_config_missing");

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::FileNotFound { path } => {
                assert!(path.ends_with("season.toml"));
            }
            other => panic!("expected FileNotFound, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = temp_base("capsheet_config_invalid");
        fs::write(tmp.join("config/season.toml"), "this is not valid [[[ toml").unwrap();

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ParseError { path, .. } => {
                assert!(path.ends_with("season.toml"));
            }
            other => panic!("expected ParseError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_season_file_seeds_from_defaults() {
        let tmp = std::env::temp_dir().join("capsheet_config_seed");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::copy(
            project_root().join("defaults/season.toml"),
            tmp.join("defaults/season.toml"),
        )
        .unwrap();

        assert!(!tmp.join("config").exists());

        let seeded = ensure_season_file(&tmp).expect("should succeed");
        assert_eq!(seeded, Some(season_path(&tmp)));
        assert_eq!(
            fs::read_to_string(season_path(&tmp)).unwrap(),
            default_season_text()
        );

        let config = load_config(&tmp).expect("seeded config should load");
        assert_eq!(config.cap.league_cap_limit, 27920);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_season_file_keeps_existing() {
        let tmp = temp_base("capsheet_config_keep");
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::copy(
            project_root().join("defaults/season.toml"),
            tmp.join("defaults/season.toml"),
        )
        .unwrap();
        fs::write(season_path(&tmp), "# custom\n").unwrap();

        let seeded = ensure_season_file(&tmp).expect("should succeed");
        assert!(seeded.is_none());
        assert_eq!(fs::read_to_string(season_path(&tmp)).unwrap(), "# custom\n");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn existing_season_file_needs_no_defaults() {
        let tmp = temp_base("capsheet_config_no_defaults");
        fs::write(season_path(&tmp), default_season_text()).unwrap();

        assert!(ensure_season_file(&tmp).unwrap().is_none());
        assert!(load_config(&tmp).is_ok());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_season_file_errors_without_defaults() {
        let tmp = std::env::temp_dir().join("capsheet_config_unseeded");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        let err = ensure_season_file(&tmp).unwrap_err();
        match &err {
            ConfigError::DefaultsCopyError { message } => {
                assert!(message.contains("no defaults/season.toml"));
            }
            other => panic!("expected DefaultsCopyError, got: {other}"),
        }
        assert!(!tmp.join("config").exists());

        let _ = fs::remove_dir_all(&tmp);
    }
}
