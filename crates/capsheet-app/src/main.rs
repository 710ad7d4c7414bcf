// Cap sheet entry point.
//
// Startup sequence:
// 1. Initialize tracing (stderr, so stdout stays free for the report)
// 2. Load config
// 3. Load roster records
// 4. Build the cap report
// 5. Write the JSON report and, if enabled, the text summary

use capsheet_app::config;
use capsheet_app::records;
use capsheet_app::report::{self, ReportDocument};
use capsheet_core::money::format_money;
use capsheet_core::pipeline::build_report;

use anyhow::Context;
use std::path::Path;
use tracing::info;

fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("capsheet starting up");

    // 2. Load config
    let base_dir = std::env::current_dir().context("failed to resolve working directory")?;
    let config = config::load_config(&base_dir).context("failed to load configuration")?;
    info!(
        "Config loaded: season {}, cap limit {}, carry-over {}, top51={}",
        config.cap.current_year,
        format_money(config.cap.league_cap_limit),
        format_money(config.cap.carry_over),
        config.cap.top51_mode
    );

    // 3. Load roster records
    let roster_path = Path::new(&config.data.roster);
    let raws = records::load_records(roster_path)
        .with_context(|| format!("failed to load roster from {}", roster_path.display()))?;
    info!("Loaded {} roster records", raws.len());

    // 4. Build the report
    let cap_report = build_report(&raws, &config.cap);
    info!(
        "Analyzed {} players: cap space {}",
        cap_report.players.len(),
        format_money(cap_report.team.cap_space)
    );

    // 5. Emit
    let doc = ReportDocument::new(cap_report, config.cap.current_year, chrono::Utc::now());
    let report_path = config.output.report.as_deref().map(Path::new);
    report::write_report(&doc, report_path).context("failed to write report")?;
    if let Some(path) = report_path {
        info!("Report written to {}", path.display());
    }

    if config.output.wants_summary() {
        print!("{}", report::render_summary(&doc));
    }

    Ok(())
}

/// Initialize tracing to log to stderr (stdout carries the report).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("capsheet=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
