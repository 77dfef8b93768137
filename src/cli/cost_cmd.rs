use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};

use crate::cli::output::{OutputFormat, OutputOptions};
use crate::cli::render;
use crate::core::cost::CostLog;
use crate::core::formatter::format_usd;
use crate::core::models::cost::{CostEntry, TimeRange};

/// Accept either a full RFC3339 timestamp or a bare date. Bare dates snap
/// to the start of day for --from and the end of day for --to.
fn parse_bound(raw: &str, end_of_day: bool) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    let time = if end_of_day {
        date.and_hms_opt(23, 59, 59)?
    } else {
        date.and_hms_opt(0, 0, 0)?
    };
    Some(time.and_utc())
}

fn parse_range(from: Option<&str>, to: Option<&str>) -> TimeRange {
    let parse = |raw: Option<&str>, end_of_day: bool| {
        raw.map(|r| match parse_bound(r, end_of_day) {
            Some(ts) => ts,
            None => {
                eprintln!("Invalid timestamp '{}': expected RFC3339 or YYYY-MM-DD", r);
                std::process::exit(1);
            }
        })
    };
    TimeRange {
        from: parse(from, false),
        to: parse(to, true),
    }
}

#[allow(clippy::too_many_arguments)]
pub fn record(
    workspace: &str,
    model: &str,
    input_tokens: u64,
    output_tokens: u64,
    cached_tokens: u64,
    cache_create_tokens: u64,
    reasoning_tokens: u64,
    cost: f64,
    opts: &OutputOptions,
) -> Result<()> {
    let entry = CostEntry {
        timestamp: Utc::now(),
        workspace_id: workspace.to_string(),
        model: model.to_string(),
        input_tokens,
        output_tokens,
        cached_tokens,
        cache_create_tokens,
        reasoning_tokens,
        cost,
    };
    CostLog::open_default().record(entry)?;
    if opts.format == OutputFormat::Text {
        println!("Recorded {} for {}", format_usd(cost), model);
    }
    Ok(())
}

pub fn history(from: Option<&str>, to: Option<&str>, opts: &OutputOptions) -> Result<()> {
    let entries = CostLog::open_default().history(parse_range(from, to));
    match opts.format {
        OutputFormat::Json => println!("{}", opts.to_json(&entries)),
        OutputFormat::Text => {
            if entries.is_empty() {
                println!(" No cost entries in range.");
                return Ok(());
            }
            println!(" {} entries", entries.len());
            for entry in &entries {
                println!(
                    "  {}  {:<28} {:>10}  {}",
                    entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    entry.model,
                    format_usd(entry.cost),
                    entry.workspace_id
                );
            }
        }
    }
    Ok(())
}

pub fn daily(from: Option<&str>, to: Option<&str>, opts: &OutputOptions) -> Result<()> {
    let summaries = CostLog::open_default().daily_summaries(from, to);
    match opts.format {
        OutputFormat::Json => println!("{}", opts.to_json(&summaries)),
        OutputFormat::Text => println!("{}", render::render_daily(&summaries, opts.use_color)),
    }
    Ok(())
}

pub fn models(from: Option<&str>, to: Option<&str>, opts: &OutputOptions) -> Result<()> {
    let breakdown = CostLog::open_default().model_breakdown(parse_range(from, to));
    match opts.format {
        OutputFormat::Json => println!("{}", opts.to_json(&breakdown)),
        OutputFormat::Text => {
            println!("{}", render::render_breakdown(&breakdown, opts.use_color))
        }
    }
    Ok(())
}

pub fn totals(opts: &OutputOptions) -> Result<()> {
    let totals = CostLog::open_default().summary_totals();
    match opts.format {
        OutputFormat::Json => println!("{}", opts.to_json(&totals)),
        OutputFormat::Text => println!("{}", render::render_totals(&totals, opts.use_color)),
    }
    Ok(())
}

pub fn prune(days: u32, opts: &OutputOptions) -> Result<()> {
    let removed = CostLog::open_default().prune(days)?;
    match opts.format {
        OutputFormat::Json => {
            println!("{}", opts.to_json(&serde_json::json!({ "removed": removed })))
        }
        OutputFormat::Text => println!(
            "Removed {} entr{} older than {} days",
            removed,
            if removed == 1 { "y" } else { "ies" },
            days
        ),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bound_accepts_rfc3339() {
        let ts = parse_bound("2025-06-10T12:30:00Z", false).unwrap();
        assert_eq!(ts.to_rfc3339(), "2025-06-10T12:30:00+00:00");
    }

    #[test]
    fn parse_bound_bare_date_snaps_to_day_edges() {
        let from = parse_bound("2025-06-10", false).unwrap();
        let to = parse_bound("2025-06-10", true).unwrap();
        assert_eq!(from.to_rfc3339(), "2025-06-10T00:00:00+00:00");
        assert_eq!(to.to_rfc3339(), "2025-06-10T23:59:59+00:00");
    }

    #[test]
    fn parse_bound_rejects_garbage() {
        assert!(parse_bound("last tuesday", false).is_none());
    }
}
