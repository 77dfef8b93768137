use colored::{control, ColoredString, Colorize};

use crate::core::formatter::{format_tokens, format_usd};
use crate::core::models::cost::{DailySummary, ModelBreakdown, SummaryTotals};
use crate::core::models::health::{CheckStatus, HealthReport, OverallStatus};
use crate::core::models::preset::Preset;
use crate::core::models::theme::InstalledTheme;

/// Render the preset listing block.
///
/// Layout:
/// ```text
///  2 presets
///   a1b2c3d4  Coding        3 models  updated 2025-06-10
///   e5f6a7b8  Research      1 model   updated 2025-05-02
/// ```
pub fn render_preset_list(presets: &[Preset], use_color: bool) -> String {
    control::set_override(use_color);

    if presets.is_empty() {
        return " No presets saved.".to_string();
    }

    let mut lines = vec![format!(
        " {} preset{}",
        presets.len(),
        if presets.len() == 1 { "" } else { "s" }
    )
    .bold()
    .to_string()];

    for preset in presets {
        let short_id: String = preset.id.chars().take(8).collect();
        let count = preset.models.len();
        lines.push(format!(
            "  {}  {:<24} {} model{}  updated {}",
            short_id.dimmed(),
            preset.name,
            count,
            if count == 1 { " " } else { "s" },
            preset.updated_at.format("%Y-%m-%d")
        ));
    }
    lines.join("\n")
}

pub fn render_preset(preset: &Preset, use_color: bool) -> String {
    control::set_override(use_color);

    let mut lines = vec![format!(" {}", preset.name).bold().to_string()];
    lines.push(format!("  {}        {}", "Id".cyan(), preset.id));
    if let Some(description) = &preset.description {
        lines.push(format!("  {}      {}", "About".cyan(), description));
    }
    lines.push(format!(
        "  {}   {}",
        "Created".cyan(),
        preset.created_at.format("%Y-%m-%d %H:%M")
    ));
    lines.push(format!(
        "  {}   {}",
        "Updated".cyan(),
        preset.updated_at.format("%Y-%m-%d %H:%M")
    ));
    lines.push(format!("  {}:", "Models".cyan()));
    for entry in &preset.models {
        let custom = if entry.metadata.is_some() {
            " (custom metadata)"
        } else {
            ""
        };
        lines.push(format!(
            "    {:<12} {}{}",
            entry.provider,
            entry.model_id,
            custom.dimmed()
        ));
    }
    lines.join("\n")
}

fn colorize_check(status: CheckStatus, text: &str) -> ColoredString {
    match status {
        CheckStatus::Pass => text.green(),
        CheckStatus::Warn => text.yellow(),
        CheckStatus::Fail => text.red(),
        CheckStatus::Skip => text.dimmed(),
    }
}

fn check_word(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Pass => "pass",
        CheckStatus::Warn => "warn",
        CheckStatus::Fail => "fail",
        CheckStatus::Skip => "skip",
    }
}

/// Render a health report block.
///
/// Layout:
/// ```text
///  anthropic / claude-sonnet-4-5
///   authentication  pass  Anthropic credentials configured
///   model exists    pass  known model (canonical id: claude-sonnet-4-5)
///   ...
///   Overall: healthy
/// ```
pub fn render_health(report: &HealthReport, use_color: bool) -> String {
    control::set_override(use_color);

    let mut lines = vec![format!(" {} / {}", report.provider, report.model_id)
        .bold()
        .to_string()];

    for (name, check) in report.checks.iter() {
        // Pad before coloring so ANSI codes don't break the column width.
        let padded_name = format!("{:<15}", name);
        lines.push(format!(
            "  {} {}  {}",
            padded_name.cyan(),
            colorize_check(check.status, check_word(check.status)),
            check.message
        ));
    }

    let overall = match report.overall {
        OverallStatus::Healthy => "healthy".green(),
        OverallStatus::Warning => "warning".yellow(),
        OverallStatus::Error => "error".red(),
    };
    lines.push(format!("  {} {}", "Overall:".bold(), overall));
    lines.join("\n")
}

pub fn render_totals(totals: &SummaryTotals, use_color: bool) -> String {
    control::set_override(use_color);

    let row = |label: &str, current: &crate::core::models::cost::PeriodTotal| {
        let padded_label = format!("{:<12}", label);
        format!(
            "  {} {:>10}  {:>6} req",
            padded_label.cyan(),
            format_usd(current.cost),
            current.requests
        )
    };

    [
        " Spending".bold().to_string(),
        row("Today", &totals.today),
        row("Yesterday", &totals.yesterday),
        row("This week", &totals.this_week),
        row("Last week", &totals.last_week),
        row("This month", &totals.this_month),
        row("Last month", &totals.last_month),
    ]
    .join("\n")
}

pub fn render_breakdown(breakdown: &[ModelBreakdown], use_color: bool) -> String {
    control::set_override(use_color);

    if breakdown.is_empty() {
        return " No cost entries in range.".to_string();
    }

    let mut lines = vec![" By model".bold().to_string()];
    for row in breakdown {
        lines.push(format!(
            "  {:<28} {:>10}  {:>5} req  ({} in / {} out)",
            row.model,
            format_usd(row.cost),
            row.requests,
            format_tokens(row.input_tokens),
            format_tokens(row.output_tokens)
        ));
    }
    lines.join("\n")
}

pub fn render_daily(summaries: &[(String, DailySummary)], use_color: bool) -> String {
    control::set_override(use_color);

    if summaries.is_empty() {
        return " No daily summaries in range.".to_string();
    }

    let mut lines = vec![" Daily".bold().to_string()];
    for (date, summary) in summaries {
        lines.push(format!(
            "  {}  {:>10}  {:>5} req  {} models",
            date.cyan(),
            format_usd(summary.total_cost),
            summary.request_count,
            summary.by_model.len()
        ));
    }
    lines.join("\n")
}

pub fn render_themes(themes: &[InstalledTheme], use_color: bool) -> String {
    control::set_override(use_color);

    let mut lines = vec![format!(
        " {} theme{}",
        themes.len(),
        if themes.len() == 1 { "" } else { "s" }
    )
    .bold()
    .to_string()];

    for theme in themes {
        let marker = if theme.is_builtin {
            " (built-in)".dimmed().to_string()
        } else {
            String::new()
        };
        let padded_id = format!("{:<40}", theme.id);
        lines.push(format!("  {} {}{}", padded_id.cyan(), theme.label, marker));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::cost::PeriodTotal;
    use crate::core::models::health::{CheckResult, HealthChecks};
    use crate::core::models::preset::ModelEntry;
    use chrono::Utc;

    fn make_preset() -> Preset {
        Preset {
            id: "a1b2c3d4-0000-0000-0000-000000000000".into(),
            name: "Coding".into(),
            description: Some("daily driver".into()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            models: vec![ModelEntry {
                provider: "anthropic".into(),
                model_id: "claude-sonnet-4-5".into(),
                metadata: None,
            }],
        }
    }

    fn make_report(overall_error: bool) -> HealthReport {
        let checks = HealthChecks {
            authentication: if overall_error {
                CheckResult::fail("no key")
            } else {
                CheckResult::pass("ok")
            },
            model_exists: CheckResult::pass("known"),
            token_limits: CheckResult::skip("none"),
            pricing: CheckResult::skip("none"),
            connectivity: CheckResult::pass("default endpoint"),
        };
        let overall = checks.overall();
        HealthReport {
            provider: "anthropic".into(),
            model_id: "claude-sonnet-4-5".into(),
            checks,
            overall,
        }
    }

    #[test]
    fn preset_list_contains_names_and_counts() {
        let output = render_preset_list(&[make_preset()], false);
        assert!(output.contains("Coding"));
        assert!(output.contains("1 model"));
        assert!(output.contains("a1b2c3d4"));
    }

    #[test]
    fn preset_list_empty_message() {
        assert!(render_preset_list(&[], false).contains("No presets"));
    }

    #[test]
    fn preset_detail_contains_models() {
        let output = render_preset(&make_preset(), false);
        assert!(output.contains("claude-sonnet-4-5"));
        assert!(output.contains("daily driver"));
    }

    #[test]
    fn health_report_contains_all_checks() {
        let output = render_health(&make_report(false), false);
        assert!(output.contains("authentication"));
        assert!(output.contains("model exists"));
        assert!(output.contains("token limits"));
        assert!(output.contains("pricing"));
        assert!(output.contains("connectivity"));
        assert!(output.contains("healthy"));
    }

    #[test]
    fn health_report_shows_error_overall() {
        let output = render_health(&make_report(true), false);
        assert!(output.contains("error"));
    }

    #[test]
    fn totals_contains_all_periods() {
        let totals = SummaryTotals {
            today: PeriodTotal { cost: 1.0, requests: 2 },
            ..Default::default()
        };
        let output = render_totals(&totals, false);
        assert!(output.contains("Today"));
        assert!(output.contains("Last month"));
        assert!(output.contains("$1.00"));
    }

    #[test]
    fn no_ansi_when_color_disabled() {
        let output = render_health(&make_report(false), false);
        assert!(!output.contains('\x1b'), "output should not contain ANSI codes");
    }

    #[test]
    fn breakdown_rows_render_tokens() {
        let breakdown = vec![ModelBreakdown {
            model: "claude-sonnet-4-5".into(),
            cost: 1.5,
            requests: 3,
            input_tokens: 1_500_000,
            output_tokens: 50_000,
            tokens: 1_550_000,
        }];
        let output = render_breakdown(&breakdown, false);
        assert!(output.contains("1.5M in"));
        assert!(output.contains("50.0K out"));
        assert!(output.contains("$1.50"));
    }
}
