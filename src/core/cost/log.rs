use anyhow::Result;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::core::models::cost::{
    CostEntry, CostHistoryFile, DailySummary, ModelBreakdown, PeriodTotal, SummaryTotals,
    TimeRange,
};
use crate::core::store;

pub const DEFAULT_RETENTION_DAYS: u32 = 90;

/// Append-only cost log plus its incrementally-maintained daily rollup,
/// both persisted in cost-history.json. Every operation is a full
/// read-modify-write cycle against the file; there is no buffering and no
/// cross-call coordination.
pub struct CostLog {
    path: PathBuf,
}

impl CostLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Log rooted at the default data dir.
    pub fn open_default() -> Self {
        Self::new(crate::core::paths::cost_history_path())
    }

    /// Append an entry and fold it into the daily summary bucket for its
    /// UTC calendar date. Persists before returning.
    pub fn record(&self, entry: CostEntry) -> Result<()> {
        let mut file = store::load::<CostHistoryFile>(&self.path);

        let summary = file
            .daily_summaries
            .entry(entry.date_key())
            .or_insert_with(DailySummary::default);
        summary.total_cost += entry.cost;
        summary.request_count += 1;
        let model = summary.by_model.entry(entry.model.clone()).or_default();
        model.cost += entry.cost;
        model.requests += 1;
        model.tokens += entry.counted_tokens();

        file.entries.push(entry);
        store::save(&self.path, &file)
    }

    /// Entries within the inclusive range, in insertion order.
    pub fn history(&self, range: TimeRange) -> Vec<CostEntry> {
        store::load::<CostHistoryFile>(&self.path)
            .entries
            .into_iter()
            .filter(|e| range.contains(e.timestamp))
            .collect()
    }

    /// Daily summaries ascending by date key, bounded inclusively by date
    /// strings. `YYYY-MM-DD` sorts lexicographically in date order, so
    /// plain string comparison is the filter.
    pub fn daily_summaries(
        &self,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Vec<(String, DailySummary)> {
        store::load::<CostHistoryFile>(&self.path)
            .daily_summaries
            .into_iter()
            .filter(|(date, _)| {
                start.map_or(true, |s| date.as_str() >= s) && end.map_or(true, |e| date.as_str() <= e)
            })
            .collect()
    }

    /// Per-model aggregate recomputed by scanning the filtered entry log.
    /// Deliberately independent of the persisted daily summaries. Sorted
    /// by cost descending.
    pub fn model_breakdown(&self, range: TimeRange) -> Vec<ModelBreakdown> {
        let mut by_model: HashMap<String, ModelBreakdown> = HashMap::new();
        for entry in self.history(range) {
            let agg = by_model
                .entry(entry.model.clone())
                .or_insert_with(|| ModelBreakdown {
                    model: entry.model.clone(),
                    cost: 0.0,
                    requests: 0,
                    input_tokens: 0,
                    output_tokens: 0,
                    tokens: 0,
                });
            agg.cost += entry.cost;
            agg.requests += 1;
            agg.input_tokens += entry.input_tokens;
            agg.output_tokens += entry.output_tokens;
            agg.tokens += entry.counted_tokens();
        }

        let mut breakdown: Vec<ModelBreakdown> = by_model.into_values().collect();
        breakdown.sort_by(|a, b| b.cost.total_cmp(&a.cost));
        breakdown
    }

    /// Drop entries older than the retention window and summary keys for
    /// dates strictly before the cutoff date. Returns the number of
    /// entries removed; persists only when something was removed.
    pub fn prune(&self, retention_days: u32) -> Result<usize> {
        self.prune_at(retention_days, Utc::now())
    }

    fn prune_at(&self, retention_days: u32, now: DateTime<Utc>) -> Result<usize> {
        let cutoff = now - Duration::days(retention_days as i64);
        let cutoff_date = cutoff.format("%Y-%m-%d").to_string();

        let mut file = store::load::<CostHistoryFile>(&self.path);

        let before_entries = file.entries.len();
        file.entries.retain(|e| e.timestamp >= cutoff);
        let removed_entries = before_entries - file.entries.len();

        let before_summaries = file.daily_summaries.len();
        file.daily_summaries.retain(|date, _| *date >= cutoff_date);
        let removed_summaries = before_summaries - file.daily_summaries.len();

        if removed_entries > 0 || removed_summaries > 0 {
            store::save(&self.path, &file)?;
        }
        Ok(removed_entries)
    }

    /// The six rolling totals (today/yesterday, this/last week Monday-
    /// start, this/last month) computed from the daily summary map.
    pub fn summary_totals(&self) -> SummaryTotals {
        self.summary_totals_on(Utc::now().date_naive())
    }

    fn summary_totals_on(&self, today: NaiveDate) -> SummaryTotals {
        let key = |d: NaiveDate| d.format("%Y-%m-%d").to_string();

        let week_start = today - Duration::days(today.weekday().num_days_from_monday() as i64);
        let last_week_end = week_start - Duration::days(1);
        let last_week_start = week_start - Duration::days(7);

        let month_start = today.with_day(1).unwrap_or(today);
        let last_month_end = month_start - Duration::days(1);
        let last_month_start = last_month_end.with_day(1).unwrap_or(last_month_end);

        let today_key = key(today);
        let yesterday_key = key(today - Duration::days(1));
        let week_start_key = key(week_start);
        let last_week_start_key = key(last_week_start);
        let last_week_end_key = key(last_week_end);
        let month_start_key = key(month_start);
        let last_month_start_key = key(last_month_start);
        let last_month_end_key = key(last_month_end);

        let mut totals = SummaryTotals::default();
        let add = |total: &mut PeriodTotal, summary: &DailySummary| {
            total.cost += summary.total_cost;
            total.requests += summary.request_count;
        };

        for (date, summary) in store::load::<CostHistoryFile>(&self.path).daily_summaries.iter() {
            let date = date.as_str();
            if date == today_key {
                add(&mut totals.today, summary);
            }
            if date == yesterday_key {
                add(&mut totals.yesterday, summary);
            }
            if date >= week_start_key.as_str() && date <= today_key.as_str() {
                add(&mut totals.this_week, summary);
            }
            if date >= last_week_start_key.as_str() && date <= last_week_end_key.as_str() {
                add(&mut totals.last_week, summary);
            }
            if date >= month_start_key.as_str() && date <= today_key.as_str() {
                add(&mut totals.this_month, summary);
            }
            if date >= last_month_start_key.as_str() && date <= last_month_end_key.as_str() {
                add(&mut totals.last_month, summary);
            }
        }
        totals
    }
}
