use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::core::store::VersionedFile;

/// One recorded request. Append-only: never mutated after insert, only
/// pruned by age.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostEntry {
    pub timestamp: DateTime<Utc>,
    pub workspace_id: String,
    pub model: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    #[serde(default)]
    pub cached_tokens: u64,
    #[serde(default)]
    pub cache_create_tokens: u64,
    #[serde(default)]
    pub reasoning_tokens: u64,
    pub cost: f64,
}

impl CostEntry {
    /// Token count the daily rollup attributes to a request. Cache-create
    /// tokens are billed but not counted here.
    pub fn counted_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens + self.cached_tokens + self.reasoning_tokens
    }

    /// The UTC calendar date bucket key, `YYYY-MM-DD`.
    pub fn date_key(&self) -> String {
        self.timestamp.format("%Y-%m-%d").to_string()
    }
}

/// Per-model slice of one day's summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDayUsage {
    pub cost: f64,
    pub requests: u64,
    pub tokens: u64,
}

/// Derived rollup for one calendar date, kept in lockstep with the entry
/// log on every insert and prune.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub total_cost: f64,
    pub request_count: u64,
    pub by_model: HashMap<String, ModelDayUsage>,
}

/// On-disk layout of cost-history.json. `daily_summaries` is a BTreeMap so
/// date keys serialize and iterate in chronological order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostHistoryFile {
    pub version: u32,
    pub entries: Vec<CostEntry>,
    pub daily_summaries: BTreeMap<String, DailySummary>,
}

impl VersionedFile for CostHistoryFile {
    const VERSION: u32 = 1;

    fn version(&self) -> u32 {
        self.version
    }

    fn empty() -> Self {
        Self {
            version: Self::VERSION,
            entries: Vec::new(),
            daily_summaries: BTreeMap::new(),
        }
    }
}

/// Inclusive timestamp bounds for history queries. Both ends optional.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl TimeRange {
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        if let Some(from) = self.from {
            if ts < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if ts > to {
                return false;
            }
        }
        true
    }
}

/// Per-model aggregate recomputed from the entry log (not the persisted
/// daily summaries).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelBreakdown {
    pub model: String,
    pub cost: f64,
    pub requests: u64,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub tokens: u64,
}

/// Cost and request count for one rolling period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodTotal {
    pub cost: f64,
    pub requests: u64,
}

/// The six rolling totals: current day/week/month and the periods
/// immediately before them. Weeks start on Monday.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryTotals {
    pub today: PeriodTotal,
    pub yesterday: PeriodTotal,
    pub this_week: PeriodTotal,
    pub last_week: PeriodTotal,
    pub this_month: PeriodTotal,
    pub last_month: PeriodTotal,
}
