//! Analytics: Dashboard statistics derived from the assessment history.
//!
//! Everything here is a full scan over the history snapshot, recomputed on
//! demand and never cached. The service wrapper degrades an unreadable
//! store to an empty history, because dashboard output is advisory.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDateTime};
use serde::Serialize;

use crate::domain::{AssessmentRecord, RiskLevel};
use crate::ports::HistoryStore;

/// Assessment counts per risk level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RiskDistribution {
    pub low: usize,
    pub moderate: usize,
    pub high: usize,
}

/// Assessments committed during one ISO week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeeklyCount {
    /// ISO week-based year
    pub year: i32,
    /// ISO week number (1-53)
    pub week: u32,
    pub count: usize,
}

/// One clinical threshold breach among high-risk records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskFactor {
    pub label: &'static str,
    pub count: usize,
    /// Share of high-risk records breaching this threshold, 1 decimal
    pub percentage: f64,
}

/// Dashboard statistics. Derived, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_assessments: usize,
    pub high_risk_count: usize,
    /// high_risk_count / total × 100, 1 decimal, 0 for an empty history
    pub high_risk_percentage: f64,
    /// Mean confidence across records with a parseable confidence, 1 decimal
    pub avg_confidence: f64,
    /// Records committed within the trailing 7 days
    pub last_7_days: usize,
    pub risk_distribution: RiskDistribution,
    /// Most recent 12 ISO weeks having at least one record, chronological
    pub weekly_trend: Vec<WeeklyCount>,
    /// Top 5 threshold breaches among high-risk records, by count descending
    pub risk_factors: Vec<RiskFactor>,
}

/// Number of trailing ISO weeks shown on the trend chart.
const TREND_WEEKS: usize = 12;

/// Number of risk factors reported.
const TOP_FACTORS: usize = 5;

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Compute dashboard statistics over a history snapshot.
///
/// Pure and idempotent: the same snapshot and `now` yield identical output.
/// An empty history yields all-zero statistics, never an error.
#[must_use]
pub fn compute_dashboard(records: &[AssessmentRecord], now: NaiveDateTime) -> DashboardStats {
    let total = records.len();
    if total == 0 {
        return DashboardStats::default();
    }

    let mut distribution = RiskDistribution::default();
    for record in records {
        match record.risk_level {
            RiskLevel::Low => distribution.low += 1,
            RiskLevel::Moderate => distribution.moderate += 1,
            RiskLevel::High => distribution.high += 1,
        }
    }
    let high_risk_count = distribution.high;
    let high_risk_percentage = round1(high_risk_count as f64 / total as f64 * 100.0);

    // Malformed confidence strings are skipped per-record, not fatal.
    let confidences: Vec<f64> = records
        .iter()
        .filter_map(AssessmentRecord::confidence_value)
        .collect();
    let avg_confidence = if confidences.is_empty() {
        0.0
    } else {
        round1(confidences.iter().sum::<f64>() / confidences.len() as f64)
    };

    let week_ago = now - Duration::days(7);
    let last_7_days = records.iter().filter(|r| r.timestamp >= week_ago).count();

    DashboardStats {
        total_assessments: total,
        high_risk_count,
        high_risk_percentage,
        avg_confidence,
        last_7_days,
        risk_distribution: distribution,
        weekly_trend: weekly_trend(records),
        risk_factors: risk_factors(records, high_risk_count),
    }
}

/// Counts per ISO week, chronological, capped to the most recent weeks
/// that have at least one record.
fn weekly_trend(records: &[AssessmentRecord]) -> Vec<WeeklyCount> {
    let mut buckets: BTreeMap<(i32, u32), usize> = BTreeMap::new();
    for record in records {
        let week = record.timestamp.iso_week();
        *buckets.entry((week.year(), week.week())).or_default() += 1;
    }

    let skip = buckets.len().saturating_sub(TREND_WEEKS);
    buckets
        .into_iter()
        .skip(skip)
        .map(|((year, week), count)| WeeklyCount { year, week, count })
        .collect()
}

/// Threshold-breach prevalence among high-risk records only.
///
/// Lab-dependent factors count only records where the value was actually
/// measured; an absent value never reads as zero.
fn risk_factors(records: &[AssessmentRecord], high_risk_count: usize) -> Vec<RiskFactor> {
    if high_risk_count == 0 {
        return Vec::new();
    }

    let high_risk = records.iter().filter(|r| r.risk_level == RiskLevel::High);

    let mut high_bmi = 0usize;
    let mut hypertension = 0usize;
    let mut high_sugar = 0usize;
    let mut severe_anemia = 0usize;
    for record in high_risk {
        if record.bmi >= 30.0 {
            high_bmi += 1;
        }
        if record.systolic >= 140.0 || record.diastolic >= 90.0 {
            hypertension += 1;
        }
        if record.blood_sugar.is_some_and(|v| v >= 7.0) {
            high_sugar += 1;
        }
        if record.hemoglobin.is_some_and(|v| v < 9.5) {
            severe_anemia += 1;
        }
    }

    let mut factors: Vec<RiskFactor> = [
        ("High BMI (≥30 kg/m²)", high_bmi),
        ("Hypertension (BP ≥140/90)", hypertension),
        ("High Blood Sugar (≥7.0 mmol/L)", high_sugar),
        ("Severe Anemia (Hb <9.5 g/dL)", severe_anemia),
    ]
    .into_iter()
    .filter(|(_, count)| *count > 0)
    .map(|(label, count)| RiskFactor {
        label,
        count,
        percentage: round1(count as f64 / high_risk_count as f64 * 100.0),
    })
    .collect();

    factors.sort_by(|a, b| b.count.cmp(&a.count));
    factors.truncate(TOP_FACTORS);
    factors
}

/// Service computing dashboard statistics over a history store.
pub struct AnalyticsService<S>
where
    S: HistoryStore,
{
    store: Arc<S>,
}

impl<S> AnalyticsService<S>
where
    S: HistoryStore,
{
    /// Create a new analytics service.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Compute current dashboard statistics.
    ///
    /// The dashboard is advisory: an unreadable store degrades to an
    /// empty history rather than failing the caller.
    #[must_use]
    pub fn dashboard(&self, now: NaiveDateTime) -> DashboardStats {
        let records = match self.store.load_all() {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("History unreadable during analytics: {e}");
                Vec::new()
            }
        };
        compute_dashboard(&records, now)
    }
}
