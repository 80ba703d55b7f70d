// src/metrics/mod.rs — Metric derivation.
//
// Pure functions from filtered interval counts to the dashboard snapshot.
// Every ratio goes through `safe_ratio`: a zero (or non-finite) denominator
// yields 0, never NaN or infinity.

use chrono::{DateTime, Local};

use crate::access::FetchReport;
use crate::model::{DashboardSnapshot, IntervalRecord, IntervalTraffic, Totals};

/// `num / den`, or 0 when the division is undefined or not finite.
pub fn safe_ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 || !den.is_finite() || !num.is_finite() {
        return 0.0;
    }
    let r = num / den;
    if r.is_finite() {
        r
    } else {
        0.0
    }
}

/// A share in [0, 1]. Counts that violate `part <= whole` are clamped.
pub fn safe_fraction(part: u64, whole: u64) -> f64 {
    safe_ratio(part as f64, whole as f64).clamp(0.0, 1.0)
}

/// Round to the nearest whole second, ties to even.
pub fn round_secs(value: f64) -> f64 {
    if value.is_finite() {
        value.round_ties_even().max(0.0)
    } else {
        0.0
    }
}

/// Interval records and their totals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedTraffic {
    pub intervals: Vec<IntervalRecord>,
    pub totals: Totals,
}

pub fn derive_interval(row: &IntervalTraffic) -> IntervalRecord {
    IntervalRecord {
        interval_label: row.interval_label.clone(),
        received: row.received,
        answered: row.answered,
        abandoned: row.abandoned,
        answered_within_threshold: row.answered_within_threshold,
        avg_speed_of_answer: round_secs(row.avg_speed_of_answer),
        avg_handle_time: round_secs(row.avg_handle_time),
        pct_abandoned: safe_fraction(row.abandoned, row.received),
        pct_service_level: safe_fraction(row.answered_within_threshold, row.answered),
    }
}

/// Derive per-interval percentages and the answer-weighted totals.
///
/// Interval ASA/AHT are rounded first and the weighted averages are taken
/// over the rounded values, so results are reproducible from the table.
pub fn derive_metrics(rows: &[IntervalTraffic]) -> DerivedTraffic {
    let intervals: Vec<IntervalRecord> = rows.iter().map(derive_interval).collect();

    let mut totals = Totals::default();
    let mut weighted_asa = 0.0;
    let mut weighted_aht = 0.0;
    for r in &intervals {
        totals.received += r.received;
        totals.answered += r.answered;
        totals.abandoned += r.abandoned;
        totals.answered_within_threshold += r.answered_within_threshold;
        weighted_asa += r.avg_speed_of_answer * r.answered as f64;
        weighted_aht += r.avg_handle_time * r.answered as f64;
    }

    totals.pct_abandoned = safe_fraction(totals.abandoned, totals.received);
    totals.pct_answered = safe_fraction(totals.answered, totals.received);
    totals.pct_service_level = safe_fraction(totals.answered_within_threshold, totals.answered);
    totals.avg_speed_of_answer = round_secs(safe_ratio(weighted_asa, totals.answered as f64));
    totals.avg_handle_time = round_secs(safe_ratio(weighted_aht, totals.answered as f64));

    DerivedTraffic { intervals, totals }
}

/// Assemble the snapshot for one refresh cycle.
pub fn build_snapshot(report: FetchReport, cycle: u64, generated_at: DateTime<Local>) -> DashboardSnapshot {
    let derived = derive_metrics(&report.intervals);
    DashboardSnapshot {
        cycle,
        generated_at,
        totals: derived.totals,
        intervals: derived.intervals,
        campaigns: report.campaigns,
        agents: report.agents,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn traffic(label: &str, received: u64, answered: u64, within: u64, asa: f64, aht: f64) -> IntervalTraffic {
        IntervalTraffic {
            interval_label: label.into(),
            received,
            answered,
            abandoned: received.saturating_sub(answered),
            answered_within_threshold: within,
            avg_speed_of_answer: asa,
            avg_handle_time: aht,
        }
    }

    #[test]
    fn test_safe_ratio_zero_denominator() {
        assert_eq!(safe_ratio(5.0, 0.0), 0.0);
        assert_eq!(safe_ratio(0.0, 0.0), 0.0);
        assert_eq!(safe_ratio(f64::NAN, 2.0), 0.0);
        assert_eq!(safe_ratio(1.0, f64::INFINITY), 0.0);
        assert_eq!(safe_ratio(3.0, 4.0), 0.75);
    }

    #[test]
    fn test_safe_fraction_clamps() {
        assert_eq!(safe_fraction(5, 4), 1.0);
        assert_eq!(safe_fraction(0, 0), 0.0);
    }

    #[test]
    fn test_round_ties_even() {
        assert_eq!(round_secs(2.5), 2.0);
        assert_eq!(round_secs(3.5), 4.0);
        assert_eq!(round_secs(10.4), 10.0);
        assert_eq!(round_secs(f64::NAN), 0.0);
    }

    #[test]
    fn test_interval_percentages() {
        let r = derive_interval(&traffic("08:00", 10, 8, 6, 12.4, 200.6));
        assert!((r.pct_abandoned - 0.2).abs() < 1e-12);
        assert!((r.pct_service_level - 0.75).abs() < 1e-12);
        assert_eq!(r.avg_speed_of_answer, 12.0);
        assert_eq!(r.avg_handle_time, 201.0);
    }

    #[test]
    fn test_interval_zero_denominators() {
        let r = derive_interval(&traffic("08:00", 0, 0, 0, 0.0, 0.0));
        assert_eq!(r.pct_abandoned, 0.0);
        assert_eq!(r.pct_service_level, 0.0);

        // Received but nothing answered: abandonment defined, service level 0.
        let r = derive_interval(&traffic("08:30", 3, 0, 0, 0.0, 0.0));
        assert_eq!(r.pct_abandoned, 1.0);
        assert_eq!(r.pct_service_level, 0.0);
    }

    #[test]
    fn test_weighted_asa() {
        let d = derive_metrics(&[
            traffic("08:00", 2, 2, 2, 10.0, 100.0),
            traffic("08:30", 3, 3, 3, 20.0, 200.0),
        ]);
        assert_eq!(d.totals.avg_speed_of_answer, 16.0);
        assert_eq!(d.totals.avg_handle_time, 160.0);
    }

    #[test]
    fn test_weighted_average_uses_rounded_inputs() {
        let d = derive_metrics(&[
            traffic("08:00", 4, 4, 4, 1.4, 0.0),
            traffic("08:30", 1, 1, 1, 3.0, 0.0),
        ]);
        // Rounded first: (1*4 + 3*1) / 5 = 1.4 -> 1. Raw first would give 1.72 -> 2.
        assert_eq!(d.totals.avg_speed_of_answer, 1.0);
    }

    #[test]
    fn test_empty_rows_all_zero() {
        let d = derive_metrics(&[]);
        assert!(d.intervals.is_empty());
        assert_eq!(d.totals, Totals::default());
    }

    #[test]
    fn test_totals() {
        let d = derive_metrics(&[
            traffic("08:00", 10, 9, 8, 5.0, 100.0),
            traffic("08:30", 10, 7, 5, 15.0, 300.0),
        ]);
        assert_eq!(d.totals.received, 20);
        assert_eq!(d.totals.answered, 16);
        assert_eq!(d.totals.abandoned, 4);
        assert!((d.totals.pct_abandoned - 0.2).abs() < 1e-12);
        assert!((d.totals.pct_answered - 0.8).abs() < 1e-12);
        assert!((d.totals.pct_service_level - 13.0 / 16.0).abs() < 1e-12);
    }

    #[test]
    fn test_build_snapshot_carries_records() {
        let report = FetchReport {
            intervals: vec![traffic("08:00", 1, 1, 1, 1.0, 1.0)],
            campaigns: vec![crate::model::CampaignRecord {
                campaign_name: "SALES".into(),
                interaction_count: 1,
            }],
            ..Default::default()
        };
        let snap = build_snapshot(report, 7, Local::now());
        assert_eq!(snap.cycle, 7);
        assert_eq!(snap.intervals.len(), 1);
        assert_eq!(snap.campaigns.len(), 1);
        assert!(snap.agents.is_empty());
    }
}
