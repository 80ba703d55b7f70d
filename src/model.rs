// src/model.rs — Dashboard data model shared by every layer.

use std::sync::Arc;

use chrono::{DateTime, Local};
use serde::Serialize;

/// Counts for one interval after exclusion filtering, before derivation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IntervalTraffic {
    pub interval_label: String,
    pub received: u64,
    pub answered: u64,
    pub abandoned: u64,
    pub answered_within_threshold: u64,
    /// Mean wait before answer, unrounded.
    pub avg_speed_of_answer: f64,
    /// Mean talk + wrap-up per answered call, unrounded.
    pub avg_handle_time: f64,
}

/// One interval row of the dashboard. Percentages are fractions in [0, 1].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IntervalRecord {
    pub interval_label: String,
    pub received: u64,
    pub answered: u64,
    pub abandoned: u64,
    pub answered_within_threshold: u64,
    /// Seconds, rounded to the nearest integer.
    pub avg_speed_of_answer: f64,
    /// Seconds, rounded to the nearest integer.
    pub avg_handle_time: f64,
    pub pct_abandoned: f64,
    pub pct_service_level: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CampaignRecord {
    pub campaign_name: String,
    pub interaction_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentRecord {
    pub agent_name: String,
    pub interaction_count: u64,
}

/// Aggregates across all intervals.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Totals {
    pub received: u64,
    pub answered: u64,
    pub abandoned: u64,
    pub answered_within_threshold: u64,
    pub pct_abandoned: f64,
    pub pct_answered: f64,
    pub pct_service_level: f64,
    /// Answer-weighted mean of the rounded interval ASA, rounded.
    pub avg_speed_of_answer: f64,
    /// Answer-weighted mean of the rounded interval AHT, rounded.
    pub avg_handle_time: f64,
}

/// Everything rendered for one refresh cycle. Never mutated once published.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub cycle: u64,
    pub generated_at: DateTime<Local>,
    pub totals: Totals,
    pub intervals: Vec<IntervalRecord>,
    pub campaigns: Vec<CampaignRecord>,
    pub agents: Vec<AgentRecord>,
}

impl DashboardSnapshot {
    /// Zero-valued snapshot used before the first refresh completes.
    pub fn empty(cycle: u64, generated_at: DateTime<Local>) -> Self {
        Self {
            cycle,
            generated_at,
            totals: Totals::default(),
            intervals: Vec::new(),
            campaigns: Vec::new(),
            agents: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty() && self.campaigns.is_empty() && self.agents.is_empty()
    }
}

pub type SharedSnapshot = Arc<DashboardSnapshot>;
