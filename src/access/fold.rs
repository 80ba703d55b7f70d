// src/access/fold.rs — Collapse filtered (key, dnis, campaign) groups into
// one record per interval, campaign and agent.

use std::collections::{BTreeMap, HashMap};

use crate::catalog::AgentCatalog;
use crate::metrics::safe_ratio;
use crate::model::{AgentRecord, CampaignRecord, IntervalTraffic};
use crate::store::store::{RawAgentRow, RawCampaignRow, RawIntervalRow};

#[derive(Default)]
struct IntervalSums {
    received: u64,
    answered: u64,
    abandoned: u64,
    within: u64,
    wait_secs: f64,
    handle_secs: f64,
}

/// One row per interval label, ordered by label.
pub fn fold_intervals(rows: Vec<RawIntervalRow>) -> Vec<IntervalTraffic> {
    let mut by_label: BTreeMap<String, IntervalSums> = BTreeMap::new();
    for row in rows {
        let sums = by_label.entry(row.interval_label).or_default();
        sums.received += row.received;
        sums.answered += row.answered;
        sums.abandoned += row.abandoned;
        sums.within += row.answered_within_threshold;
        sums.wait_secs += row.answer_wait_secs;
        sums.handle_secs += row.handle_secs;
    }

    by_label
        .into_iter()
        .map(|(interval_label, s)| IntervalTraffic {
            interval_label,
            received: s.received,
            answered: s.answered,
            abandoned: s.abandoned,
            answered_within_threshold: s.within,
            avg_speed_of_answer: safe_ratio(s.wait_secs, s.answered as f64),
            avg_handle_time: safe_ratio(s.handle_secs, s.answered as f64),
        })
        .collect()
}

/// Sum per campaign name, ascending by volume (ties by name).
pub fn merge_campaigns(rows: Vec<RawCampaignRow>) -> Vec<CampaignRecord> {
    let mut by_name: HashMap<String, u64> = HashMap::new();
    for row in rows {
        *by_name.entry(row.campaign).or_default() += row.interactions;
    }

    let mut records: Vec<CampaignRecord> = by_name
        .into_iter()
        .map(|(campaign_name, interaction_count)| CampaignRecord {
            campaign_name,
            interaction_count,
        })
        .collect();
    records.sort_by(|a, b| {
        a.interaction_count
            .cmp(&b.interaction_count)
            .then_with(|| a.campaign_name.cmp(&b.campaign_name))
    });
    records
}

/// Sum per agent id, resolve names, descending by volume (ties by name).
pub fn merge_agents(rows: Vec<RawAgentRow>, catalog: &AgentCatalog) -> Vec<AgentRecord> {
    let mut by_id: HashMap<String, u64> = HashMap::new();
    for row in rows {
        *by_id.entry(row.agent_id).or_default() += row.interactions;
    }

    let mut records: Vec<AgentRecord> = by_id
        .into_iter()
        .map(|(id, interaction_count)| AgentRecord {
            agent_name: catalog.resolve(&id),
            interaction_count,
        })
        .collect();
    records.sort_by(|a, b| {
        b.interaction_count
            .cmp(&a.interaction_count)
            .then_with(|| a.agent_name.cmp(&b.agent_name))
    });
    records
}
