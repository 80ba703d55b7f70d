// src/catalog.rs — Static lookup tables: campaign classification, agent
// names, and the exclusion filter.
//
// All three are plain data loaded from config at startup. Lookups never fail:
// unmapped numbers get the default campaign, unknown agents keep their raw id.

use std::collections::HashMap;

use crate::infra::config::{AgentEntry, CampaignsConfig, Config, ExclusionsConfig};

// ── Campaign classification ──────────────────────────────────────

/// Ordered (dnis, campaign) pairs with a default. First match wins.
#[derive(Debug, Clone)]
pub struct CampaignTable {
    entries: Vec<(String, String)>,
    default: String,
}

impl CampaignTable {
    pub fn new(entries: Vec<(String, String)>, default: impl Into<String>) -> Self {
        Self {
            entries,
            default: default.into(),
        }
    }

    pub fn from_config(config: &CampaignsConfig) -> Self {
        Self::new(
            config
                .entries
                .iter()
                .map(|e| (e.dnis.clone(), e.name.clone()))
                .collect(),
            config.default.clone(),
        )
    }

    pub fn classify(&self, dnis: &str) -> &str {
        self.entries
            .iter()
            .find(|(key, _)| key == dnis)
            .map(|(_, name)| name.as_str())
            .unwrap_or(&self.default)
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn default_name(&self) -> &str {
        &self.default
    }
}

// ── Agent catalog ────────────────────────────────────────────────

/// Shown for answered calls that carry no agent id.
pub const NO_AGENT: &str = "NO AGENT";

#[derive(Debug, Clone, Default)]
pub struct AgentCatalog {
    names: HashMap<String, String>,
}

impl AgentCatalog {
    pub fn from_entries(entries: &[AgentEntry]) -> Self {
        let names = entries
            .iter()
            .map(|e| (e.id.trim().to_string(), e.name.clone()))
            .collect();
        Self { names }
    }

    /// Display name for an agent id; the raw id when the catalog has no entry.
    pub fn resolve(&self, agent_id: &str) -> String {
        let id = agent_id.trim();
        if id.is_empty() {
            return NO_AGENT.to_string();
        }
        self.names
            .get(id)
            .cloned()
            .unwrap_or_else(|| agent_id.to_string())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

// ── Exclusions ───────────────────────────────────────────────────

/// Post-fetch exclusion check. The same identifiers are also excluded in SQL.
#[derive(Debug, Clone, Default)]
pub struct ExclusionFilter {
    dnis: Vec<String>,
    /// Upper-cased campaign names, matched as substrings.
    campaigns: Vec<String>,
}

impl ExclusionFilter {
    pub fn new(dnis: Vec<String>, campaigns: Vec<String>) -> Self {
        Self {
            dnis,
            campaigns: campaigns
                .into_iter()
                .map(|c| c.to_uppercase())
                .filter(|c| !c.is_empty())
                .collect(),
        }
    }

    pub fn from_config(config: &ExclusionsConfig) -> Self {
        Self::new(config.dnis.clone(), config.campaigns.clone())
    }

    pub fn excludes(&self, dnis: &str, campaign: &str) -> bool {
        if self.dnis.iter().any(|d| d == dnis.trim()) {
            return true;
        }
        let campaign = campaign.to_uppercase();
        self.campaigns.iter().any(|c| campaign.contains(c.as_str()))
    }

    pub fn excluded_dnis(&self) -> &[String] {
        &self.dnis
    }
}

/// Everything the data access layer needs to label and filter rows.
#[derive(Debug, Clone)]
pub struct Catalogs {
    pub campaigns: CampaignTable,
    pub agents: AgentCatalog,
    pub exclusions: ExclusionFilter,
}

impl Catalogs {
    pub fn from_config(config: &Config) -> Self {
        Self {
            campaigns: CampaignTable::from_config(&config.campaigns),
            agents: AgentCatalog::from_entries(&config.agents),
            exclusions: ExclusionFilter::from_config(&config.exclusions),
        }
    }
}
