// src/infra/config.rs — Configuration loading (TOML)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::infra::errors::DashError;
use crate::infra::paths;

/// Environment variable holding the call record database location.
pub const DB_ENV_VAR: &str = "CALLBOARD_DB";

pub const DEFAULT_CAMPAIGN: &str = "NO CAMPAIGN";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub report: ReportConfig,

    #[serde(default)]
    pub refresh: RefreshConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub exclusions: ExclusionsConfig,

    #[serde(default)]
    pub campaigns: CampaignsConfig,

    /// Agent id → display name catalog.
    #[serde(default)]
    pub agents: Vec<AgentEntry>,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub direction: String,
    /// Value of the hours flag for calls received inside business hours.
    pub in_hours_value: String,
    /// LIKE pattern for sub-categories excluded from interval traffic.
    pub test_call_pattern: String,
    pub service_level_threshold_secs: u32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            date_from: NaiveDate::from_ymd_opt(2025, 12, 1).unwrap_or_default(),
            date_to: NaiveDate::from_ymd_opt(2025, 12, 8).unwrap_or_default(),
            direction: "INBOUND".into(),
            in_hours_value: "Inside".into(),
            test_call_pattern: "%Test Call%".into(),
            service_level_threshold_secs: 20,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    pub interval_secs: u64,
    /// Upper bound for each data-access call.
    pub fetch_timeout_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: 60,
            fetch_timeout_secs: 15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub path: Option<String>,
    pub busy_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: None,
            busy_timeout_ms: 2_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExclusionsConfig {
    /// Called numbers removed from every query and every fetch result.
    pub dnis: Vec<String>,
    /// Campaign names removed from every fetch result (case-insensitive substring).
    pub campaigns: Vec<String>,
    /// Source campaign values removed from interval traffic at query time.
    pub source_campaigns: Vec<String>,
}

impl Default for ExclusionsConfig {
    fn default() -> Self {
        Self {
            dnis: vec!["5542112905".into()],
            campaigns: vec!["EGLOBAL".into()],
            source_campaigns: vec!["LIBERTAD".into(), "EGLOBAL".into(), "ASSISTANCE".into()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CampaignEntry {
    pub dnis: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignsConfig {
    #[serde(default = "default_campaign_name")]
    pub default: String,
    /// Ordered; the first matching entry wins.
    #[serde(default)]
    pub entries: Vec<CampaignEntry>,
}

fn default_campaign_name() -> String {
    DEFAULT_CAMPAIGN.into()
}

impl Default for CampaignsConfig {
    fn default() -> Self {
        let entries = [
            ("5550059224", "HERDEZ FOOD IVR"),
            ("5550059285", "HERDEZ CORPORATIVO"),
            ("5550059213", "HERDEZ CONFIANZA"),
            ("5547372149", "CRUZ AZUL"),
            ("5550059273", "CONFIANZA LIBERTAD"),
            ("5550059281", "HOY COBRO"),
            ("524427463582", "LIBERTAD REVOLVENTE 360"),
            ("5542112905", "EGLOBAL"),
            ("524429198123", "LIBERTAD"),
            ("4429198246", "LIBERTAD ATC"),
            ("524427463439", "LIBERTAD INVERSION"),
        ]
        .into_iter()
        .map(|(dnis, name)| CampaignEntry {
            dnis: dnis.into(),
            name: name.into(),
        })
        .collect();

        Self {
            default: default_campaign_name(),
            entries,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentEntry {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Serve the API next to the terminal dashboard. `serve` ignores it.
    pub enabled: bool,
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: 8051,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    /// Log file used by the terminal dashboard.
    pub file: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            file: None,
        }
    }
}

impl Config {
    /// Load config from file, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = paths::config_file_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DashError> {
        if self.report.date_from > self.report.date_to {
            return Err(DashError::Config(format!(
                "report.date_from ({}) is after report.date_to ({})",
                self.report.date_from, self.report.date_to
            )));
        }
        if self.refresh.interval_secs == 0 {
            return Err(DashError::Config("refresh.interval_secs must be > 0".into()));
        }
        if self.refresh.fetch_timeout_secs == 0 {
            return Err(DashError::Config(
                "refresh.fetch_timeout_secs must be > 0".into(),
            ));
        }
        Ok(())
    }

    /// Database location: CALLBOARD_DB, then `store.path`, then the data directory.
    pub fn db_path(&self) -> PathBuf {
        if let Some(p) = std::env::var_os(DB_ENV_VAR).filter(|p| !p.is_empty()) {
            return PathBuf::from(p);
        }
        self.store
            .path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(paths::default_db_path)
    }

    pub fn log_path(&self) -> PathBuf {
        self.log
            .file
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(paths::log_file_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_reasonable() {
        let c = Config::default();
        assert_eq!(c.refresh.interval_secs, 60);
        assert_eq!(c.report.service_level_threshold_secs, 20);
        assert_eq!(c.report.date_from.to_string(), "2025-12-01");
        assert_eq!(c.report.date_to.to_string(), "2025-12-08");
        assert_eq!(c.campaigns.default, "NO CAMPAIGN");
        assert_eq!(c.campaigns.entries.len(), 11);
        assert_eq!(c.exclusions.dnis, vec!["5542112905".to_string()]);
        assert!(c.agents.is_empty());
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.refresh.interval_secs, 60);
        assert_eq!(config.api.port, 8051);
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
[report]
date_from = "2026-01-01"
date_to = "2026-01-31"
direction = "INBOUND"
in_hours_value = "Inside"
test_call_pattern = "%Test%"
service_level_threshold_secs = 30

[refresh]
interval_secs = 30
fetch_timeout_secs = 5

[exclusions]
dnis = ["111", "222"]
campaigns = ["INTERNAL"]
source_campaigns = []

[campaigns]
default = "UNMAPPED"

[[campaigns.entries]]
dnis = "111"
name = "INTERNAL"

[[campaigns.entries]]
dnis = "333"
name = "SALES"

[[agents]]
id = "4245"
name = "Ada Byron"

[api]
enabled = false
port = 9000
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.report.date_to.to_string(), "2026-01-31");
        assert_eq!(config.report.service_level_threshold_secs, 30);
        assert_eq!(config.refresh.fetch_timeout_secs, 5);
        assert_eq!(config.exclusions.dnis.len(), 2);
        assert!(config.exclusions.source_campaigns.is_empty());
        assert_eq!(config.campaigns.default, "UNMAPPED");
        assert_eq!(config.campaigns.entries[1].name, "SALES");
        assert_eq!(config.agents[0].name, "Ada Byron");
        assert!(!config.api.enabled);
    }

    #[test]
    fn test_campaign_default_name_when_omitted() {
        let toml_str = r#"
[[campaigns.entries]]
dnis = "333"
name = "SALES"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.campaigns.default, DEFAULT_CAMPAIGN);
        assert_eq!(config.campaigns.entries.len(), 1);
    }

    #[test]
    fn test_validate_rejects_inverted_window() {
        let mut c = Config::default();
        c.report.date_from = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        c.report.date_to = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert!(matches!(c.validate(), Err(DashError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let mut c = Config::default();
        c.refresh.interval_secs = 0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_sample_config_parses() {
        let config: Config = toml::from_str(include_str!("../../demos/config.toml")).unwrap();
        config.validate().unwrap();
        assert_eq!(config.campaigns.entries.len(), 2);
        assert_eq!(config.agents.len(), 3);
        assert_eq!(config.store.path.as_deref(), Some("demo-calls.db"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[refresh]\ninterval_secs = 10\nfetch_timeout_secs = 2\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.refresh.interval_secs, 10);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_store_path_used_when_set() {
        let mut c = Config::default();
        c.store.path = Some("/tmp/calls.db".into());
        if std::env::var_os(DB_ENV_VAR).is_none() {
            assert_eq!(c.db_path(), PathBuf::from("/tmp/calls.db"));
        }
    }

    #[test]
    fn test_serialize_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.campaigns.entries, config.campaigns.entries);
        assert_eq!(deserialized.report.date_from, config.report.date_from);
    }
}
