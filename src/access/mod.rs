// src/access/mod.rs — Data access layer.
//
// Three read operations over the call record source. Each one bounds the
// source call with a timeout, drops excluded rows again after the fetch,
// folds the grouped rows into dashboard records, and on any failure logs a
// diagnostic and returns an empty table. Nothing here returns an error.

pub mod fold;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::catalog::Catalogs;
use crate::infra::config::Config;
use crate::infra::errors::{DashError, ErrorKind, Result};
use crate::model::{AgentRecord, CampaignRecord, IntervalTraffic};
use crate::store::query::ReportQuery;
use crate::store::store::{RawAgentRow, RawCampaignRow, RawIntervalRow};

/// The upstream call record store, seen through its three aggregate queries.
#[async_trait]
pub trait TrafficSource: Send + Sync {
    async fn interval_traffic(&self, query: Arc<ReportQuery>) -> Result<Vec<RawIntervalRow>>;
    async fn campaign_summary(&self, query: Arc<ReportQuery>) -> Result<Vec<RawCampaignRow>>;
    async fn agent_breakdown(&self, query: Arc<ReportQuery>) -> Result<Vec<RawAgentRow>>;
}

/// A fetch that degraded to an empty table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub operation: &'static str,
    pub kind: ErrorKind,
}

/// Results of one round of the three fetches.
#[derive(Debug, Default)]
pub struct FetchReport {
    pub intervals: Vec<IntervalTraffic>,
    pub campaigns: Vec<CampaignRecord>,
    pub agents: Vec<AgentRecord>,
    pub failures: Vec<FetchFailure>,
}

pub struct DataAccess {
    source: Arc<dyn TrafficSource>,
    query: Arc<ReportQuery>,
    catalogs: Catalogs,
    timeout: Duration,
}

impl DataAccess {
    pub fn new(source: Arc<dyn TrafficSource>, config: &Config) -> Self {
        Self {
            source,
            query: Arc::new(ReportQuery::from_config(config)),
            catalogs: Catalogs::from_config(config),
            timeout: Duration::from_secs(config.refresh.fetch_timeout_secs),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn fetch_interval_traffic(&self) -> Vec<IntervalTraffic> {
        self.interval_traffic().await.unwrap_or_default()
    }

    pub async fn fetch_campaign_summary(&self) -> Vec<CampaignRecord> {
        self.campaign_summary().await.unwrap_or_default()
    }

    pub async fn fetch_agent_breakdown(&self) -> Vec<AgentRecord> {
        self.agent_breakdown().await.unwrap_or_default()
    }

    /// Run the three fetches concurrently. They are independent reads.
    pub async fn fetch_all(&self) -> FetchReport {
        let (intervals, campaigns, agents) = tokio::join!(
            self.interval_traffic(),
            self.campaign_summary(),
            self.agent_breakdown()
        );

        let mut report = FetchReport::default();
        match intervals {
            Ok(rows) => report.intervals = rows,
            Err(f) => report.failures.push(f),
        }
        match campaigns {
            Ok(rows) => report.campaigns = rows,
            Err(f) => report.failures.push(f),
        }
        match agents {
            Ok(rows) => report.agents = rows,
            Err(f) => report.failures.push(f),
        }
        report
    }

    async fn interval_traffic(&self) -> std::result::Result<Vec<IntervalTraffic>, FetchFailure> {
        let rows = self
            .guarded(
                "fetch_interval_traffic",
                self.source.interval_traffic(self.query.clone()),
            )
            .await?;
        let rows = self.retain_allowed(rows, |r| (&r.dnis, &r.campaign));
        Ok(fold::fold_intervals(rows))
    }

    async fn campaign_summary(&self) -> std::result::Result<Vec<CampaignRecord>, FetchFailure> {
        let rows = self
            .guarded(
                "fetch_campaign_summary",
                self.source.campaign_summary(self.query.clone()),
            )
            .await?;
        let rows = self.retain_allowed(rows, |r| (&r.dnis, &r.campaign));
        Ok(fold::merge_campaigns(rows))
    }

    async fn agent_breakdown(&self) -> std::result::Result<Vec<AgentRecord>, FetchFailure> {
        let rows = self
            .guarded(
                "fetch_agent_breakdown",
                self.source.agent_breakdown(self.query.clone()),
            )
            .await?;
        let rows = self.retain_allowed(rows, |r| (&r.dnis, &r.campaign));
        Ok(fold::merge_agents(rows, &self.catalogs.agents))
    }

    /// Apply the timeout and turn any failure into a logged `FetchFailure`.
    async fn guarded<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = Result<Vec<T>>>,
    ) -> std::result::Result<Vec<T>, FetchFailure> {
        let res = match tokio::time::timeout(self.timeout, fut).await {
            Ok(res) => res,
            Err(_) => Err(DashError::Timeout {
                operation,
                secs: self.timeout.as_secs(),
            }),
        };

        res.map_err(|e| {
            let kind = e.kind();
            tracing::error!(operation, kind = kind.as_str(), "{e}");
            FetchFailure { operation, kind }
        })
    }

    /// Post-fetch exclusion pass; the query already excludes the same numbers.
    fn retain_allowed<T>(&self, rows: Vec<T>, key: impl Fn(&T) -> (&String, &String)) -> Vec<T> {
        let before = rows.len();
        let kept: Vec<T> = rows
            .into_iter()
            .filter(|r| {
                let (dnis, campaign) = key(r);
                !self.catalogs.exclusions.excludes(dnis, campaign)
            })
            .collect();
        if kept.len() != before {
            tracing::warn!(
                dropped = before - kept.len(),
                "Excluded rows reached the post-fetch filter"
            );
        }
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Source returning canned rows, or a fixed error per operation.
    #[derive(Default)]
    struct CannedSource {
        intervals: Vec<RawIntervalRow>,
        campaigns: Vec<RawCampaignRow>,
        agents: Vec<RawAgentRow>,
        fail_intervals: Mutex<Option<DashError>>,
        stall: bool,
    }

    #[async_trait]
    impl TrafficSource for CannedSource {
        async fn interval_traffic(&self, _q: Arc<ReportQuery>) -> Result<Vec<RawIntervalRow>> {
            if self.stall {
                std::future::pending::<()>().await;
            }
            if let Some(e) = self.fail_intervals.lock().unwrap().take() {
                return Err(e);
            }
            Ok(self.intervals.clone())
        }

        async fn campaign_summary(&self, _q: Arc<ReportQuery>) -> Result<Vec<RawCampaignRow>> {
            Ok(self.campaigns.clone())
        }

        async fn agent_breakdown(&self, _q: Arc<ReportQuery>) -> Result<Vec<RawAgentRow>> {
            Ok(self.agents.clone())
        }
    }

    fn interval(label: &str, dnis: &str, campaign: &str, received: u64) -> RawIntervalRow {
        RawIntervalRow {
            interval_label: label.into(),
            dnis: dnis.into(),
            campaign: campaign.into(),
            received,
            answered: received,
            abandoned: 0,
            answered_within_threshold: received,
            answer_wait_secs: 10.0 * received as f64,
            handle_secs: 100.0 * received as f64,
        }
    }

    fn access(source: CannedSource) -> DataAccess {
        DataAccess::new(Arc::new(source), &Config::default())
    }

    #[tokio::test]
    async fn test_injected_excluded_rows_are_dropped() {
        let source = CannedSource {
            intervals: vec![
                interval("08:00", "5547372149", "CRUZ AZUL", 4),
                interval("08:00", "5542112905", "EGLOBAL", 50),
                interval("08:30", "1234", "eglobal promo", 7),
            ],
            campaigns: vec![
                RawCampaignRow {
                    dnis: "5542112905".into(),
                    campaign: "EGLOBAL".into(),
                    interactions: 99,
                },
                RawCampaignRow {
                    dnis: "5547372149".into(),
                    campaign: "CRUZ AZUL".into(),
                    interactions: 3,
                },
            ],
            agents: vec![RawAgentRow {
                agent_id: "4245".into(),
                dnis: "5542112905".into(),
                campaign: "EGLOBAL".into(),
                interactions: 12,
            }],
            ..Default::default()
        };
        let report = access(source).fetch_all().await;

        assert_eq!(report.intervals.len(), 1);
        assert_eq!(report.intervals[0].received, 4);
        assert_eq!(report.campaigns.len(), 1);
        assert_eq!(report.campaigns[0].campaign_name, "CRUZ AZUL");
        assert!(report.agents.is_empty());
        assert!(report.failures.is_empty());
    }

    #[tokio::test]
    async fn test_failure_degrades_to_empty_table() {
        let source = CannedSource {
            intervals: vec![interval("08:00", "1", "NO CAMPAIGN", 4)],
            fail_intervals: Mutex::new(Some(DashError::DataShape("missing column".into()))),
            ..Default::default()
        };
        let access = access(source);

        let report = access.fetch_all().await;
        assert!(report.intervals.is_empty());
        assert_eq!(
            report.failures,
            vec![FetchFailure {
                operation: "fetch_interval_traffic",
                kind: ErrorKind::DataShape,
            }]
        );

        // The canned error is consumed; the next fetch succeeds.
        assert_eq!(access.fetch_interval_traffic().await.len(), 1);
    }

    #[tokio::test]
    async fn test_stalled_source_times_out() {
        let source = CannedSource {
            stall: true,
            ..Default::default()
        };
        let access = access(source).with_timeout(Duration::from_millis(20));
        let report = access.fetch_all().await;
        assert!(report.intervals.is_empty());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].kind, ErrorKind::Timeout);
    }
}
