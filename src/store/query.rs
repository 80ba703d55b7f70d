// src/store/query.rs — Parametrized aggregate queries over `call_records`
//
// Every query groups by its key plus (dnis, campaign) so that rows can be
// filtered again after the fetch. Values are always bound, never spliced.

use chrono::NaiveDate;
use rusqlite::types::Value;

use crate::catalog::CampaignTable;
use crate::infra::config::Config;

/// Report window and filters shared by the three aggregate queries.
#[derive(Debug, Clone)]
pub struct ReportQuery {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub direction: String,
    pub in_hours_value: String,
    pub test_call_pattern: String,
    pub service_level_threshold_secs: u32,
    pub excluded_dnis: Vec<String>,
    pub excluded_source_campaigns: Vec<String>,
    pub campaigns: CampaignTable,
}

impl ReportQuery {
    pub fn from_config(config: &Config) -> Self {
        Self {
            date_from: config.report.date_from,
            date_to: config.report.date_to,
            direction: config.report.direction.clone(),
            in_hours_value: config.report.in_hours_value.clone(),
            test_call_pattern: config.report.test_call_pattern.clone(),
            service_level_threshold_secs: config.report.service_level_threshold_secs,
            excluded_dnis: config.exclusions.dnis.clone(),
            excluded_source_campaigns: config.exclusions.source_campaigns.clone(),
            campaigns: CampaignTable::from_config(&config.campaigns),
        }
    }
}

/// SQL text plus its positional parameters, in textual order.
#[derive(Debug, Default)]
pub struct BoundSql {
    pub sql: String,
    pub params: Vec<Value>,
}

impl BoundSql {
    fn push(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }

    fn bind(&mut self, value: impl Into<Value>) {
        self.sql.push('?');
        self.params.push(value.into());
    }

    fn bind_list(&mut self, values: &[String]) {
        for (i, v) in values.iter().enumerate() {
            if i > 0 {
                self.sql.push_str(", ");
            }
            self.bind(v.clone());
        }
    }

    /// `CASE dnis WHEN ? THEN ? ... ELSE ? END`, or just the default.
    fn campaign_case(&mut self, table: &CampaignTable) {
        if table.entries().is_empty() {
            self.bind(table.default_name().to_string());
            return;
        }
        self.push("CASE dnis");
        for (dnis, name) in table.entries() {
            self.push(" WHEN ");
            self.bind(dnis.clone());
            self.push(" THEN ");
            self.bind(name.clone());
        }
        self.push(" ELSE ");
        self.bind(table.default_name().to_string());
        self.push(" END");
    }

    /// Date window, direction, IVR and excluded-number conditions shared by all queries.
    fn common_filters(&mut self, q: &ReportQuery) {
        self.push("\n    WHERE date(call_date) BETWEEN ");
        self.bind(q.date_from.to_string());
        self.push(" AND ");
        self.bind(q.date_to.to_string());
        self.push("\n      AND direction = ");
        self.bind(q.direction.clone());
        self.push("\n      AND COALESCE(ivr_secs, 0) <> 0");
        if !q.excluded_dnis.is_empty() {
            self.push("\n      AND dnis NOT IN (");
            self.bind_list(&q.excluded_dnis);
            self.push(")");
        }
    }
}

pub fn interval_traffic_sql(q: &ReportQuery) -> BoundSql {
    let mut s = BoundSql::default();
    s.push("WITH base AS (\n    SELECT interval_label, dnis, ");
    s.campaign_case(&q.campaigns);
    s.push(
        " AS campaign,
        CASE WHEN abandoned = 0 THEN 1 ELSE 0 END AS is_answered,
        CASE WHEN abandoned <> 0 THEN 1 ELSE 0 END AS is_abandoned,
        COALESCE(queue_secs, 0) + COALESCE(ring_secs, 0) AS wait_secs,
        COALESCE(talk_secs, 0) + COALESCE(wrapup_secs, 0) AS handle_secs
    FROM call_records",
    );
    s.common_filters(q);
    s.push("\n      AND hours_flag = ");
    s.bind(q.in_hours_value.clone());
    if !q.test_call_pattern.is_empty() {
        s.push("\n      AND (sub_category IS NULL OR sub_category NOT LIKE ");
        s.bind(q.test_call_pattern.clone());
        s.push(")");
    }
    if !q.excluded_source_campaigns.is_empty() {
        // NULL source campaigns fail NOT IN and are dropped.
        s.push("\n      AND source_campaign NOT IN (");
        s.bind_list(&q.excluded_source_campaigns);
        s.push(")");
    }
    s.push(
        "\n)
SELECT interval_label, dnis, campaign,
       COUNT(*) AS received,
       SUM(is_answered) AS answered,
       SUM(is_abandoned) AS abandoned,
       SUM(CASE WHEN is_answered = 1 AND wait_secs <= ",
    );
    s.bind(i64::from(q.service_level_threshold_secs));
    s.push(
        " THEN 1 ELSE 0 END) AS within_threshold,
       SUM(CASE WHEN is_answered = 1 THEN wait_secs ELSE 0 END) AS answer_wait_secs,
       SUM(handle_secs) AS handle_secs
FROM base
GROUP BY interval_label, dnis, campaign
ORDER BY interval_label",
    );
    s
}

pub fn campaign_summary_sql(q: &ReportQuery) -> BoundSql {
    let mut s = BoundSql::default();
    s.push("SELECT dnis, ");
    s.campaign_case(&q.campaigns);
    s.push(" AS campaign, COUNT(*) AS interactions\n    FROM call_records");
    s.common_filters(q);
    s.push("\nGROUP BY dnis\nORDER BY interactions ASC");
    s
}

pub fn agent_breakdown_sql(q: &ReportQuery) -> BoundSql {
    let mut s = BoundSql::default();
    s.push("SELECT COALESCE(last_agent, '') AS agent_id, dnis, ");
    s.campaign_case(&q.campaigns);
    s.push(" AS campaign, COUNT(*) AS interactions\n    FROM call_records");
    s.common_filters(q);
    s.push("\n      AND abandoned = 0");
    s.push("\nGROUP BY agent_id, dnis\nORDER BY interactions DESC");
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placeholders(sql: &str) -> usize {
        sql.matches('?').count()
    }

    #[test]
    fn test_placeholder_count_matches_params() {
        let q = ReportQuery::from_config(&Config::default());
        for bound in [
            interval_traffic_sql(&q),
            campaign_summary_sql(&q),
            agent_breakdown_sql(&q),
        ] {
            assert_eq!(placeholders(&bound.sql), bound.params.len(), "{}", bound.sql);
        }
    }

    #[test]
    fn test_excluded_dnis_bound_not_spliced() {
        let q = ReportQuery::from_config(&Config::default());
        let bound = campaign_summary_sql(&q);
        assert!(bound.sql.contains("dnis NOT IN (?)"));
        assert!(bound
            .params
            .contains(&Value::Text("5542112905".to_string())));
    }

    #[test]
    fn test_empty_campaign_table_binds_default() {
        let mut config = Config::default();
        config.campaigns.entries.clear();
        let q = ReportQuery::from_config(&config);
        let bound = agent_breakdown_sql(&q);
        assert!(!bound.sql.contains("CASE dnis"));
        assert_eq!(placeholders(&bound.sql), bound.params.len());
    }

    #[test]
    fn test_no_exclusion_clause_when_list_empty() {
        let mut config = Config::default();
        config.exclusions.dnis.clear();
        config.exclusions.source_campaigns.clear();
        let q = ReportQuery::from_config(&config);
        let bound = interval_traffic_sql(&q);
        assert!(!bound.sql.contains("NOT IN"));
    }
}
