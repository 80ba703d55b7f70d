// src/store/store.rs — SQLite operations over the call record table

use std::path::Path;
use std::time::Duration;

use rusqlite::{params, params_from_iter, Connection, OpenFlags, Row};
use serde::Serialize;

use crate::infra::errors::{DashError, Result};
use crate::store::query::{self, BoundSql, ReportQuery};

// ── Raw rows ─────────────────────────────────────────────────────

/// Interval sums for one (interval, dnis, campaign) group.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawIntervalRow {
    pub interval_label: String,
    pub dnis: String,
    pub campaign: String,
    pub received: u64,
    pub answered: u64,
    pub abandoned: u64,
    pub answered_within_threshold: u64,
    /// Total queue + ring seconds over answered calls.
    pub answer_wait_secs: f64,
    /// Total talk + wrap-up seconds.
    pub handle_secs: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawCampaignRow {
    pub dnis: String,
    pub campaign: String,
    pub interactions: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawAgentRow {
    pub agent_id: String,
    pub dnis: String,
    pub campaign: String,
    pub interactions: u64,
}

/// One call, as inserted by the seeder and tests.
#[derive(Debug, Clone, Default)]
pub struct CallRecord {
    pub call_date: String,
    pub interval_label: String,
    pub direction: String,
    pub abandoned: bool,
    pub hours_flag: String,
    pub sub_category: Option<String>,
    pub source_campaign: Option<String>,
    pub dnis: String,
    pub queue_secs: Option<i64>,
    pub ring_secs: Option<i64>,
    pub talk_secs: Option<i64>,
    pub wrapup_secs: Option<i64>,
    pub ivr_secs: Option<i64>,
    pub last_agent: Option<String>,
}

/// Low-level SQLite operations for call records.
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Open an existing store read-only. A missing file is a connection failure.
    pub fn open_read_only(path: &Path, busy_timeout: Duration) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| DashError::Connection(format!("{}: {e}", path.display())))?;
        conn.busy_timeout(busy_timeout)?;
        Ok(Self { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    // -- Aggregates --

    pub fn query_interval_traffic(&self, q: &ReportQuery) -> Result<Vec<RawIntervalRow>> {
        self.query_rows(query::interval_traffic_sql(q), |row| {
            Ok(RawIntervalRow {
                interval_label: row.get("interval_label")?,
                dnis: row.get("dnis")?,
                campaign: row.get("campaign")?,
                received: count(row, "received")?,
                answered: count(row, "answered")?,
                abandoned: count(row, "abandoned")?,
                answered_within_threshold: count(row, "within_threshold")?,
                answer_wait_secs: row.get::<_, Option<f64>>("answer_wait_secs")?.unwrap_or(0.0),
                handle_secs: row.get::<_, Option<f64>>("handle_secs")?.unwrap_or(0.0),
            })
        })
    }

    pub fn query_campaign_summary(&self, q: &ReportQuery) -> Result<Vec<RawCampaignRow>> {
        self.query_rows(query::campaign_summary_sql(q), |row| {
            Ok(RawCampaignRow {
                dnis: row.get("dnis")?,
                campaign: row.get("campaign")?,
                interactions: count(row, "interactions")?,
            })
        })
    }

    pub fn query_agent_breakdown(&self, q: &ReportQuery) -> Result<Vec<RawAgentRow>> {
        self.query_rows(query::agent_breakdown_sql(q), |row| {
            Ok(RawAgentRow {
                agent_id: row.get("agent_id")?,
                dnis: row.get("dnis")?,
                campaign: row.get("campaign")?,
                interactions: count(row, "interactions")?,
            })
        })
    }

    fn query_rows<T>(
        &self,
        bound: BoundSql,
        map: impl FnMut(&Row<'_>) -> rusqlite::Result<T>,
    ) -> Result<Vec<T>> {
        let mut stmt = self.conn.prepare(&bound.sql)?;
        let rows = stmt.query_map(params_from_iter(bound.params.iter()), map)?;
        let collected = rows.collect::<rusqlite::Result<Vec<T>>>()?;
        Ok(collected)
    }

    // -- Call records --

    pub fn insert_call(&self, call: &CallRecord) -> anyhow::Result<()> {
        self.conn.execute(
            "INSERT INTO call_records (call_date, interval_label, direction, abandoned,
             hours_flag, sub_category, source_campaign, dnis, queue_secs, ring_secs,
             talk_secs, wrapup_secs, ivr_secs, last_agent)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            params![
                call.call_date,
                call.interval_label,
                call.direction,
                call.abandoned as i64,
                call.hours_flag,
                call.sub_category,
                call.source_campaign,
                call.dnis,
                call.queue_secs,
                call.ring_secs,
                call.talk_secs,
                call.wrapup_secs,
                call.ivr_secs,
                call.last_agent
            ],
        )?;
        Ok(())
    }

    pub fn count_calls(&self) -> anyhow::Result<i64> {
        let n = self
            .conn
            .query_row("SELECT COUNT(*) FROM call_records", [], |row| row.get(0))?;
        Ok(n)
    }
}

/// Non-negative count column. SUM over no rows yields NULL, read as 0.
fn count(row: &Row<'_>, column: &str) -> rusqlite::Result<u64> {
    let value: Option<i64> = row.get(column)?;
    Ok(value.unwrap_or(0).max(0) as u64)
}
