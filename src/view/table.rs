// src/view/table.rs — Sortable interval table.

use std::cmp::Ordering;

use serde::Serialize;

use crate::model::IntervalRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Interval,
    Received,
    Answered,
    Abandoned,
    WithinThreshold,
    Asa,
    Aht,
    PctAbandoned,
    PctServiceLevel,
}

impl Column {
    pub const ALL: [Column; 9] = [
        Column::Interval,
        Column::Received,
        Column::Answered,
        Column::Abandoned,
        Column::WithinThreshold,
        Column::Asa,
        Column::Aht,
        Column::PctAbandoned,
        Column::PctServiceLevel,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Column::Interval => "Interval",
            Column::Received => "Received",
            Column::Answered => "Answered",
            Column::Abandoned => "Abandoned",
            Column::WithinThreshold => "In SL",
            Column::Asa => "ASA",
            Column::Aht => "AHT",
            Column::PctAbandoned => "% Aband.",
            Column::PctServiceLevel => "% SL",
        }
    }

    pub fn next(&self) -> Column {
        let i = Column::ALL.iter().position(|c| c == self).unwrap_or(0);
        Column::ALL[(i + 1) % Column::ALL.len()]
    }

    fn compare(&self, a: &IntervalRecord, b: &IntervalRecord) -> Ordering {
        match self {
            Column::Interval => a.interval_label.cmp(&b.interval_label),
            Column::Received => a.received.cmp(&b.received),
            Column::Answered => a.answered.cmp(&b.answered),
            Column::Abandoned => a.abandoned.cmp(&b.abandoned),
            Column::WithinThreshold => a.answered_within_threshold.cmp(&b.answered_within_threshold),
            Column::Asa => a.avg_speed_of_answer.total_cmp(&b.avg_speed_of_answer),
            Column::Aht => a.avg_handle_time.total_cmp(&b.avg_handle_time),
            Column::PctAbandoned => a.pct_abandoned.total_cmp(&b.pct_abandoned),
            Column::PctServiceLevel => a.pct_service_level.total_cmp(&b.pct_service_level),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn toggle(&self) -> SortOrder {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

/// Display cells in column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub cells: Vec<String>,
    pub source: IntervalRecord,
}

#[derive(Debug, Clone, Serialize)]
pub struct IntervalTable {
    pub columns: Vec<&'static str>,
    pub rows: Vec<TableRow>,
    pub sort: (Column, SortOrder),
}

impl IntervalTable {
    pub fn new(records: &[IntervalRecord]) -> Self {
        Self {
            columns: Column::ALL.iter().map(|c| c.label()).collect(),
            rows: records.iter().map(to_row).collect(),
            sort: (Column::Interval, SortOrder::Ascending),
        }
    }

    /// Stable sort; ties keep interval order.
    pub fn sort_by(&mut self, column: Column, order: SortOrder) {
        self.rows.sort_by(|a, b| {
            let ord = column.compare(&a.source, &b.source);
            match order {
                SortOrder::Ascending => ord,
                SortOrder::Descending => ord.reverse(),
            }
        });
        self.sort = (column, order);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn to_row(r: &IntervalRecord) -> TableRow {
    TableRow {
        cells: vec![
            r.interval_label.clone(),
            r.received.to_string(),
            r.answered.to_string(),
            r.abandoned.to_string(),
            r.answered_within_threshold.to_string(),
            format!("{:.0}", r.avg_speed_of_answer),
            format!("{:.0}", r.avg_handle_time),
            format!("{:.1}%", r.pct_abandoned * 100.0),
            format!("{:.1}%", r.pct_service_level * 100.0),
        ],
        source: r.clone(),
    }
}
