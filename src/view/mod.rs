// src/view/mod.rs — Presentation binding.
//
// Maps a `DashboardSnapshot` onto renderer-agnostic view models: KPI tiles,
// the interval table, and three charts. Both the terminal dashboard and the
// HTTP API render from `bind`.

pub mod bands;
pub mod table;

use serde::Serialize;

use crate::model::{AgentRecord, CampaignRecord, DashboardSnapshot, IntervalRecord, Totals};

pub use bands::{abandonment_band, answered_band, service_level_band, Band};
pub use table::{Column, IntervalTable, SortOrder};

pub const INTERVAL_CHART_TITLE: &str = "Calls per interval";
pub const CAMPAIGN_CHART_TITLE: &str = "Interactions by campaign";
pub const AGENT_CHART_TITLE: &str = "Interactions by agent";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiTile {
    pub label: &'static str,
    pub value: String,
    pub band: Option<Band>,
}

/// Stacked answered/abandoned bars with % abandoned and % service level on a
/// secondary axis. Percent series are on the 0-100 scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntervalChart {
    pub labels: Vec<String>,
    pub answered: Vec<u64>,
    pub abandoned: Vec<u64>,
    pub pct_abandoned: Vec<f64>,
    pub pct_service_level: Vec<f64>,
}

/// Horizontal bars, ascending by count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignChart {
    pub bars: Vec<(String, u64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub value: u64,
    /// Fraction of the pie in [0, 1].
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentPie {
    pub slices: Vec<PieSlice>,
}

/// A chart, or the titled placeholder shown when its table is empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum Chart<T> {
    Ready(T),
    Empty { title: String },
}

impl<T> Chart<T> {
    fn placeholder(title: &str) -> Self {
        Chart::Empty {
            title: format!("{title} (no data)"),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Chart::Empty { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub tiles: Vec<KpiTile>,
    pub table: IntervalTable,
    pub interval_chart: Chart<IntervalChart>,
    pub campaign_chart: Chart<CampaignChart>,
    pub agent_chart: Chart<AgentPie>,
}

/// Bind a snapshot to its view model.
pub fn bind(snapshot: &DashboardSnapshot) -> DashboardView {
    DashboardView {
        tiles: kpi_tiles(&snapshot.totals),
        table: IntervalTable::new(&snapshot.intervals),
        interval_chart: interval_chart(&snapshot.intervals),
        campaign_chart: campaign_chart(&snapshot.campaigns),
        agent_chart: agent_pie(&snapshot.agents),
    }
}

/// The eight headline tiles, in display order.
pub fn kpi_tiles(t: &Totals) -> Vec<KpiTile> {
    let pct_abandoned = t.pct_abandoned * 100.0;
    let pct_answered = t.pct_answered * 100.0;
    let pct_sl = t.pct_service_level * 100.0;

    vec![
        tile("Received", format_count(t.received), None),
        tile("Answered", format_count(t.answered), None),
        tile(
            "Abandoned",
            format_count(t.abandoned),
            Some(abandonment_band(pct_abandoned)),
        ),
        tile(
            "% Abandoned",
            format_pct(pct_abandoned),
            Some(abandonment_band(pct_abandoned)),
        ),
        tile(
            "% Answered",
            format_pct(pct_answered),
            Some(answered_band(pct_answered)),
        ),
        tile(
            "% Service Level",
            format_pct(pct_sl),
            Some(service_level_band(pct_sl)),
        ),
        tile("ASA (s)", format!("{:.0}", t.avg_speed_of_answer), None),
        tile("AHT (s)", format!("{:.0}", t.avg_handle_time), None),
    ]
}

fn tile(label: &'static str, value: String, band: Option<Band>) -> KpiTile {
    KpiTile { label, value, band }
}

pub fn interval_chart(rows: &[IntervalRecord]) -> Chart<IntervalChart> {
    if rows.is_empty() {
        return Chart::placeholder(INTERVAL_CHART_TITLE);
    }
    Chart::Ready(IntervalChart {
        labels: rows.iter().map(|r| r.interval_label.clone()).collect(),
        answered: rows.iter().map(|r| r.answered).collect(),
        abandoned: rows.iter().map(|r| r.abandoned).collect(),
        pct_abandoned: rows.iter().map(|r| r.pct_abandoned * 100.0).collect(),
        pct_service_level: rows.iter().map(|r| r.pct_service_level * 100.0).collect(),
    })
}

pub fn campaign_chart(rows: &[CampaignRecord]) -> Chart<CampaignChart> {
    if rows.is_empty() {
        return Chart::placeholder(CAMPAIGN_CHART_TITLE);
    }
    let mut bars: Vec<(String, u64)> = rows
        .iter()
        .map(|r| (r.campaign_name.clone(), r.interaction_count))
        .collect();
    bars.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    Chart::Ready(CampaignChart { bars })
}

pub fn agent_pie(rows: &[AgentRecord]) -> Chart<AgentPie> {
    let total: u64 = rows.iter().map(|r| r.interaction_count).sum();
    if rows.is_empty() || total == 0 {
        return Chart::placeholder(AGENT_CHART_TITLE);
    }
    let slices = rows
        .iter()
        .map(|r| PieSlice {
            label: r.agent_name.clone(),
            value: r.interaction_count,
            share: r.interaction_count as f64 / total as f64,
        })
        .collect();
    Chart::Ready(AgentPie { slices })
}

/// `12345` -> `"12,345"`.
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn format_pct(pct: f64) -> String {
    format!("{pct:.2}%")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    fn totals(pct_sl: f64, pct_answered: f64, pct_abandoned: f64) -> Totals {
        Totals {
            received: 1000,
            answered: 900,
            abandoned: 100,
            answered_within_threshold: 700,
            pct_abandoned,
            pct_answered,
            pct_service_level: pct_sl,
            avg_speed_of_answer: 16.0,
            avg_handle_time: 240.0,
        }
    }

    fn band_of(tiles: &[KpiTile], label: &str) -> Option<Band> {
        tiles.iter().find(|t| t.label == label).and_then(|t| t.band)
    }

    #[test]
    fn test_eight_tiles_in_order() {
        let tiles = kpi_tiles(&Totals::default());
        let labels: Vec<&str> = tiles.iter().map(|t| t.label).collect();
        assert_eq!(
            labels,
            vec![
                "Received",
                "Answered",
                "Abandoned",
                "% Abandoned",
                "% Answered",
                "% Service Level",
                "ASA (s)",
                "AHT (s)",
            ]
        );
    }

    #[test]
    fn test_tile_bands_follow_totals() {
        let tiles = kpi_tiles(&totals(0.85, 0.95, 0.03));
        assert_eq!(band_of(&tiles, "% Service Level"), Some(Band::Favorable));
        assert_eq!(band_of(&tiles, "% Answered"), Some(Band::Favorable));
        assert_eq!(band_of(&tiles, "% Abandoned"), Some(Band::Favorable));
        assert_eq!(band_of(&tiles, "Received"), None);

        let tiles = kpi_tiles(&totals(0.75, 0.85, 0.08));
        assert_eq!(band_of(&tiles, "% Service Level"), Some(Band::Caution));
        assert_eq!(band_of(&tiles, "% Answered"), Some(Band::Caution));
        assert_eq!(band_of(&tiles, "Abandoned"), Some(Band::Caution));

        let tiles = kpi_tiles(&totals(0.50, 0.50, 0.50));
        assert_eq!(band_of(&tiles, "% Service Level"), Some(Band::Unfavorable));
        assert_eq!(band_of(&tiles, "% Abandoned"), Some(Band::Unfavorable));
    }

    #[test]
    fn test_tile_values_formatted() {
        let tiles = kpi_tiles(&totals(0.8, 0.9, 0.1));
        assert_eq!(tiles[0].value, "1,000");
        assert_eq!(tiles[3].value, "10.00%");
        assert_eq!(tiles[5].value, "80.00%");
        assert_eq!(tiles[6].value, "16");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn test_empty_snapshot_shows_placeholders() {
        let view = bind(&DashboardSnapshot::empty(0, Local::now()));
        assert!(view.table.is_empty());
        assert!(view.interval_chart.is_empty());
        assert!(view.campaign_chart.is_empty());
        assert_eq!(
            view.agent_chart,
            Chart::Empty {
                title: "Interactions by agent (no data)".into()
            }
        );
        assert!(view.tiles.iter().all(|t| t.value == "0" || t.value == "0.00%"));
    }

    #[test]
    fn test_campaign_bars_ascending() {
        let chart = campaign_chart(&[
            CampaignRecord {
                campaign_name: "B".into(),
                interaction_count: 9,
            },
            CampaignRecord {
                campaign_name: "A".into(),
                interaction_count: 2,
            },
        ]);
        let Chart::Ready(chart) = chart else {
            panic!("expected bars");
        };
        assert_eq!(chart.bars, vec![("A".into(), 2), ("B".into(), 9)]);
    }

    #[test]
    fn test_agent_pie_shares_sum_to_one() {
        let pie = agent_pie(&[
            AgentRecord {
                agent_name: "x".into(),
                interaction_count: 3,
            },
            AgentRecord {
                agent_name: "y".into(),
                interaction_count: 1,
            },
        ]);
        let Chart::Ready(pie) = pie else {
            panic!("expected slices");
        };
        let sum: f64 = pie.slices.iter().map(|s| s.share).sum();
        assert!((sum - 1.0).abs() < 1e-12);
        assert_eq!(pie.slices[0].share, 0.75);
    }

    #[test]
    fn test_interval_chart_percent_scale() {
        let chart = interval_chart(&[IntervalRecord {
            interval_label: "08:00-08:30".into(),
            answered: 3,
            abandoned: 1,
            pct_abandoned: 0.25,
            pct_service_level: 1.0,
            ..Default::default()
        }]);
        let Chart::Ready(chart) = chart else {
            panic!("expected chart");
        };
        assert_eq!(chart.pct_abandoned, vec![25.0]);
        assert_eq!(chart.pct_service_level, vec![100.0]);
    }
}
