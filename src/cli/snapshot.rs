// src/cli/snapshot.rs — One refresh cycle, printed

use crate::infra::config::Config;
use crate::refresh::RefreshOutcome;
use crate::view::{self, Band, Chart, DashboardView};

pub async fn run_snapshot(config: &Config, json: bool) -> anyhow::Result<()> {
    let refresher = super::build_refresher(config);
    if let RefreshOutcome::Skipped = refresher.try_refresh().await {
        anyhow::bail!("refresh did not run");
    }
    let snapshot = refresher.current();

    if json {
        println!("{}", serde_json::to_string_pretty(snapshot.as_ref())?);
        return Ok(());
    }

    println!(
        "Call traffic {} to {} (generated {})",
        config.report.date_from,
        config.report.date_to,
        snapshot.generated_at.format("%Y-%m-%d %H:%M:%S")
    );
    print!("{}", render_text(&view::bind(&snapshot)));
    Ok(())
}

fn band_marker(band: Option<Band>) -> &'static str {
    match band {
        Some(Band::Favorable) => " [ok]",
        Some(Band::Caution) => " [caution]",
        Some(Band::Unfavorable) => " [alert]",
        None => "",
    }
}

/// Plain-text rendering of a bound view.
pub fn render_text(view: &DashboardView) -> String {
    let mut out = String::new();

    out.push('\n');
    for tile in &view.tiles {
        out.push_str(&format!(
            "  {:<16} {:>10}{}\n",
            tile.label,
            tile.value,
            band_marker(tile.band)
        ));
    }

    out.push_str("\nIntervals\n");
    if view.table.is_empty() {
        out.push_str("  (no data)\n");
    } else {
        out.push_str(&format!("  {}\n", view.table.columns.join(" | ")));
        for row in &view.table.rows {
            out.push_str(&format!("  {}\n", row.cells.join(" | ")));
        }
    }

    out.push('\n');
    match &view.campaign_chart {
        Chart::Ready(chart) => {
            out.push_str(&format!("{}\n", view::CAMPAIGN_CHART_TITLE));
            for (name, count) in chart.bars.iter().rev() {
                out.push_str(&format!("  {:<24} {:>8}\n", name, view::format_count(*count)));
            }
        }
        Chart::Empty { title } => out.push_str(&format!("{title}\n")),
    }

    out.push('\n');
    match &view.agent_chart {
        Chart::Ready(pie) => {
            out.push_str(&format!("{}\n", view::AGENT_CHART_TITLE));
            for slice in &pie.slices {
                out.push_str(&format!(
                    "  {:<24} {:>8} {:>6.1}%\n",
                    slice.label,
                    view::format_count(slice.value),
                    slice.share * 100.0
                ));
            }
        }
        Chart::Empty { title } => out.push_str(&format!("{title}\n")),
    }

    out
}
