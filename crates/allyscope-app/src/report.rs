// Terminal rendering of pick lists, event summaries and simulation results.

use allyscope_core::event::{AllianceProjection, EventSummary};
use allyscope_core::picklist::rank::Tier;
use allyscope_core::picklist::score::ScoredTeam;
use allyscope_core::sim::histogram::HistogramBin;
use allyscope_core::stats::TeamStat;
use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

/// Width in characters of the longest histogram bar.
const HISTOGRAM_WIDTH: usize = 40;

fn tier_color(tier: Tier) -> Color {
    match tier {
        Tier::S => Color::Green,
        Tier::A => Color::Cyan,
        Tier::B => Color::Yellow,
        Tier::C => Color::DarkGrey,
    }
}

fn record(stat: &TeamStat) -> String {
    format!("{}-{}-{}", stat.wins, stat.losses, stat.ties)
}

fn rank_cell(stat: &TeamStat) -> String {
    stat.rank.map_or_else(|| "-".to_string(), |r| r.to_string())
}

fn opt_number(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.1}"))
}

fn right_align(table: &mut Table, columns: std::ops::Range<usize>) {
    for i in columns {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
}

/// The ranked pick list, one row per candidate with its tier.
pub fn pick_list_table(view: &[ScoredTeam]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("Team").add_attribute(Attribute::Bold),
        Cell::new("Tier"),
        Cell::new("Rank"),
        Cell::new("Pick Score").fg(Color::Cyan),
        Cell::new("Total OPR"),
        Cell::new("Auto OPR"),
        Cell::new("TeleOp OPR"),
        Cell::new("W-L-T"),
        Cell::new("Consistency"),
    ]);

    for team in view {
        let stat = &team.stat;
        let tier = team.tier;
        table.add_row(vec![
            Cell::new(team.pick_order).fg(tier_color(tier)),
            Cell::new(stat.team_number).add_attribute(Attribute::Bold),
            Cell::new(tier.label()).fg(tier_color(tier)),
            Cell::new(rank_cell(stat)),
            Cell::new(format!("{:.1}", team.pick_score))
                .fg(tier_color(tier))
                .add_attribute(Attribute::Bold),
            Cell::new(format!("{:.1}", stat.opr_total)),
            Cell::new(format!("{:.1}", stat.opr_auto)),
            Cell::new(format!("{:.1}", stat.opr_teleop)),
            Cell::new(record(stat)),
            Cell::new(format!("{:.1}", stat.consistency)),
        ]);
    }

    right_align(&mut table, 3..10);
    table
}

/// Field summary followed by the top-ranked teams.
pub fn summary_report(event_code: &str, summary: &EventSummary, top: &[&TeamStat]) -> String {
    let mut headline = Table::new();
    headline.load_preset(ASCII_FULL);
    headline.set_header(vec!["Event", "Teams", "Average OPR", "Top OPR"]);
    headline.add_row(vec![
        event_code.to_string(),
        summary.team_count.to_string(),
        opt_number(summary.average_opr),
        opt_number(summary.top_opr),
    ]);

    let mut rankings = Table::new();
    rankings.load_preset(ASCII_FULL);
    rankings.set_header(vec!["Rank", "Team", "Total OPR", "W-L-T", "RP"]);
    for stat in top {
        rankings.add_row(vec![
            rank_cell(stat),
            stat.team_number.to_string(),
            format!("{:.1}", stat.opr_total),
            record(stat),
            format!("{:.1}", stat.ranking_points),
        ]);
    }
    right_align(&mut rankings, 2..5);

    format!("{headline}\n\n{rankings}")
}

/// Text bars for a histogram, scaled so the fullest bin spans the full width.
pub fn histogram_lines(bins: &[HistogramBin]) -> Vec<String> {
    let peak = bins.iter().map(|b| b.count).max().unwrap_or(0);
    let label_width = bins.iter().map(|b| b.label.len()).max().unwrap_or(0);
    bins.iter()
        .map(|bin| {
            let bar = if peak == 0 {
                0
            } else {
                (bin.count * HISTOGRAM_WIDTH).div_ceil(peak)
            };
            format!(
                "{:>width$} | {} {}",
                bin.label,
                "#".repeat(bar),
                bin.count,
                width = label_width
            )
        })
        .collect()
}

/// Summary numbers of an alliance simulation plus its histogram.
pub fn simulation_report(projection: &AllianceProjection, bins: &[HistogramBin]) -> String {
    let sim = &projection.simulation;
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.set_header(vec![
        "Alliance",
        "Trials",
        "Expected Score",
        "Spread",
        "Min",
        "Max",
        "Alliance OPR",
        "Projection",
    ]);
    table.add_row(vec![
        format!("{} + {}", projection.team1, projection.team2),
        sim.trials().to_string(),
        format!("{:.1}", sim.mean),
        format!("±{:.1}", sim.std_dev),
        format!("{:.1}", sim.min),
        format!("{:.1}", sim.max),
        format!("{:.1}", projection.alliance_opr),
        projection.standing_label(),
    ]);

    let mut out = format!("{table}\n\nScore distribution:\n");
    for line in histogram_lines(bins) {
        out.push_str(&line);
        out.push('\n');
    }
    out
}
