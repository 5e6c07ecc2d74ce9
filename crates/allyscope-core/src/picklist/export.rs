// CSV export of a ranked pick list, serialized from the scored model.

use std::io::Write;

use chrono::NaiveDate;
use thiserror::Error;

use crate::picklist::score::ScoredTeam;

/// Column header of the exported pick list.
pub const EXPORT_HEADER: [&str; 10] = [
    "Pick Order",
    "Team Number",
    "Rank",
    "Pick Score",
    "Total OPR",
    "Auto OPR",
    "TeleOp OPR",
    "Wins",
    "Losses",
    "Consistency",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("export produced invalid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// One exported row, in header order.
fn export_row(team: &ScoredTeam) -> [String; 10] {
    let stat = &team.stat;
    [
        team.pick_order.to_string(),
        stat.team_number.to_string(),
        stat.rank.map_or_else(|| "-".to_string(), |r| r.to_string()),
        format!("{:.1}", team.pick_score),
        format!("{:.1}", stat.opr_total),
        format!("{:.1}", stat.opr_auto),
        format!("{:.1}", stat.opr_teleop),
        stat.wins.to_string(),
        stat.losses.to_string(),
        format!("{:.1}", stat.consistency),
    ]
}

/// Write the header and one row per team, in the order given.
pub fn write_pick_list<W: Write>(writer: W, teams: &[ScoredTeam]) -> Result<(), ExportError> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);
    wtr.write_record(EXPORT_HEADER)?;
    for team in teams {
        wtr.write_record(export_row(team))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Render the pick list as CSV text.
pub fn pick_list_csv(teams: &[ScoredTeam]) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_pick_list(&mut buf, teams)?;
    Ok(String::from_utf8(buf)?)
}

/// `pick_list_{EVENT}_{YYYY-MM-DD}.csv`
pub fn export_file_name(event_code: &str, date: NaiveDate) -> String {
    format!(
        "pick_list_{}_{}.csv",
        event_code.trim().to_uppercase(),
        date.format("%Y-%m-%d")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picklist::rank::{rank, RankParams};
    use crate::picklist::score::score_candidates;
    use crate::stats::tests::team;

    #[test]
    fn header_is_exact() {
        let csv = pick_list_csv(&[]).unwrap();
        assert_eq!(
            csv,
            "Pick Order,Team Number,Rank,Pick Score,Total OPR,Auto OPR,TeleOp OPR,Wins,Losses,Consistency\n"
        );
    }

    #[test]
    fn rows_follow_view_order_and_formatting() {
        let mut a = team(16091, 82.44, 24.0, 48.26);
        a.rank = Some(2);
        a.wins = 5;
        a.losses = 1;
        a.ties = 1;
        let b = team(7236, 40.0, 10.0, 25.0);

        let view = rank(&score_candidates(&[b, a], None), &RankParams::default());
        let csv = pick_list_csv(&view).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        // 0.5*82.44 + 0.2*85 + 0.1*(5/7*100) = 41.22 + 17 + 7.142857
        assert_eq!(lines[1], "1,16091,2,65.4,82.4,24.0,48.3,5,1,15.0");
        assert_eq!(lines[2], "2,7236,-,37.0,40.0,10.0,25.0,0,0,15.0");
    }

    #[test]
    fn file_name_uses_event_code_and_date() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 8).unwrap();
        assert_eq!(export_file_name("usnyexq", date), "pick_list_USNYEXQ_2025-03-08.csv");
    }
}
