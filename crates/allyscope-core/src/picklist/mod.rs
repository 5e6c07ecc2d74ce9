// Pick list: composite scoring, ranking/filtering and CSV export.

pub mod export;
pub mod rank;
pub mod score;
