// Alliance prediction and pick-list core: simulation, scoring and ranking
// over a snapshot of per-team statistics. No I/O beyond CSV export writers.

pub mod event;
pub mod picklist;
pub mod session;
pub mod sim;
pub mod stats;
