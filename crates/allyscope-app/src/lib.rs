// Library root: re-exports the app modules so integration tests can reach
// config loading, team-stat import and report rendering.

pub mod config;
pub mod loader;
pub mod report;
