pub mod config;
pub mod fixtures;
pub mod predict;
pub mod standings;
pub mod state;
pub mod store;
pub mod team;
pub mod team_gen;
