pub mod api;
pub mod cli;
pub mod diff;
pub mod formatters;
pub mod store;
pub mod types;
