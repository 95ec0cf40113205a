pub mod api;
pub mod menu;
pub mod metrics;
pub mod state;
