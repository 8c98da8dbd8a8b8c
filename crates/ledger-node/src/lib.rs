pub mod api;
pub mod config;
mod constants;

pub use api::{app, AppState};
pub use config::Args;
