pub mod config;
pub mod controllers;
pub mod dumpers;
pub mod error;
pub mod resources;
pub mod routes;
pub mod state;
pub mod storage;
pub mod utils;

pub use routes::create_app;
pub use state::{create_app_state, AppState};
