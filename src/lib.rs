pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod pdf;
pub mod router;
pub mod services;
pub mod state;
pub mod views;

pub use router::app;
pub use state::AppState;
