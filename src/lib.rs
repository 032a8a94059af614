pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod server;
pub mod services;
pub mod state;
pub mod store;

#[cfg(test)]
pub mod testing;

pub use server::app;
pub use state::AppState;
