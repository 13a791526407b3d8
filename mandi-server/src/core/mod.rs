//! Core module - configuration, state, server

pub mod config;
pub mod router;
pub mod server;
pub mod state;

pub use config::Config;
pub use server::Server;
pub use state::ServerState;

/// Set up the process environment: dotenv and logging
pub fn setup_environment() {
    dotenv::dotenv().ok();
    crate::utils::logger::init_logger();
}
