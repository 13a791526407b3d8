//! Mandi Server - role-based marketplace backend
//!
//! # Overview
//!
//! REST API over an embedded SurrealDB document store. Buyers file product
//! requests, admins broadcast them to sellers, sellers answer with offers,
//! and admin acceptance materializes a catalog item the buyer can purchase.
//!
//! # Module structure
//!
//! ```text
//! mandi-server/src/
//! ├── core/          # Config, state, router, server
//! ├── auth/          # JWT + Argon2 authentication, role middleware
//! ├── api/           # HTTP routes and handlers
//! ├── workflow/      # Request/offer state machine
//! ├── db/            # Models and repositories
//! └── utils/         # Errors, logging, validation
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod utils;
pub mod workflow;

// Re-export public types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState, setup_environment};
pub use utils::{AppError, AppResponse, AppResult};
pub use workflow::WorkflowService;

// Security logging macro - structured auth events via tracing
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
   __  ___                ___
  /  |/  /___ _____  ____/ (_)
 / /|_/ / __ `/ __ \/ __  / /
/ /  / / /_/ / / / / /_/ / /
/_/  /_/\__,_/_/ /_/\__,_/_/
    "#
    );
}
