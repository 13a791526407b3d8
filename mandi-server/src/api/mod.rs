//! API route modules
//!
//! One module per resource, each pairing a `router()` with its handlers:
//!
//! - [`auth`] - register, login, current user
//! - [`health`] - liveness probe
//! - [`products`] - catalog CRUD and owner product stats
//! - [`requests`] - buyer demand records and admin broadcast
//! - [`offers`] - seller offers and admin acceptance
//! - [`purchase`] - orders and invoices
//! - [`stats`] - owner dashboard aggregates

pub mod auth;
pub mod health;
pub mod offers;
pub mod products;
pub mod purchase;
pub mod requests;
pub mod stats;
