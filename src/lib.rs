//! Campus administration backend
//!
//! Permission administration (RBAC CRUD over permissions, roles and users)
//! and read-only financial reporting over fee payments.

pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

use actix_web::web;

pub use modules::permissions;
pub use modules::reports;

/// Mount every HTTP module
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    modules::health::controllers::configure(cfg);
    modules::permissions::controllers::configure(cfg);
    modules::reports::controllers::configure(cfg);
}
