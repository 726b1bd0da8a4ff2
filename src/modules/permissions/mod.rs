pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Permission, PermissionDraft, PermissionStats, PermissionStatus};
pub use repositories::{MySqlPermissionRepository, PermissionRepository};
pub use services::PermissionService;
