pub mod permission_repository;

pub use permission_repository::{MySqlPermissionRepository, PermissionRepository};
