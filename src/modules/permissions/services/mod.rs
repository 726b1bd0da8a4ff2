pub mod permission_service;

pub use permission_service::{PermissionService, FALLBACK_MODULES, MAX_PAGE_SIZE};
