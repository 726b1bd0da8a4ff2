pub mod permission;

pub use permission::{
    Page, Permission, PermissionDraft, PermissionModule, PermissionStats, PermissionStatus,
    ResourceTypeCount, SYSTEM_RESOURCE_TYPE,
};
