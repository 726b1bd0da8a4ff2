mod permission_controller;

pub use permission_controller::{BatchDeleteRequest, BatchDeleteResponse};

pub fn configure(cfg: &mut actix_web::web::ServiceConfig) {
    permission_controller::configure(cfg);
}
