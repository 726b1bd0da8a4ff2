mod health_controller;

pub use health_controller::{LivenessResponse, ReadinessResponse, REQUIRED_TABLES};

pub fn configure(cfg: &mut actix_web::web::ServiceConfig) {
    health_controller::configure(cfg);
}
