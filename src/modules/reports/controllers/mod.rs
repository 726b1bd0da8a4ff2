mod report_controller;

pub use report_controller::DATETIME_FORMAT;

pub fn configure(cfg: &mut actix_web::web::ServiceConfig) {
    report_controller::configure(cfg);
}
