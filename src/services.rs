pub mod dashboard_service;
pub use dashboard_service::DashboardService;
pub mod normalizer;
pub mod sources;
pub mod weekly_window;
