pub mod monitor_app;
pub mod views;

pub use monitor_app::MonitorApp;
