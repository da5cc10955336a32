pub mod actions;
pub mod app;
pub mod error_modal;
pub mod input_panel;
pub mod message_overlay;
pub mod results;
pub mod settings;
pub mod theme;
pub mod top_bar;

pub use app::DashboardApp;
