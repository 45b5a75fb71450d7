//! Ratatui TUI：查询输入 + 掩码凭证输入 + 提交控件

pub mod app;
pub mod event;
pub mod render;

pub use app::run_app;
