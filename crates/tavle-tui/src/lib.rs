pub mod app;
pub mod components;
pub mod events;
pub mod export;
pub mod ui;

pub use app::{load_snapshot, App, AppMode, AppOptions};
