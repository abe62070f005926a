pub mod client;
pub mod config;
pub mod ui;
pub mod view;
pub mod widget;

pub use client::ApiClient;
pub use config::Config;
pub use widget::{ChatWidget, Trigger};
