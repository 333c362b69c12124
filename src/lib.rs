#[cfg(feature = "desktop")]
mod desktop;
pub mod keyboard;
pub mod memory;
pub mod menu;
pub mod mode;
pub mod models;
pub mod notes;
pub mod services;
pub mod settings;
pub mod shortcuts;
pub mod tray;
pub mod utils;
pub mod windows;

#[cfg(feature = "desktop")]
pub use desktop::run;
