#[cfg(feature = "desktop")]
pub(crate) mod commands;
pub mod controller;
pub mod state;

pub use controller::ModeController;
pub use state::{AppMode, ControllerState, OpenOptions};
