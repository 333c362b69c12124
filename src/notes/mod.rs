#[cfg(feature = "desktop")]
pub(crate) mod commands;
pub mod requests;

pub use requests::NoteRequests;
