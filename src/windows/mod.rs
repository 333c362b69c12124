pub mod focus;
pub mod host;
pub mod layout;
pub mod registry;

pub use focus::FocusHistory;
pub use host::{WindowHost, WindowSpec};
pub use registry::{WindowEntry, WindowRegistry};
