pub mod note;
pub mod window;

pub use note::{KeyboardModifiersState, MatchIndex, NoteEditInfo, QueryResultItem, SearcherDoc};
pub use window::{Bounds, Position, RendererMessage, Size, WindowId, WindowRole};
