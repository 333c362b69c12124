use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of one live window. Never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum WindowRole {
    Search,
    Write,
    Settings,
    Intro,
}

impl WindowRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            WindowRole::Search => "search",
            WindowRole::Write => "write",
            WindowRole::Settings => "settings",
            WindowRole::Intro => "intro",
        }
    }

    pub fn from_name(value: &str) -> Option<Self> {
        match value {
            "search" => Some(WindowRole::Search),
            "write" => Some(WindowRole::Write),
            "settings" => Some(WindowRole::Settings),
            "intro" => Some(WindowRole::Intro),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Bounds {
    pub position: Position,
    pub size: Size,
}

impl Bounds {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            position: Position::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn right(&self) -> i32 {
        self.position.x.saturating_add(self.size.width as i32)
    }

    pub fn bottom(&self) -> i32 {
        self.position.y.saturating_add(self.size.height as i32)
    }
}

/// One-way notifications pushed from the orchestrator to a window's renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum RendererMessage {
    WindowFocused(bool),
    RetriggerSearch,
    SetSearchQuery(String),
    SendNoteForEdit(super::NoteEditInfo),
    ResetWriteWindow,
}

impl RendererMessage {
    /// Event name the renderer listens on.
    pub fn event_name(&self) -> &'static str {
        match self {
            RendererMessage::WindowFocused(_) => "window-focused",
            RendererMessage::RetriggerSearch => "retrigger-search",
            RendererMessage::SetSearchQuery(_) => "set-search-query",
            RendererMessage::SendNoteForEdit(_) => "send-note-for-edit",
            RendererMessage::ResetWriteWindow => "reset-write-window",
        }
    }
}
