//! Modifier keys held across windows. Each window forwards its raw key
//! events; renderers ask for the combined state when a click needs to know
//! whether meta was down.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::Deserialize;

use crate::models::KeyboardModifiersState;

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum KeyEventKind {
    KeyDown,
    KeyUp,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KeyInput {
    #[serde(rename = "type")]
    pub kind: KeyEventKind,
    pub key: String,
}

#[derive(Debug, Default)]
pub struct KeyboardModifiers {
    meta: AtomicBool,
}

impl KeyboardModifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_input(&self, input: &KeyInput) {
        if input.key == "Meta" {
            let pressed = input.kind == KeyEventKind::KeyDown;
            self.meta.store(pressed, Ordering::SeqCst);
        }
    }

    pub fn state(&self) -> KeyboardModifiersState {
        KeyboardModifiersState {
            meta_key: self.meta.load(Ordering::SeqCst),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(kind: KeyEventKind, key: &str) -> KeyInput {
        KeyInput {
            kind,
            key: key.to_string(),
        }
    }

    #[test]
    fn meta_tracks_down_and_up() {
        let modifiers = KeyboardModifiers::new();
        modifiers.handle_input(&input(KeyEventKind::KeyDown, "Meta"));
        assert!(modifiers.state().meta_key);

        modifiers.handle_input(&input(KeyEventKind::KeyDown, "a"));
        assert!(modifiers.state().meta_key);

        modifiers.handle_input(&input(KeyEventKind::KeyUp, "Meta"));
        assert!(!modifiers.state().meta_key);
    }

    #[test]
    fn key_input_parses_renderer_payload() {
        let parsed: KeyInput = serde_json::from_str(r#"{"type":"keyDown","key":"Meta"}"#).unwrap();
        assert_eq!(parsed, input(KeyEventKind::KeyDown, "Meta"));
    }
}
