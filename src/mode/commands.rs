use tauri::State;

use crate::{
    desktop::AppState,
    keyboard::KeyInput,
    mode::{AppMode, OpenOptions},
};

#[tauri::command]
pub async fn get_app_mode(state: State<'_, AppState>) -> Result<AppMode, String> {
    Ok(state.controller().mode().await)
}

/// Returns `false` when another transition was already running.
#[tauri::command]
pub async fn switch_mode(
    state: State<'_, AppState>,
    mode: AppMode,
    options: Option<OpenOptions>,
) -> Result<bool, String> {
    state
        .controller()
        .switch_to(mode, options.unwrap_or_default())
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn forward_key_input(state: State<'_, AppState>, input: KeyInput) {
    state.controller().on_key_input(&input);
}
