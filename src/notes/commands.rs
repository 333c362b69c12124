use tauri::{State, WebviewWindow};

use crate::{
    desktop::{parse_window_label, AppState},
    models::{KeyboardModifiersState, NoteEditInfo, QueryResultItem, WindowId, WindowRole},
};

fn sender_id(window: &WebviewWindow) -> Result<WindowId, String> {
    parse_window_label(window.label())
        .map(|(_, id)| id)
        .ok_or_else(|| format!("Unknown window {}", window.label()))
}

#[tauri::command]
pub async fn create_note(
    window: WebviewWindow,
    state: State<'_, AppState>,
    content: String,
) -> Result<NoteEditInfo, String> {
    let sender = sender_id(&window)?;
    state
        .requests
        .create_note(sender, content)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn edit_note(
    window: WebviewWindow,
    state: State<'_, AppState>,
    info: NoteEditInfo,
) -> Result<Option<NoteEditInfo>, String> {
    let sender = sender_id(&window)?;
    state
        .requests
        .edit_note(sender, info)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn delete_note(
    window: WebviewWindow,
    state: State<'_, AppState>,
    info: NoteEditInfo,
) -> Result<(), String> {
    let sender = sender_id(&window)?;
    state
        .requests
        .delete_note(sender, info)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn query_notes(
    state: State<'_, AppState>,
    query: String,
) -> Result<Vec<QueryResultItem>, String> {
    Ok(state.requests.query_notes(query).await)
}

#[tauri::command]
pub async fn get_recent_notes(state: State<'_, AppState>) -> Result<Vec<QueryResultItem>, String> {
    Ok(state.requests.get_recent_notes().await)
}

#[tauri::command]
pub async fn send_note_for_edit(
    state: State<'_, AppState>,
    info: NoteEditInfo,
) -> Result<(), String> {
    state
        .requests
        .send_note_for_edit(info)
        .await
        .map(|_| ())
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn open_write_window_for_note(
    state: State<'_, AppState>,
    info: NoteEditInfo,
) -> Result<(), String> {
    state
        .requests
        .open_write_window_for_note(info)
        .await
        .map(|_| ())
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn confirm_and_delete_note(
    state: State<'_, AppState>,
    info: NoteEditInfo,
) -> Result<bool, String> {
    state
        .requests
        .confirm_and_delete_note(info)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn get_keyboard_modifiers_state(state: State<'_, AppState>) -> KeyboardModifiersState {
    state.requests.get_keyboard_modifiers_state()
}

#[tauri::command]
pub fn get_notes_folder_path(state: State<'_, AppState>) -> Option<String> {
    state.requests.get_notes_folder_path()
}

#[tauri::command]
pub async fn initial_set_notes_folder_path(
    state: State<'_, AppState>,
    path: String,
) -> Result<bool, String> {
    state
        .requests
        .initial_set_notes_folder_path(path)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn set_notes_folder_path(state: State<'_, AppState>, path: String) -> Result<(), String> {
    state
        .requests
        .set_notes_folder_path(path)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn pick_notes_folder(
    state: State<'_, AppState>,
    parent: Option<WindowRole>,
) -> Result<Option<String>, String> {
    Ok(state.requests.pick_notes_folder(parent).await)
}

#[tauri::command]
pub fn open_notes_folder(state: State<'_, AppState>) -> Result<(), String> {
    state.requests.open_notes_folder().map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn close_intro(state: State<'_, AppState>) -> Result<(), String> {
    state.requests.close_intro().await;
    Ok(())
}

#[tauri::command]
pub async fn close_current_window(state: State<'_, AppState>) -> Result<(), String> {
    state.requests.close_current_window().await;
    Ok(())
}

#[tauri::command]
pub async fn focus_search_window(state: State<'_, AppState>) -> Result<(), String> {
    state.requests.focus_search_window().await;
    Ok(())
}

#[tauri::command]
pub async fn retrigger_search(state: State<'_, AppState>) -> Result<(), String> {
    state.requests.retrigger_search().await;
    Ok(())
}

#[tauri::command]
pub async fn open_settings(state: State<'_, AppState>) -> Result<bool, String> {
    state.requests.open_settings().await.map_err(|e| e.to_string())
}
