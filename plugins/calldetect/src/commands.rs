use std::collections::BTreeMap;

use tauri::{command, State};

use crate::SharedState;

#[command]
pub async fn start_listener(state: State<'_, SharedState>) -> Result<(), String> {
    let mut state_guard = state.lock().await;
    state_guard
        .detector
        .start_listener()
        .map_err(|e| e.to_string())
}

#[command]
pub async fn stop_listener(state: State<'_, SharedState>) -> Result<(), String> {
    let mut state_guard = state.lock().await;
    state_guard
        .detector
        .stop_listener()
        .map_err(|e| e.to_string())
}

#[command]
pub async fn get_constants() -> BTreeMap<&'static str, &'static str> {
    calldetect_events::event_constants()
}

/// Entry point for the native telephony shim: one OS call state notification.
#[command]
pub async fn report_call_state(
    state: State<'_, SharedState>,
    code: i32,
    phone_number: Option<String>,
) -> Result<(), String> {
    let source = state.lock().await.source.clone();
    source.notify(code, phone_number.as_deref());
    Ok(())
}

/// Entry point for the native permission prompt: whether the user granted
/// phone state access. Report before `start_listener`.
#[command]
pub async fn report_permission(state: State<'_, SharedState>, granted: bool) -> Result<(), String> {
    state.lock().await.permissions.set_granted(granted);
    Ok(())
}
