use crate::manager::ShellSnapshot;
use crate::panels::Panel;
use crate::signals::{ShellMessage, Signal, SignalChannel};
use tauri::State;

// "Start Meeting" in the dashboard
#[tauri::command]
pub fn show_overlay(channel: State<'_, SignalChannel>) -> Result<(), String> {
    channel.signal(Signal::ShowOverlay);
    Ok(())
}

// close button on the overlay
#[tauri::command]
pub fn hide_overlay(channel: State<'_, SignalChannel>) -> Result<(), String> {
    channel.signal(Signal::HideOverlay);
    Ok(())
}

#[tauri::command]
pub fn toggle_panel(panel: Panel, channel: State<'_, SignalChannel>) -> Result<(), String> {
    channel.send(ShellMessage::TogglePanel(panel));
    Ok(())
}

#[tauri::command]
pub fn close_panels(channel: State<'_, SignalChannel>) -> Result<(), String> {
    channel.send(ShellMessage::ClosePanels);
    Ok(())
}

// MiniTab drag - frontend sends absolute screen coordinates
#[tauri::command]
pub fn move_overlay(x: i32, y: i32, channel: State<'_, SignalChannel>) -> Result<(), String> {
    channel.send(ShellMessage::MoveOverlay { x, y });
    Ok(())
}

#[tauri::command]
pub async fn overlay_snapshot(channel: State<'_, SignalChannel>) -> Result<ShellSnapshot, String> {
    channel.snapshot().await.map_err(|e| e.to_string())
}

#[tauri::command]
pub fn debug_log(message: String) {
    tracing::info!(target: "frontend", "{}", message);
}
