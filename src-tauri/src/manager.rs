//! Window lifecycle owner for the main and overlay windows.
//!
//! All state lives on one `WindowManager` value; the dispatcher owns it and
//! feeds it messages one at a time, so no locking is needed here.

use crate::error::ShellError;
use crate::panels::{Panel, PanelSet, PANELS_EVENT};
use crate::windows::{WindowBackend, WindowRole, WindowSpec};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowState {
    /// Not created yet.
    Absent,
    Hidden,
    Visible,
    /// Terminal; no handle to address anymore.
    Destroyed,
}

impl WindowState {
    pub fn is_live(self) -> bool {
        matches!(self, Self::Hidden | Self::Visible)
    }
}

/// Result of applying a request to a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Changed,
    /// Already in the requested state.
    Unchanged,
    /// Target window absent or destroyed.
    Ignored,
    /// Backend refused the change; state left as it was.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShellSnapshot {
    pub main: WindowState,
    pub overlay: WindowState,
    pub panels: PanelSet,
}

pub struct WindowManager<B: WindowBackend> {
    backend: B,
    main: WindowState,
    overlay: WindowState,
    panels: PanelSet,
}

impl<B: WindowBackend> WindowManager<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            main: WindowState::Absent,
            overlay: WindowState::Absent,
            panels: PanelSet::default(),
        }
    }

    pub fn main_state(&self) -> WindowState {
        self.main
    }

    pub fn overlay_state(&self) -> WindowState {
        self.overlay
    }

    pub fn snapshot(&self) -> ShellSnapshot {
        ShellSnapshot {
            main: self.main,
            overlay: self.overlay,
            panels: self.panels,
        }
    }

    /// Create the main window, then the overlay (hidden). Runs once.
    pub fn startup(&mut self) -> Result<(), ShellError> {
        if self.main != WindowState::Absent || self.overlay != WindowState::Absent {
            return Err(ShellError::AlreadyStarted);
        }

        let main = WindowSpec::main();
        self.backend.create(&main)?;
        self.main = initial_state(&main);
        tracing::info!(label = main.label(), "main window created");

        let overlay = WindowSpec::overlay();
        self.backend.create(&overlay)?;
        self.overlay = initial_state(&overlay);
        tracing::info!(label = overlay.label(), state = ?self.overlay, "overlay window created");

        Ok(())
    }

    pub fn on_show_overlay(&mut self) -> Transition {
        self.set_overlay_visible(true)
    }

    pub fn on_hide_overlay(&mut self) -> Transition {
        self.set_overlay_visible(false)
    }

    fn set_overlay_visible(&mut self, visible: bool) -> Transition {
        let target = if visible {
            WindowState::Visible
        } else {
            WindowState::Hidden
        };

        if !self.overlay.is_live() {
            tracing::debug!(state = ?self.overlay, visible, "overlay not addressable, ignoring");
            return Transition::Ignored;
        }
        if self.overlay == target {
            return Transition::Unchanged;
        }

        match self.backend.set_visible(WindowRole::Overlay, visible) {
            Ok(()) => {
                self.overlay = target;
                tracing::info!(state = ?target, "overlay visibility changed");
                Transition::Changed
            }
            Err(e) if e.is_stale_handle() => {
                self.mark_overlay_destroyed();
                Transition::Ignored
            }
            Err(e) => {
                tracing::warn!(error = %e, visible, "failed to change overlay visibility");
                Transition::Failed
            }
        }
    }

    /// Main window closed: cascade-close the overlay so it cannot be orphaned.
    pub fn on_main_closed(&mut self) {
        self.main = WindowState::Destroyed;

        if self.overlay.is_live() {
            match self.backend.close(WindowRole::Overlay) {
                Ok(()) => tracing::info!("overlay closed with main window"),
                Err(e) if e.is_stale_handle() => {
                    tracing::debug!("overlay already gone when main closed");
                }
                Err(e) => tracing::warn!(error = %e, "failed to close overlay"),
            }
        }
        self.mark_overlay_destroyed();
    }

    /// A window was destroyed by the window system (user or OS close).
    pub fn on_window_destroyed(&mut self, role: WindowRole) {
        match role {
            WindowRole::Main => self.on_main_closed(),
            WindowRole::Overlay => self.mark_overlay_destroyed(),
        }
    }

    /// Bookkeeping only; whether the process exits is decided by
    /// `config::on_exit_requested` in the run loop.
    pub fn on_all_windows_closed(&mut self) {
        self.main = WindowState::Destroyed;
        self.mark_overlay_destroyed();
        tracing::info!("all windows closed");
    }

    /// Close everything still open. Safe to call more than once.
    pub fn shutdown(&mut self) {
        for role in [WindowRole::Overlay, WindowRole::Main] {
            if !self.state(role).is_live() {
                continue;
            }
            if let Err(e) = self.backend.close(role) {
                if !e.is_stale_handle() {
                    tracing::warn!(label = role.label(), error = %e, "failed to close window on shutdown");
                }
            }
        }
        self.main = WindowState::Destroyed;
        self.mark_overlay_destroyed();
    }

    /// Flip a MiniTab panel. `None` when the overlay is gone.
    pub fn toggle_panel(&mut self, panel: Panel) -> Option<bool> {
        if !self.overlay.is_live() {
            return None;
        }
        let open = self.panels.toggle(panel);
        tracing::debug!(?panel, open, "panel toggled");
        self.publish_panels();
        Some(open)
    }

    pub fn close_panels(&mut self) -> Transition {
        if !self.overlay.is_live() {
            return Transition::Ignored;
        }
        if !self.panels.close_all() {
            return Transition::Unchanged;
        }
        self.publish_panels();
        Transition::Changed
    }

    /// MiniTab drag: reposition the overlay window.
    pub fn move_overlay(&mut self, x: i32, y: i32) -> Transition {
        if !self.overlay.is_live() {
            return Transition::Ignored;
        }
        match self.backend.set_position(WindowRole::Overlay, x, y) {
            Ok(()) => Transition::Changed,
            Err(e) if e.is_stale_handle() => {
                self.mark_overlay_destroyed();
                Transition::Ignored
            }
            Err(e) => {
                tracing::warn!(error = %e, x, y, "failed to move overlay");
                Transition::Failed
            }
        }
    }

    fn state(&self, role: WindowRole) -> WindowState {
        match role {
            WindowRole::Main => self.main,
            WindowRole::Overlay => self.overlay,
        }
    }

    fn publish_panels(&mut self) {
        let payload = match serde_json::to_value(self.panels) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize panel state");
                return;
            }
        };
        tracing::debug!(open = ?self.panels.open_panels().collect::<Vec<_>>(), "publishing panel state");
        if let Err(e) = self.backend.publish(WindowRole::Overlay, PANELS_EVENT, payload) {
            if e.is_stale_handle() {
                self.mark_overlay_destroyed();
            } else {
                tracing::warn!(error = %e, "failed to publish panel state");
            }
        }
    }

    fn mark_overlay_destroyed(&mut self) {
        if self.overlay != WindowState::Destroyed {
            tracing::debug!(previous = ?self.overlay, "overlay destroyed");
        }
        self.overlay = WindowState::Destroyed;
        self.panels = PanelSet::default();
    }
}

fn initial_state(spec: &WindowSpec) -> WindowState {
    if spec.visible {
        WindowState::Visible
    } else {
        WindowState::Hidden
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::windows::testing::{BackendCall, MockBackend};

    fn started() -> (WindowManager<MockBackend>, MockBackend) {
        let backend = MockBackend::new();
        let mut manager = WindowManager::new(backend.clone());
        manager.startup().unwrap();
        (manager, backend)
    }

    #[test]
    fn test_startup_creates_main_then_hidden_overlay() {
        let (manager, backend) = started();

        assert_eq!(
            backend.calls(),
            vec![
                BackendCall::Create(WindowRole::Main),
                BackendCall::Create(WindowRole::Overlay),
            ]
        );
        assert_eq!(manager.main_state(), WindowState::Visible);
        assert_eq!(manager.overlay_state(), WindowState::Hidden);
        assert!(!backend.is_visible(WindowRole::Overlay));
        assert_eq!(backend.spec(WindowRole::Overlay), Some(WindowSpec::overlay()));
    }

    #[test]
    fn test_second_startup_rejected() {
        let (mut manager, backend) = started();
        assert!(matches!(manager.startup(), Err(ShellError::AlreadyStarted)));
        assert_eq!(backend.calls().len(), 2);
    }

    #[test]
    fn test_startup_failure_is_returned() {
        let backend = MockBackend::new();
        backend.occupy(WindowRole::Overlay);
        let mut manager = WindowManager::new(backend.clone());

        assert!(matches!(manager.startup(), Err(ShellError::WindowExists("overlay"))));
        assert_eq!(manager.main_state(), WindowState::Visible);
        assert_eq!(manager.overlay_state(), WindowState::Absent);
        assert_eq!(manager.on_show_overlay(), Transition::Ignored);
    }

    #[test]
    fn test_meeting_scenario() {
        let (mut manager, backend) = started();

        assert_eq!(manager.on_show_overlay(), Transition::Changed);
        assert_eq!(manager.overlay_state(), WindowState::Visible);
        assert_eq!(manager.on_show_overlay(), Transition::Unchanged);
        assert_eq!(manager.overlay_state(), WindowState::Visible);
        assert!(backend.is_visible(WindowRole::Overlay));

        assert_eq!(manager.on_hide_overlay(), Transition::Changed);
        assert_eq!(manager.on_hide_overlay(), Transition::Unchanged);
        assert_eq!(manager.overlay_state(), WindowState::Hidden);

        manager.on_main_closed();
        assert_eq!(manager.overlay_state(), WindowState::Destroyed);
        assert!(!backend.exists(WindowRole::Overlay));
        assert!(backend.calls().contains(&BackendCall::Close(WindowRole::Overlay)));

        let calls_before = backend.calls().len();
        assert_eq!(manager.on_show_overlay(), Transition::Ignored);
        assert_eq!(manager.on_hide_overlay(), Transition::Ignored);
        assert_eq!(backend.calls().len(), calls_before);
    }

    #[test]
    fn test_final_visibility_follows_last_signal() {
        let sequences: [&[bool]; 5] = [
            &[],
            &[true],
            &[true, false, true],
            &[false, false],
            &[true, true, false, true, false],
        ];
        for seq in sequences {
            let (mut manager, backend) = started();
            for &show in seq {
                if show {
                    manager.on_show_overlay();
                } else {
                    manager.on_hide_overlay();
                }
            }
            let expect_visible = seq.last().copied().unwrap_or(false);
            assert_eq!(manager.overlay_state() == WindowState::Visible, expect_visible, "{seq:?}");
            assert_eq!(backend.is_visible(WindowRole::Overlay), expect_visible, "{seq:?}");
        }
    }

    #[test]
    fn test_cascade_tolerates_externally_destroyed_overlay() {
        let (mut manager, backend) = started();
        manager.on_show_overlay();
        backend.destroy_externally(WindowRole::Overlay);

        manager.on_main_closed();
        assert_eq!(manager.main_state(), WindowState::Destroyed);
        assert_eq!(manager.overlay_state(), WindowState::Destroyed);
    }

    #[test]
    fn test_stale_overlay_becomes_ignored() {
        let (mut manager, backend) = started();
        backend.destroy_externally(WindowRole::Overlay);

        assert_eq!(manager.on_show_overlay(), Transition::Ignored);
        assert_eq!(manager.overlay_state(), WindowState::Destroyed);
        assert_eq!(manager.move_overlay(10, 10), Transition::Ignored);
    }

    #[test]
    fn test_overlay_destroyed_event_skips_cascade_close() {
        let (mut manager, backend) = started();
        backend.destroy_externally(WindowRole::Overlay);
        manager.on_window_destroyed(WindowRole::Overlay);
        assert_eq!(manager.main_state(), WindowState::Visible);

        manager.on_window_destroyed(WindowRole::Main);
        assert!(!backend.calls().contains(&BackendCall::Close(WindowRole::Overlay)));
        assert_eq!(manager.main_state(), WindowState::Destroyed);
    }

    #[test]
    fn test_all_windows_closed_marks_everything_destroyed() {
        let (mut manager, _) = started();
        manager.toggle_panel(Panel::Notes);
        manager.on_all_windows_closed();

        assert_eq!(manager.main_state(), WindowState::Destroyed);
        assert_eq!(manager.overlay_state(), WindowState::Destroyed);
        assert_eq!(manager.snapshot().panels, PanelSet::default());
        assert_eq!(manager.on_show_overlay(), Transition::Ignored);
    }

    #[test]
    fn test_backend_failure_reported_as_failed() {
        let (mut manager, backend) = started();
        backend.fail_calls(true);

        assert_eq!(manager.on_show_overlay(), Transition::Failed);
        assert_eq!(manager.overlay_state(), WindowState::Hidden);
        assert_eq!(manager.move_overlay(5, 5), Transition::Failed);

        backend.fail_calls(false);
        assert_eq!(manager.on_show_overlay(), Transition::Changed);
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let (mut manager, backend) = started();
        manager.shutdown();
        assert!(!backend.exists(WindowRole::Main));
        assert!(!backend.exists(WindowRole::Overlay));

        let calls = backend.calls().len();
        manager.shutdown();
        assert_eq!(backend.calls().len(), calls);
        assert_eq!(manager.snapshot().main, WindowState::Destroyed);
    }

    #[test]
    fn test_panels_publish_and_survive_hide() {
        let (mut manager, backend) = started();
        manager.on_show_overlay();

        assert_eq!(manager.toggle_panel(Panel::Chat), Some(true));
        assert_eq!(manager.toggle_panel(Panel::Notes), Some(true));
        let published = backend.published();
        assert_eq!(published.len(), 2);
        assert_eq!(published[1].0, PANELS_EVENT);
        assert_eq!(
            published[1].1,
            serde_json::json!({ "chat": true, "summary": false, "notes": true })
        );

        manager.on_hide_overlay();
        manager.on_show_overlay();
        assert!(manager.snapshot().panels.is_open(Panel::Chat));

        assert_eq!(manager.close_panels(), Transition::Changed);
        assert_eq!(manager.close_panels(), Transition::Unchanged);
        assert_eq!(backend.published().len(), 3);
    }

    #[test]
    fn test_panels_cleared_when_overlay_destroyed() {
        let (mut manager, _) = started();
        manager.toggle_panel(Panel::Summary);
        manager.on_main_closed();

        assert_eq!(manager.snapshot().panels, PanelSet::default());
        assert_eq!(manager.toggle_panel(Panel::Summary), None);
        assert_eq!(manager.close_panels(), Transition::Ignored);
    }

    #[test]
    fn test_move_overlay() {
        let (mut manager, backend) = started();
        assert_eq!(manager.move_overlay(120, 40), Transition::Changed);
        assert_eq!(backend.position(WindowRole::Overlay), Some((120, 40)));
    }
}
