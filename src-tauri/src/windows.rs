//! Window specs and the backend seam the manager drives.
//!
//! `TauriBackend` talks to real webview windows; tests use
//! `testing::MockBackend`, which records every call.

use crate::error::ShellError;
use tauri::{AppHandle, Emitter, Manager, PhysicalPosition, WebviewUrl, WebviewWindowBuilder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowRole {
    Main,
    Overlay,
}

impl WindowRole {
    pub fn label(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Overlay => "overlay",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "main" => Some(Self::Main),
            "overlay" => Some(Self::Overlay),
            _ => None,
        }
    }
}

/// Creation-time window configuration. Fixed per role, never read from config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSpec {
    pub role: WindowRole,
    pub title: &'static str,
    pub route: &'static str,
    pub width: u32,
    pub height: u32,
    pub decorations: bool,
    pub transparent: bool,
    pub always_on_top: bool,
    pub skip_taskbar: bool,
    pub resizable: bool,
    pub visible: bool,
}

impl WindowSpec {
    pub fn main() -> Self {
        Self {
            role: WindowRole::Main,
            title: "Clariimeet",
            route: "/",
            width: 1200,
            height: 800,
            decorations: true,
            transparent: false,
            always_on_top: false,
            skip_taskbar: false,
            resizable: true,
            visible: true,
        }
    }

    /// Frameless mini-toolbar window; starts hidden until `show-overlay`.
    pub fn overlay() -> Self {
        Self {
            role: WindowRole::Overlay,
            title: "Clariimeet Overlay",
            route: "/overlay",
            width: 400,
            height: 100,
            decorations: false,
            transparent: true,
            always_on_top: true,
            skip_taskbar: true,
            resizable: false,
            visible: false,
        }
    }

    pub fn label(&self) -> &'static str {
        self.role.label()
    }

    /// Tauri maps `index.html` to the app root (dev server `/`); every other
    /// route is joined onto it.
    fn webview_url(&self) -> WebviewUrl {
        match self.route.trim_start_matches('/') {
            "" => WebviewUrl::App("index.html".into()),
            route => WebviewUrl::App(route.into()),
        }
    }
}

pub trait WindowBackend {
    fn create(&self, spec: &WindowSpec) -> Result<(), ShellError>;
    fn set_visible(&self, role: WindowRole, visible: bool) -> Result<(), ShellError>;
    fn close(&self, role: WindowRole) -> Result<(), ShellError>;
    fn set_position(&self, role: WindowRole, x: i32, y: i32) -> Result<(), ShellError>;
    fn publish(
        &self,
        role: WindowRole,
        event: &str,
        payload: serde_json::Value,
    ) -> Result<(), ShellError>;
}

pub struct TauriBackend {
    app: AppHandle,
}

impl TauriBackend {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }

    fn window(&self, role: WindowRole) -> Result<tauri::WebviewWindow, ShellError> {
        self.app
            .get_webview_window(role.label())
            .ok_or(ShellError::WindowMissing(role.label()))
    }
}

impl WindowBackend for TauriBackend {
    fn create(&self, spec: &WindowSpec) -> Result<(), ShellError> {
        if self.app.get_webview_window(spec.label()).is_some() {
            return Err(ShellError::WindowExists(spec.label()));
        }
        WebviewWindowBuilder::new(&self.app, spec.label(), spec.webview_url())
            .title(spec.title)
            .inner_size(f64::from(spec.width), f64::from(spec.height))
            .decorations(spec.decorations)
            .transparent(spec.transparent)
            .always_on_top(spec.always_on_top)
            .skip_taskbar(spec.skip_taskbar)
            .resizable(spec.resizable)
            .visible(spec.visible)
            .build()?;
        Ok(())
    }

    fn set_visible(&self, role: WindowRole, visible: bool) -> Result<(), ShellError> {
        let window = self.window(role)?;
        if visible {
            window.show()?;
        } else {
            window.hide()?;
        }
        Ok(())
    }

    fn close(&self, role: WindowRole) -> Result<(), ShellError> {
        self.window(role)?.close()?;
        Ok(())
    }

    fn set_position(&self, role: WindowRole, x: i32, y: i32) -> Result<(), ShellError> {
        self.window(role)?
            .set_position(PhysicalPosition::new(x, y))?;
        Ok(())
    }

    fn publish(
        &self,
        role: WindowRole,
        event: &str,
        payload: serde_json::Value,
    ) -> Result<(), ShellError> {
        // emit_to silently drops events for unknown labels, so check first
        self.window(role)?;
        self.app.emit_to(role.label(), event, payload)?;
        Ok(())
    }
}
