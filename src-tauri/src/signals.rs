//! Fire-and-forget signal channel from the renderer to the window manager.
//!
//! Every producer (event listeners, commands, window events) pushes onto one
//! unbounded queue; a single `Dispatcher` drains it in order and is the only
//! code that touches the `WindowManager`.

use crate::error::ShellError;
use crate::manager::{ShellSnapshot, Transition, WindowManager};
use crate::panels::Panel;
use crate::windows::{WindowBackend, WindowRole};
use std::ops::ControlFlow;
use tokio::sync::{mpsc, oneshot};

pub const SHOW_OVERLAY: &str = "show-overlay";
pub const HIDE_OVERLAY: &str = "hide-overlay";
/// Event names the renderer may emit directly.
pub const SIGNAL_NAMES: [&str; 2] = [SHOW_OVERLAY, HIDE_OVERLAY];

/// Named, payload-less request from UI code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    ShowOverlay,
    HideOverlay,
}

impl Signal {
    pub fn name(self) -> &'static str {
        match self {
            Self::ShowOverlay => SHOW_OVERLAY,
            Self::HideOverlay => HIDE_OVERLAY,
        }
    }

    pub fn from_name(name: &str) -> Result<Self, ShellError> {
        match name {
            SHOW_OVERLAY => Ok(Self::ShowOverlay),
            HIDE_OVERLAY => Ok(Self::HideOverlay),
            other => Err(ShellError::UnknownSignal(other.to_string())),
        }
    }
}

#[derive(Debug)]
pub enum ShellMessage {
    Signal(Signal),
    WindowDestroyed(WindowRole),
    AllWindowsClosed,
    TogglePanel(Panel),
    ClosePanels,
    MoveOverlay { x: i32, y: i32 },
    Snapshot(oneshot::Sender<ShellSnapshot>),
    Shutdown,
}

#[derive(Clone)]
pub struct SignalChannel {
    tx: mpsc::UnboundedSender<ShellMessage>,
}

impl SignalChannel {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ShellMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Enqueue without waiting. Once the dispatcher is gone the message is
    /// dropped; there is no recipient left to act on it.
    pub fn send(&self, message: ShellMessage) {
        if let Err(e) = self.tx.send(message) {
            tracing::debug!(dropped = ?e.0, "dispatcher gone, dropping message");
        }
    }

    pub fn signal(&self, signal: Signal) {
        tracing::debug!(signal = signal.name(), "signal received");
        self.send(ShellMessage::Signal(signal));
    }

    pub async fn snapshot(&self) -> Result<ShellSnapshot, ShellError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(ShellMessage::Snapshot(reply))
            .map_err(|_| ShellError::DispatcherStopped)?;
        rx.await.map_err(|_| ShellError::DispatcherStopped)
    }
}

pub struct Dispatcher<B: WindowBackend> {
    manager: WindowManager<B>,
    rx: mpsc::UnboundedReceiver<ShellMessage>,
}

impl<B: WindowBackend> Dispatcher<B> {
    pub fn new(manager: WindowManager<B>, rx: mpsc::UnboundedReceiver<ShellMessage>) -> Self {
        Self { manager, rx }
    }

    /// Apply one message to completion.
    pub fn handle(&mut self, message: ShellMessage) -> ControlFlow<()> {
        match message {
            ShellMessage::Signal(signal) => {
                let transition = match signal {
                    Signal::ShowOverlay => self.manager.on_show_overlay(),
                    Signal::HideOverlay => self.manager.on_hide_overlay(),
                };
                if transition != Transition::Changed {
                    tracing::debug!(signal = signal.name(), ?transition, "signal was a no-op");
                }
            }
            ShellMessage::WindowDestroyed(role) => self.manager.on_window_destroyed(role),
            ShellMessage::AllWindowsClosed => {
                self.manager.on_all_windows_closed();
            }
            ShellMessage::TogglePanel(panel) => {
                if self.manager.toggle_panel(panel).is_none() {
                    tracing::debug!(?panel, "panel toggle ignored, overlay gone");
                }
            }
            ShellMessage::ClosePanels => {
                self.manager.close_panels();
            }
            ShellMessage::MoveOverlay { x, y } => {
                self.manager.move_overlay(x, y);
            }
            ShellMessage::Snapshot(reply) => {
                let _ = reply.send(self.manager.snapshot());
            }
            ShellMessage::Shutdown => {
                self.manager.shutdown();
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    /// Drain the queue until `Shutdown` or every sender is dropped. Returns
    /// the manager so callers can inspect final state.
    pub async fn run(mut self) -> WindowManager<B> {
        while let Some(message) = self.rx.recv().await {
            if self.handle(message).is_break() {
                break;
            }
        }
        tracing::debug!("shell dispatcher stopped");
        self.manager
    }
}
