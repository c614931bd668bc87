mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod manager;
pub mod panels;
pub mod signals;
pub mod windows;

use anyhow::Context;
use config::{ExitDecision, ShellConfig};
use manager::WindowManager;
use signals::{Dispatcher, ShellMessage, Signal, SignalChannel, SIGNAL_NAMES};
use tauri::{Listener, Manager, RunEvent, WindowEvent};
use windows::{TauriBackend, WindowRole};

pub fn run() -> anyhow::Result<()> {
    config::load_dotenv();
    let config = ShellConfig::from_env().context("invalid configuration")?;
    logging::init(&config.log_filter);
    tracing::info!(quit_policy = ?config.quit_policy, "starting clariimeet");

    let quit_policy = config.quit_policy;
    let (channel, rx) = SignalChannel::new();
    let listener_channel = channel.clone();

    let app = tauri::Builder::default()
        .manage(channel.clone())
        .setup(move |app| {
            let mut manager = WindowManager::new(TauriBackend::new(app.handle().clone()));
            manager.startup()?;
            tauri::async_runtime::spawn(Dispatcher::new(manager, rx).run());

            // renderer may emit the signals as plain events instead of invoking commands
            for name in SIGNAL_NAMES {
                let signal = Signal::from_name(name)?;
                let channel = listener_channel.clone();
                app.listen_any(name, move |_| channel.signal(signal));
            }
            Ok(())
        })
        .on_window_event(|window, event| {
            if let WindowEvent::Destroyed = event {
                if let Some(role) = WindowRole::from_label(window.label()) {
                    tracing::info!(label = role.label(), "window destroyed");
                    window
                        .state::<SignalChannel>()
                        .send(ShellMessage::WindowDestroyed(role));
                }
            }
        })
        .invoke_handler(tauri::generate_handler![
            commands::show_overlay,
            commands::hide_overlay,
            commands::toggle_panel,
            commands::close_panels,
            commands::move_overlay,
            commands::overlay_snapshot,
            commands::debug_log,
        ])
        .build(tauri::generate_context!())
        .context("error while building tauri application")?;

    app.run(move |_app, event| match event {
        RunEvent::ExitRequested { code, api, .. } => {
            if code.is_none() {
                channel.send(ShellMessage::AllWindowsClosed);
            }
            if config::on_exit_requested(code, quit_policy) == ExitDecision::StayResident {
                tracing::info!("all windows closed, staying resident");
                api.prevent_exit();
            }
        }
        RunEvent::Exit => channel.send(ShellMessage::Shutdown),
        _ => {}
    });

    Ok(())
}
