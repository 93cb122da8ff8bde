//! Runtime bridge between the UI command queue and the widget controller.

use crossbeam_channel::{Receiver, Sender};
use widget_core::{ChatController, WidgetSettings};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

pub fn launch(settings: WidgetSettings, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    std::thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::FatalStartup(format!(
                    "failed to build backend runtime: {err}"
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let controller = match ChatController::new(settings) {
                Ok(controller) => controller,
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::FatalStartup(format!(
                        "failed to start widget controller: {err}"
                    )));
                    tracing::error!("failed to start widget controller: {err}");
                    return;
                }
            };

            let mut events = controller.subscribe_events();
            let event_tx = ui_tx.clone();
            tokio::spawn(async move {
                while let Ok(event) = events.recv().await {
                    let _ = event_tx.try_send(UiEvent::Widget(event));
                }
            });

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::SendMessage { text } => {
                        // Each send is its own exchange; a second send while
                        // one is pending must not wait for it.
                        let controller = controller.clone();
                        tokio::spawn(async move {
                            controller.submit(&text).await;
                        });
                    }
                    BackendCommand::ToggleTheme => {
                        controller.toggle_theme().await;
                    }
                }
            }
        });
    });
}
