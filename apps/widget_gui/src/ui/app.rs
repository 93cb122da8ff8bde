//! The chat widget window: transcript panel, composer row, quick replies,
//! and the theme toggle.

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::Sender as MessageSender;
use widget_core::{ThemeMode, Transcript, TranscriptEntry, WidgetEvent, WidgetSettings};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::controller::orchestration::dispatch_backend_command;

pub struct WidgetApp {
    settings: WidgetSettings,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    /// Local mirror of the controller transcript, rebuilt from events.
    transcript: Transcript,
    theme: ThemeMode,
    composer: String,
    status: String,
}

impl WidgetApp {
    pub fn new(
        settings: WidgetSettings,
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
    ) -> Self {
        Self {
            settings,
            cmd_tx,
            ui_rx,
            transcript: Transcript::new(),
            theme: ThemeMode::default(),
            composer: String::new(),
            status: String::new(),
        }
    }

    fn drain_backend_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Widget(WidgetEvent::MessageAppended(message)) => {
                    self.transcript.append(message);
                }
                UiEvent::Widget(WidgetEvent::TypingStarted { exchange_id }) => {
                    self.transcript.show_typing(exchange_id);
                }
                UiEvent::Widget(WidgetEvent::TypingCleared { exchange_id }) => {
                    self.transcript.clear_typing(exchange_id);
                }
                UiEvent::Widget(WidgetEvent::ExchangeSettled { .. }) => {}
                UiEvent::Widget(WidgetEvent::ThemeChanged(mode)) => {
                    self.theme = mode;
                }
                UiEvent::FatalStartup(message) => {
                    self.status = message;
                }
            }
        }
    }

    fn send_composer(&mut self) {
        let text = self.composer.trim().to_string();
        if text.is_empty() {
            return;
        }
        self.composer.clear();
        dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::SendMessage { text },
            &mut self.status,
        );
    }
}

impl eframe::App for WidgetApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_backend_events();

        ctx.set_visuals(match self.theme {
            ThemeMode::Dark => egui::Visuals::dark(),
            ThemeMode::Light => egui::Visuals::light(),
        });

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Chat");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button(self.theme.toggle_label()).clicked() {
                        dispatch_backend_command(
                            &self.cmd_tx,
                            BackendCommand::ToggleTheme,
                            &mut self.status,
                        );
                    }
                });
            });
        });

        egui::TopBottomPanel::bottom("composer").show(ctx, |ui| {
            if !self.settings.quick_replies.is_empty() {
                let mut picked = None;
                ui.horizontal_wrapped(|ui| {
                    for preset in &self.settings.quick_replies {
                        if ui.button(preset).clicked() {
                            picked = Some(preset.clone());
                        }
                    }
                });
                if let Some(preset) = picked {
                    // Same path as manual entry: fill the composer, submit.
                    self.composer = preset;
                    self.send_composer();
                }
            }

            ui.horizontal(|ui| {
                let edit = ui.add_sized(
                    [ui.available_width() - 64.0, 24.0],
                    egui::TextEdit::singleline(&mut self.composer)
                        .hint_text("Type a message (Enter to send)"),
                );
                let enter_sent =
                    edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                let button_sent = ui.button("Send").clicked();
                if enter_sent || button_sent {
                    self.send_composer();
                    if enter_sent {
                        edit.request_focus();
                    }
                }
            });

            if !self.status.is_empty() {
                ui.label(&self.status);
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    for entry in self.transcript.entries() {
                        match entry {
                            TranscriptEntry::Message(message) => {
                                let speaker = match message.sender {
                                    MessageSender::User => "You",
                                    MessageSender::Bot => "Bot",
                                };
                                ui.horizontal_wrapped(|ui| {
                                    ui.strong(format!("{speaker}:"));
                                    ui.label(&message.text);
                                });
                            }
                            TranscriptEntry::Typing { .. } => {
                                ui.weak(&self.settings.typing_notice);
                            }
                        }
                    }
                });
        });

        // Backend events arrive on their own thread; poll for them even when
        // the window is idle.
        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}
