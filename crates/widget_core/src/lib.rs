use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use shared::{
    domain::{ExchangeId, Message, MessageId, RenderMode, Sender},
    error::{ExchangeError, FailureKind},
    protocol::WireFormat,
};
use tokio::sync::{broadcast, Mutex};
use url::Url;

pub mod exchange;
pub mod settings;
pub mod theme;
pub mod transcript;

pub use settings::{load_settings, WidgetSettings};
pub use theme::ThemeMode;
pub use transcript::{Transcript, TranscriptEntry};

use exchange::{Exchange, ExchangePhase, ExchangeStep, InvalidStep};

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// One request/response round trip with the chat endpoint. The seam that
/// tests and alternative backends inject through.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn exchange(&self, text: &str) -> std::result::Result<String, ExchangeError>;
}

/// Real transport: one JSON POST per exchange, reply parsed defensively.
pub struct HttpChatTransport {
    http: Client,
    endpoint: Url,
    wire: WireFormat,
}

impl HttpChatTransport {
    pub fn new(endpoint: Url, wire: WireFormat) -> Self {
        Self {
            http: Client::new(),
            endpoint,
            wire,
        }
    }
}

#[async_trait]
impl ChatTransport for HttpChatTransport {
    async fn exchange(&self, text: &str) -> std::result::Result<String, ExchangeError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&self.wire.request_body(text))
            .send()
            .await
            .map_err(|err| ExchangeError::new(FailureKind::Network, err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExchangeError::new(
                FailureKind::Status,
                format!("endpoint returned {status}"),
            ));
        }

        let raw = response
            .bytes()
            .await
            .map_err(|err| ExchangeError::new(FailureKind::Network, err.to_string()))?;
        self.wire.decode_reply(&raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeOutcome {
    Resolved,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Empty-after-trim input (or an out-of-range quick reply): zero side
    /// effects occurred.
    Ignored,
    Settled {
        exchange_id: ExchangeId,
        outcome: ExchangeOutcome,
    },
}

/// Rendering seam: front-ends subscribe and draw from these instead of
/// reaching into controller state.
#[derive(Debug, Clone)]
pub enum WidgetEvent {
    MessageAppended(Message),
    TypingStarted { exchange_id: ExchangeId },
    TypingCleared { exchange_id: ExchangeId },
    ExchangeSettled {
        exchange_id: ExchangeId,
        outcome: ExchangeOutcome,
    },
    ThemeChanged(ThemeMode),
}

struct ControllerState {
    transcript: Transcript,
    next_message_id: i64,
    next_exchange_id: i64,
    theme: ThemeMode,
}

impl ControllerState {
    fn allocate_exchange_id(&mut self) -> ExchangeId {
        self.next_exchange_id += 1;
        ExchangeId(self.next_exchange_id)
    }

    fn commit_message(&mut self, sender: Sender, text: String) -> Message {
        self.next_message_id += 1;
        let message = Message {
            message_id: MessageId(self.next_message_id),
            sender,
            text,
            render: RenderMode::PlainText,
            sent_at: Utc::now(),
        };
        self.transcript.append(message.clone());
        message
    }
}

/// The chat widget controller. One instance per widget; holds its endpoint
/// configuration and transport as fields so several independent widgets can
/// coexist and tests can inject a fake network.
pub struct ChatController {
    transport: Arc<dyn ChatTransport>,
    settings: WidgetSettings,
    inner: Mutex<ControllerState>,
    events: broadcast::Sender<WidgetEvent>,
}

impl std::fmt::Debug for ChatController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatController")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl ChatController {
    pub fn new(settings: WidgetSettings) -> Result<Arc<Self>> {
        let endpoint = Url::parse(&settings.endpoint_url)
            .with_context(|| format!("invalid endpoint url '{}'", settings.endpoint_url))?;
        let transport = Arc::new(HttpChatTransport::new(endpoint, settings.wire));
        Ok(Self::new_with_transport(settings, transport))
    }

    pub fn new_with_transport(
        settings: WidgetSettings,
        transport: Arc<dyn ChatTransport>,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            transport,
            settings,
            inner: Mutex::new(ControllerState {
                transcript: Transcript::new(),
                next_message_id: 0,
                next_exchange_id: 0,
                theme: ThemeMode::default(),
            }),
            events,
        })
    }

    pub fn settings(&self) -> &WidgetSettings {
        &self.settings
    }

    pub fn quick_replies(&self) -> &[String] {
        &self.settings.quick_replies
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<WidgetEvent> {
        self.events.subscribe()
    }

    /// Runs one full exchange for the given input. Trims first; empty input
    /// is ignored with no visible side effect. Otherwise the User message and
    /// this exchange's typing placeholder are committed before the network
    /// call starts, and settlement always clears the placeholder before the
    /// Bot message is appended. Transport failures are consumed here and
    /// rendered as the configured failure notice; nothing propagates.
    pub async fn submit(&self, raw_text: &str) -> SubmitOutcome {
        let text = raw_text.trim();
        if text.is_empty() {
            return SubmitOutcome::Ignored;
        }

        let mut exchange;
        {
            let mut inner = self.inner.lock().await;
            exchange = Exchange::new(inner.allocate_exchange_id());
            let user_message = inner.commit_message(Sender::User, text.to_string());
            note_phase(exchange.step(ExchangeStep::CommitUserMessage));
            self.emit(WidgetEvent::MessageAppended(user_message));
            inner.transcript.show_typing(exchange.exchange_id());
            self.emit(WidgetEvent::TypingStarted {
                exchange_id: exchange.exchange_id(),
            });
        }

        note_phase(exchange.step(ExchangeStep::Dispatch));
        tracing::debug!(
            exchange_id = exchange.exchange_id().0,
            "dispatching chat exchange"
        );
        let result = self.transport.exchange(text).await;

        let outcome = {
            let mut inner = self.inner.lock().await;
            if !inner.transcript.clear_typing(exchange.exchange_id()) {
                tracing::error!(
                    exchange_id = exchange.exchange_id().0,
                    "typing placeholder missing at settlement"
                );
            }
            self.emit(WidgetEvent::TypingCleared {
                exchange_id: exchange.exchange_id(),
            });

            match result {
                Ok(reply) => {
                    note_phase(exchange.step(ExchangeStep::Resolve));
                    let bot_message = inner.commit_message(Sender::Bot, reply);
                    self.emit(WidgetEvent::MessageAppended(bot_message));
                    ExchangeOutcome::Resolved
                }
                Err(err) => {
                    tracing::warn!(
                        exchange_id = exchange.exchange_id().0,
                        kind = ?err.kind,
                        error = %err,
                        "chat exchange failed"
                    );
                    note_phase(exchange.step(ExchangeStep::Fail));
                    let bot_message =
                        inner.commit_message(Sender::Bot, self.settings.failure_notice.clone());
                    self.emit(WidgetEvent::MessageAppended(bot_message));
                    ExchangeOutcome::Failed
                }
            }
        };
        self.emit(WidgetEvent::ExchangeSettled {
            exchange_id: exchange.exchange_id(),
            outcome,
        });

        SubmitOutcome::Settled {
            exchange_id: exchange.exchange_id(),
            outcome,
        }
    }

    /// Submits a configured preset through the same path as manual entry.
    pub async fn submit_quick_reply(&self, index: usize) -> SubmitOutcome {
        let Some(preset) = self.settings.quick_replies.get(index) else {
            tracing::warn!(index, "quick reply index out of range");
            return SubmitOutcome::Ignored;
        };
        let preset = preset.clone();
        self.submit(&preset).await
    }

    pub async fn toggle_theme(&self) -> ThemeMode {
        let mut inner = self.inner.lock().await;
        inner.theme = inner.theme.toggled();
        let mode = inner.theme;
        self.emit(WidgetEvent::ThemeChanged(mode));
        mode
    }

    pub async fn theme(&self) -> ThemeMode {
        self.inner.lock().await.theme
    }

    pub async fn transcript(&self) -> Vec<TranscriptEntry> {
        self.inner.lock().await.transcript.entries().to_vec()
    }

    pub async fn messages(&self) -> Vec<Message> {
        self.inner.lock().await.transcript.messages().cloned().collect()
    }

    pub async fn typing_count(&self) -> usize {
        self.inner.lock().await.transcript.typing_count()
    }

    fn emit(&self, event: WidgetEvent) {
        // A widget with no attached renderer is fine; drop the event.
        let _ = self.events.send(event);
    }
}

fn note_phase(step: std::result::Result<ExchangePhase, InvalidStep>) {
    if let Err(err) = step {
        tracing::error!(error = %err, "exchange phase advanced out of order");
    }
}
