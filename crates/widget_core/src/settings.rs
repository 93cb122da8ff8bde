//! Widget configuration: defaults, then `widget.toml`, then env overrides.

use std::{env, fs};

use serde::Deserialize;
use shared::protocol::WireFormat;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WidgetSettings {
    /// Full URL of the chat endpoint, including the path.
    pub endpoint_url: String,
    pub wire: WireFormat,
    /// Fixed notice rendered as the Bot turn when an exchange fails. Raw
    /// transport detail never reaches the transcript.
    pub failure_notice: String,
    pub typing_notice: String,
    pub quick_replies: Vec<String>,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            endpoint_url: "http://127.0.0.1:8080/chat".into(),
            wire: WireFormat::MessageReply,
            failure_notice: "Could not reach the server.".into(),
            typing_notice: "Bot is typing...".into(),
            quick_replies: vec![
                "placements".into(),
                "admissions".into(),
                "about the campus".into(),
            ],
        }
    }
}

pub fn load_settings() -> WidgetSettings {
    let mut settings = WidgetSettings::default();

    if let Ok(raw) = fs::read_to_string("widget.toml") {
        apply_file_overrides(&mut settings, &raw);
    }

    if let Ok(v) = env::var("WIDGET_ENDPOINT_URL") {
        settings.endpoint_url = v;
    }
    if let Ok(v) = env::var("WIDGET_WIRE_FORMAT") {
        match v.parse::<WireFormat>() {
            Ok(wire) => settings.wire = wire,
            Err(err) => tracing::warn!("ignoring WIDGET_WIRE_FORMAT: {err}"),
        }
    }
    if let Ok(v) = env::var("WIDGET_FAILURE_NOTICE") {
        settings.failure_notice = v;
    }

    settings
}

fn apply_file_overrides(settings: &mut WidgetSettings, raw: &str) {
    #[derive(Debug, Default, Deserialize)]
    struct FileSettings {
        endpoint_url: Option<String>,
        wire: Option<WireFormat>,
        failure_notice: Option<String>,
        typing_notice: Option<String>,
        quick_replies: Option<Vec<String>>,
    }

    let file = match toml::from_str::<FileSettings>(raw) {
        Ok(file) => file,
        Err(err) => {
            tracing::warn!("ignoring malformed widget.toml: {err}");
            return;
        }
    };

    if let Some(v) = file.endpoint_url {
        settings.endpoint_url = v;
    }
    if let Some(v) = file.wire {
        settings.wire = v;
    }
    if let Some(v) = file.failure_notice {
        settings.failure_notice = v;
    }
    if let Some(v) = file.typing_notice {
        settings.typing_notice = v;
    }
    if let Some(v) = file.quick_replies {
        settings.quick_replies = v;
    }
}
