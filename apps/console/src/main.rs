use anyhow::Result;
use clap::Parser;
use shared::domain::Sender;
use tokio::io::{AsyncBufReadExt, BufReader};
use widget_core::{load_settings, ChatController, WidgetEvent};

#[derive(Parser, Debug)]
struct Args {
    /// Chat endpoint URL, e.g. http://127.0.0.1:8080/chat
    #[arg(long)]
    endpoint_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(url) = args.endpoint_url {
        settings.endpoint_url = url;
    }
    let typing_notice = settings.typing_notice.clone();
    let controller = ChatController::new(settings)?;

    let mut events = controller.subscribe_events();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                WidgetEvent::MessageAppended(message) => match message.sender {
                    Sender::User => println!("You: {}", message.text),
                    Sender::Bot => println!("Bot: {}", message.text),
                },
                WidgetEvent::TypingStarted { .. } => println!("[{typing_notice}]"),
                WidgetEvent::TypingCleared { .. }
                | WidgetEvent::ExchangeSettled { .. }
                | WidgetEvent::ThemeChanged(_) => {}
            }
        }
    });

    println!(
        "Connected to {} — type a message, /quick [N], /theme, or /quit",
        controller.settings().endpoint_url
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        if line == "/quit" {
            break;
        }
        if line == "/theme" {
            let mode = controller.toggle_theme().await;
            println!("Theme is now {mode:?}; the toggle now offers: {}", mode.toggle_label());
            continue;
        }
        if let Some(rest) = line.strip_prefix("/quick") {
            let rest = rest.trim();
            if rest.is_empty() {
                for (index, preset) in controller.quick_replies().iter().enumerate() {
                    println!("  /quick {index} — {preset}");
                }
            } else if let Ok(index) = rest.parse::<usize>() {
                controller.submit_quick_reply(index).await;
            } else {
                println!("Usage: /quick [N]");
            }
            continue;
        }
        controller.submit(&line).await;
    }

    Ok(())
}
