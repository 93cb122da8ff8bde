use anyhow::Result;
use clap::Parser;
use crossbeam_channel::bounded;

mod backend_bridge;
mod controller;
mod ui;

#[derive(Parser, Debug)]
struct Args {
    /// Chat endpoint URL, e.g. http://127.0.0.1:8080/chat
    #[arg(long)]
    endpoint_url: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let mut settings = widget_core::load_settings();
    if let Some(url) = args.endpoint_url {
        settings.endpoint_url = url;
    }

    let (cmd_tx, cmd_rx) = bounded(64);
    let (ui_tx, ui_rx) = bounded(256);
    backend_bridge::runtime::launch(settings.clone(), cmd_rx, ui_tx);

    let app = ui::app::WidgetApp::new(settings, cmd_tx, ui_rx);
    eframe::run_native(
        "Chat Widget",
        eframe::NativeOptions::default(),
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|err| anyhow::anyhow!("failed to run widget ui: {err}"))?;

    Ok(())
}
