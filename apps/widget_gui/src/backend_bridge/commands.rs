//! Backend commands queued from UI to the backend worker.

pub enum BackendCommand {
    SendMessage { text: String },
    ToggleTheme,
}
