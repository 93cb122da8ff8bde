//! Events flowing from the backend worker to the UI thread.

use widget_core::WidgetEvent;

pub enum UiEvent {
    Widget(WidgetEvent),
    FatalStartup(String),
}
