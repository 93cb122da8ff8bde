//! Append-only transcript view owned by one controller instance.

use shared::domain::{ExchangeId, Message};

/// One rendered row: either a committed message or a transient typing
/// placeholder owned by a still-pending exchange.
#[derive(Debug, Clone)]
pub enum TranscriptEntry {
    Message(Message),
    Typing { exchange_id: ExchangeId },
}

/// Committed messages are never mutated or reordered; placeholders are the
/// only entries that ever leave the view.
#[derive(Debug, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: Message) {
        self.entries.push(TranscriptEntry::Message(message));
    }

    /// Shows the typing placeholder for `exchange_id`. Returns false if that
    /// exchange already has one showing.
    pub fn show_typing(&mut self, exchange_id: ExchangeId) -> bool {
        let already_showing = self.entries.iter().any(
            |entry| matches!(entry, TranscriptEntry::Typing { exchange_id: id } if *id == exchange_id),
        );
        if already_showing {
            return false;
        }
        self.entries.push(TranscriptEntry::Typing { exchange_id });
        true
    }

    /// Removes the typing placeholder for `exchange_id`, leaving every other
    /// entry in place. Returns false if none was showing.
    pub fn clear_typing(&mut self, exchange_id: ExchangeId) -> bool {
        let before = self.entries.len();
        self.entries.retain(
            |entry| !matches!(entry, TranscriptEntry::Typing { exchange_id: id } if *id == exchange_id),
        );
        self.entries.len() != before
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    /// The logical transcript: committed messages only, in append order.
    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.entries.iter().filter_map(|entry| match entry {
            TranscriptEntry::Message(message) => Some(message),
            TranscriptEntry::Typing { .. } => None,
        })
    }

    pub fn typing_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| matches!(entry, TranscriptEntry::Typing { .. }))
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use shared::domain::{MessageId, RenderMode, Sender};

    use super::*;

    fn message(id: i64, text: &str) -> Message {
        Message {
            message_id: MessageId(id),
            sender: Sender::User,
            text: text.to_string(),
            render: RenderMode::PlainText,
            sent_at: Utc::now(),
        }
    }

    #[test]
    fn messages_keep_append_order() {
        let mut transcript = Transcript::new();
        transcript.append(message(1, "first"));
        transcript.append(message(2, "second"));

        let texts: Vec<_> = transcript.messages().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, ["first", "second"]);
    }

    #[test]
    fn clear_typing_removes_only_the_owning_exchange() {
        let mut transcript = Transcript::new();
        transcript.append(message(1, "a"));
        assert!(transcript.show_typing(ExchangeId(1)));
        transcript.append(message(2, "b"));
        assert!(transcript.show_typing(ExchangeId(2)));
        assert_eq!(transcript.typing_count(), 2);

        assert!(transcript.clear_typing(ExchangeId(1)));
        assert_eq!(transcript.typing_count(), 1);
        assert!(transcript
            .entries()
            .iter()
            .any(|entry| matches!(entry, TranscriptEntry::Typing { exchange_id } if *exchange_id == ExchangeId(2))));
        assert_eq!(transcript.messages().count(), 2);
    }

    #[test]
    fn show_typing_is_single_shot_per_exchange() {
        let mut transcript = Transcript::new();
        assert!(transcript.show_typing(ExchangeId(7)));
        assert!(!transcript.show_typing(ExchangeId(7)));
        assert_eq!(transcript.typing_count(), 1);
    }

    #[test]
    fn clear_typing_without_placeholder_reports_false() {
        let mut transcript = Transcript::new();
        assert!(!transcript.clear_typing(ExchangeId(9)));
        assert!(transcript.is_empty());
    }

    #[test]
    fn placeholders_never_appear_in_the_logical_transcript() {
        let mut transcript = Transcript::new();
        transcript.show_typing(ExchangeId(1));
        transcript.append(message(1, "hello"));

        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.messages().count(), 1);
    }
}
