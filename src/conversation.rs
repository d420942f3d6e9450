use chrono::{DateTime, Local};
use serde::Serialize;

/// Seeded as the first assistant message of every session.
pub const WELCOME_MESSAGE: &str = "Hello! I'm MindMate, your AI companion from Soulklinic. I'm here to provide 24/7 support and guidance for your mental wellness journey. While I can offer coping strategies and emotional support, please remember that I'm not a replacement for professional psychiatric care. How are you feeling today?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Author {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub id: u64,
    pub text: String,
    pub author: Author,
    pub timestamp: DateTime<Local>,
}

/// Append-only session transcript plus the "assistant is composing" flag.
/// Messages are never edited or removed; append order is chronological order.
pub struct Conversation {
    messages: Vec<Message>,
    is_composing: bool,
    next_id: u64,
}

impl Conversation {
    pub fn new() -> Self {
        let mut conversation = Self {
            messages: Vec::new(),
            is_composing: false,
            next_id: 1,
        };
        conversation.push(Author::Assistant, WELCOME_MESSAGE);
        conversation
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_composing(&self) -> bool {
        self.is_composing
    }

    /// Append a user message and mark a reply as pending. Whitespace-only
    /// input is ignored entirely and returns no id.
    pub fn append_user(&mut self, text: &str) -> Option<u64> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let id = self.push(Author::User, text);
        self.is_composing = true;
        Some(id)
    }

    /// Append an assistant message and clear the composing flag.
    pub fn append_assistant(&mut self, text: &str) -> u64 {
        let id = self.push(Author::Assistant, text);
        self.is_composing = false;
        id
    }

    /// Clear the composing flag without appending a reply. Used when a
    /// pending reply is discarded before it fires.
    pub fn abort_composing(&mut self) {
        self.is_composing = false;
    }

    /// Restore the initial single-welcome-message state. Session start
    /// only; not reachable from the UI.
    #[allow(dead_code)]
    pub fn reset(&mut self) {
        self.messages.clear();
        self.is_composing = false;
        self.next_id = 1;
        self.push(Author::Assistant, WELCOME_MESSAGE);
    }

    fn push(&mut self, author: Author, text: &str) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(Message {
            id,
            text: text.to_string(),
            author,
            timestamp: Local::now(),
        });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_seeds_welcome_message() {
        let conversation = Conversation::new();
        assert_eq!(conversation.messages().len(), 1);
        assert_eq!(conversation.messages()[0].author, Author::Assistant);
        assert_eq!(conversation.messages()[0].text, WELCOME_MESSAGE);
        assert!(!conversation.is_composing());
    }

    #[test]
    fn test_append_user_grows_log_and_sets_composing() {
        let mut conversation = Conversation::new();
        let id = conversation.append_user("I could use someone to talk to");
        assert!(id.is_some());
        assert_eq!(conversation.messages().len(), 2);
        assert!(conversation.is_composing());
    }

    #[test]
    fn test_append_user_trims_text() {
        let mut conversation = Conversation::new();
        conversation.append_user("  hello  ");
        assert_eq!(conversation.messages()[1].text, "hello");
    }

    #[test]
    fn test_append_whitespace_is_noop() {
        let mut conversation = Conversation::new();
        for text in ["", "   ", "\t", " \n "] {
            assert!(conversation.append_user(text).is_none());
            assert_eq!(conversation.messages().len(), 1);
            assert!(!conversation.is_composing());
        }
    }

    #[test]
    fn test_append_assistant_clears_composing() {
        let mut conversation = Conversation::new();
        conversation.append_user("hello");
        conversation.append_assistant("hi there");
        assert_eq!(conversation.messages().len(), 3);
        assert!(!conversation.is_composing());
        assert_eq!(conversation.messages()[2].author, Author::Assistant);
    }

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let mut conversation = Conversation::new();
        let first = conversation.append_user("one").unwrap();
        conversation.append_assistant("reply");
        let second = conversation.append_user("two").unwrap();
        assert!(second > first);
        let mut ids: Vec<u64> = conversation.messages().iter().map(|m| m.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), conversation.messages().len());
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut conversation = Conversation::new();
        conversation.append_user("hello");
        conversation.reset();
        assert_eq!(conversation.messages().len(), 1);
        assert_eq!(conversation.messages()[0].text, WELCOME_MESSAGE);
        assert!(!conversation.is_composing());
    }

    #[test]
    fn test_abort_composing_keeps_log() {
        let mut conversation = Conversation::new();
        conversation.append_user("hello");
        conversation.abort_composing();
        assert_eq!(conversation.messages().len(), 2);
        assert!(!conversation.is_composing());
    }
}
