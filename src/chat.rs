//! UI-agnostic conversation state
//!
//! This module contains the chat log and its submit/settle lifecycle. It
//! knows nothing about the terminal or the HTTP transport, so the whole
//! Idle -> Pending -> Idle contract can be tested without I/O.

/// Reply shown for any failed request (network, bad status, bad body).
pub const FALLBACK_REPLY: &str = "Could not connect, try again later.";

/// Upper bound on a single outgoing message, enforced where characters
/// enter the input buffer.
pub const MAX_MESSAGE_CHARS: usize = 2000;

/// The role of a chat message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

/// A message in the conversation log
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    /// Transient "assistant is typing" bubble. The only message that is
    /// ever removed from the log.
    pub typing_indicator: bool,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            typing_indicator: false,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
            typing_indicator: false,
        }
    }

    fn typing() -> Self {
        Self {
            role: ChatRole::Assistant,
            content: String::new(),
            typing_indicator: true,
        }
    }
}

/// Chat log plus the pending-request flag. At most one request is in
/// flight at a time: `begin_submit` refuses while pending, and every
/// accepted submit is followed by exactly one `settle`.
#[derive(Debug, Default)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    pending: bool,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Accept one line of user text. Returns the trimmed text the caller
    /// should send to the assistant, or `None` when the input is blank or
    /// a request is already in flight (both are silent no-ops).
    ///
    /// On acceptance the user message and the typing indicator are
    /// appended and the conversation enters Pending.
    pub fn begin_submit(&mut self, input: &str) -> Option<String> {
        let text = input.trim();
        if text.is_empty() || self.pending {
            return None;
        }

        self.pending = true;
        self.messages.push(ChatMessage::user(text));
        self.messages.push(ChatMessage::typing());
        Some(text.to_string())
    }

    /// Settle the outstanding request. `Some(reply)` appends the
    /// assistant's reply; `None` (any failure) appends the fixed fallback.
    /// Either way the typing indicator is removed and the conversation
    /// returns to Idle.
    pub fn settle(&mut self, reply: Option<String>) {
        self.messages.retain(|m| !m.typing_indicator);

        let content = reply.unwrap_or_else(|| FALLBACK_REPLY.to_string());
        self.messages.push(ChatMessage::assistant(content));
        self.pending = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_appends_user_message_and_indicator() {
        let mut conv = Conversation::new();
        let sent = conv.begin_submit("hello");

        assert_eq!(sent.as_deref(), Some("hello"));
        assert!(conv.is_pending());
        assert_eq!(conv.messages().len(), 2);
        assert_eq!(conv.messages()[0].role, ChatRole::User);
        assert_eq!(conv.messages()[0].content, "hello");
        assert!(conv.messages()[1].typing_indicator);
    }

    #[test]
    fn test_submit_trims_input() {
        let mut conv = Conversation::new();
        let sent = conv.begin_submit("  hello  ");

        assert_eq!(sent.as_deref(), Some("hello"));
        assert_eq!(conv.messages()[0].content, "hello");
    }

    #[test]
    fn test_blank_input_is_a_no_op() {
        let mut conv = Conversation::new();

        assert!(conv.begin_submit("").is_none());
        assert!(conv.begin_submit("   ").is_none());
        assert!(!conv.is_pending());
        assert!(conv.messages().is_empty());
    }

    #[test]
    fn test_submit_rejected_while_pending() {
        let mut conv = Conversation::new();
        conv.begin_submit("first").unwrap();

        assert!(conv.begin_submit("second").is_none());
        assert_eq!(conv.messages().len(), 2);
    }

    #[test]
    fn test_settle_success_replaces_indicator_with_reply() {
        let mut conv = Conversation::new();
        conv.begin_submit("hello").unwrap();
        conv.settle(Some("hi there".to_string()));

        assert!(!conv.is_pending());
        assert_eq!(conv.messages().len(), 2);
        let last = conv.messages().last().unwrap();
        assert_eq!(last.role, ChatRole::Assistant);
        assert_eq!(last.content, "hi there");
        assert!(conv.messages().iter().all(|m| !m.typing_indicator));
    }

    #[test]
    fn test_settle_failure_appends_fallback() {
        let mut conv = Conversation::new();
        conv.begin_submit("hello").unwrap();
        conv.settle(None);

        assert!(!conv.is_pending());
        let last = conv.messages().last().unwrap();
        assert_eq!(last.role, ChatRole::Assistant);
        assert_eq!(last.content, FALLBACK_REPLY);
    }

    #[test]
    fn test_submit_allowed_again_after_settle() {
        let mut conv = Conversation::new();
        conv.begin_submit("one").unwrap();
        conv.settle(Some("reply".to_string()));

        assert!(conv.begin_submit("two").is_some());
        assert_eq!(conv.messages().len(), 4);
    }

    #[test]
    fn test_log_grows_monotonically_across_exchanges() {
        let mut conv = Conversation::new();
        conv.begin_submit("one").unwrap();
        conv.settle(None);
        conv.begin_submit("two").unwrap();
        conv.settle(Some("done".to_string()));

        // Two exchanges, each exactly one user + one assistant message.
        let roles: Vec<ChatRole> = conv.messages().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                ChatRole::User,
                ChatRole::Assistant,
                ChatRole::User,
                ChatRole::Assistant
            ]
        );
    }
}
