use tokio::task::JoinHandle;

use crate::assistant::{AskError, AssistantClient};
use crate::chat::Conversation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub input_mode: InputMode,

    // Input line state
    pub input: String,
    pub input_cursor: usize, // cursor position in input, in chars

    // Conversation state
    pub conversation: Conversation,
    pub ask_task: Option<JoinHandle<Result<String, AskError>>>,

    // Chat viewport state
    pub chat_scroll: u16,
    pub chat_height: u16, // Height of chat area for scroll calculations
    pub chat_width: u16,  // Width of chat area for wrap calculations

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    pub assistant: AssistantClient,
}

impl App {
    pub fn new(assistant: AssistantClient) -> Self {
        Self {
            should_quit: false,
            input_mode: InputMode::Editing,

            input: String::new(),
            input_cursor: 0,

            conversation: Conversation::new(),
            ask_task: None,

            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,

            animation_frame: 0,

            assistant,
        }
    }

    /// Submit the current input line. Blank input and input while a
    /// request is pending are silent no-ops (the conversation enforces
    /// both); on acceptance the request runs on a background task.
    pub fn submit_input(&mut self) {
        let Some(text) = self.conversation.begin_submit(&self.input) else {
            return;
        };

        self.input.clear();
        self.input_cursor = 0;
        self.scroll_chat_to_bottom();

        tracing::debug!(chars = text.chars().count(), "sending message to assistant");
        let assistant = self.assistant.clone();
        self.ask_task = Some(tokio::spawn(async move { assistant.ask(&text).await }));
    }

    /// Called on every Tick: once the in-flight request has finished,
    /// settle the conversation with its outcome. Any failure (including a
    /// panicked task) collapses to the fallback reply; the input is
    /// re-enabled and refocused on every path.
    pub async fn poll_ask(&mut self) {
        let finished = self
            .ask_task
            .as_ref()
            .map(|task| task.is_finished())
            .unwrap_or(false);
        if !finished {
            return;
        }

        let Some(task) = self.ask_task.take() else {
            return;
        };

        let reply = match task.await {
            Ok(Ok(reply)) => {
                tracing::debug!(chars = reply.chars().count(), "assistant replied");
                Some(reply)
            }
            Ok(Err(err)) => {
                tracing::warn!("assistant request failed: {err}");
                None
            }
            Err(err) => {
                tracing::warn!("assistant task did not finish: {err}");
                None
            }
        };

        self.conversation.settle(reply);
        self.input_mode = InputMode::Editing;
        self.scroll_chat_to_bottom();
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.conversation.is_pending() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    // Chat scrolling
    pub fn scroll_down(&mut self) {
        let max_scroll = self.chat_line_count().saturating_sub(self.chat_height);
        if self.chat_scroll < max_scroll {
            self.chat_scroll = self.chat_scroll.saturating_add(1);
        }
    }

    pub fn scroll_up(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_sub(1);
    }

    pub fn scroll_half_page_down(&mut self) {
        let half_page = self.chat_height / 2;
        let max_scroll = self.chat_line_count().saturating_sub(self.chat_height);
        self.chat_scroll = (self.chat_scroll + half_page).min(max_scroll);
    }

    pub fn scroll_half_page_up(&mut self) {
        let half_page = self.chat_height / 2;
        self.chat_scroll = self.chat_scroll.saturating_sub(half_page);
    }

    pub fn scroll_to_top(&mut self) {
        self.chat_scroll = 0;
    }

    /// Scroll the chat so the latest message (or the typing indicator) is
    /// visible.
    pub fn scroll_chat_to_bottom(&mut self) {
        let total_lines = self.chat_line_count();

        let visible_height = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };

        if total_lines > visible_height {
            self.chat_scroll = total_lines.saturating_sub(visible_height);
        } else {
            self.chat_scroll = 0;
        }
    }

    /// Rendered line count of the chat log, mirroring the wrap layout in
    /// `ui::render`.
    fn chat_line_count(&self) -> u16 {
        // Use actual chat width for wrap calculation, default to 50 if not set
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut total_lines: u16 = 0;

        for msg in self.conversation.messages() {
            total_lines += 1; // Role line ("You:" or "Assistant:")
            if msg.typing_indicator {
                total_lines += 1; // Animated dots line
            } else {
                for line in msg.content.lines() {
                    // Use character count, not byte length, for proper UTF-8 handling
                    let char_count = line.chars().count();
                    if char_count == 0 {
                        total_lines += 1; // Empty line still takes one line
                    } else {
                        total_lines += ((char_count / wrap_width) + 1) as u16;
                    }
                }
            }
            total_lines += 1; // Blank line after message
        }

        total_lines
    }
}
