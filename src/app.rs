use anyhow::Result;
use crate::chat::{ChatMessage, ChatRole};
use crate::openai::OpenAiClient;
use crate::search::SearchClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Single-session state. Owns the transcript (append-only) and at most one
/// in-flight turn; the UI refuses new input while a turn is running.
pub struct App {
    pub should_quit: bool,
    pub input_mode: InputMode,

    // Input state
    pub input: String,
    pub cursor: usize, // cursor position in input, in chars

    // Transcript (append-only, insertion order = display order)
    pub messages: Vec<ChatMessage>,

    // Turn state
    pub loading: bool,
    pub turn_task: Option<tokio::task::JoinHandle<Result<String>>>,

    // Chat area scroll state
    pub chat_scroll: u16,
    pub chat_height: u16, // Height of chat area for scroll calculations
    pub chat_width: u16,  // Width of chat area for wrap calculations

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Service clients
    pub openai: OpenAiClient,
    pub search: SearchClient,
    pub model: String,
}

impl App {
    pub fn new(openai: OpenAiClient, search: SearchClient, model: String) -> Self {
        Self {
            should_quit: false,
            input_mode: InputMode::Editing,
            input: String::new(),
            cursor: 0,
            messages: Vec::new(),
            loading: false,
            turn_task: None,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            animation_frame: 0,
            openai,
            search,
            model,
        }
    }

    /// Append one message to the transcript. The transcript only grows.
    pub fn append(&mut self, role: ChatRole, content: String) {
        self.messages.push(ChatMessage { role, content });
    }

    /// If the in-flight turn finished, collect its answer and append it.
    /// A completion failure surfaces here as an `Err` and takes down the
    /// event loop, leaving the user message without a reply.
    pub async fn check_turn(&mut self) -> Result<()> {
        let finished = self
            .turn_task
            .as_ref()
            .map(|task| task.is_finished())
            .unwrap_or(false);

        if finished {
            if let Some(task) = self.turn_task.take() {
                let answer = task.await??;
                self.append(ChatRole::Assistant, answer);
                self.loading = false;
                self.scroll_to_bottom();
            }
        }

        Ok(())
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.loading {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    /// Scroll the transcript so the latest message (or the "Thinking..."
    /// indicator) is visible.
    pub fn scroll_to_bottom(&mut self) {
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut total_lines: u16 = 0;

        for msg in &self.messages {
            // Prefix and content share a line per spec'd transcript format,
            // so count wrapped content lines only.
            for line in msg.content.lines() {
                let char_count = line.chars().count();
                if char_count == 0 {
                    total_lines += 1;
                } else {
                    total_lines += ((char_count / wrap_width) + 1) as u16;
                }
            }
            total_lines += 1; // Blank line after message
        }

        if self.loading {
            total_lines += 2; // "Bot:" + animated ellipsis
        }

        let visible_height = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };

        if total_lines > visible_height {
            self.chat_scroll = total_lines.saturating_sub(visible_height);
        }
    }

    pub fn scroll_up(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_add(1);
    }
}
