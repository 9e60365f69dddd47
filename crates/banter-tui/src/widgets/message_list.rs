//! Message list widget for displaying chat messages

use crate::theme::Theme;
use crate::widgets::spinner::frame_at;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// A single message in the chat, as the widget sees it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Role: "user" or "assistant"
    pub role: String,
    /// Message content
    pub content: String,
    /// Creation time label (e.g. "14:05")
    pub time: String,
    /// Whether this is an error message
    pub is_error: bool,
    /// Whether this is a placeholder waiting on a response
    pub is_pending: bool,
}

impl ChatMessage {
    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
            time: String::new(),
            is_error: false,
            is_pending: false,
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
            time: String::new(),
            is_error: false,
            is_pending: false,
        }
    }

    /// Set the time label
    pub fn at(mut self, time: impl Into<String>) -> Self {
        self.time = time.into();
        self
    }

    /// Mark as an error report
    pub fn error(mut self, is_error: bool) -> Self {
        self.is_error = is_error;
        self
    }

    /// Mark as a pending placeholder
    pub fn pending(mut self, is_pending: bool) -> Self {
        self.is_pending = is_pending;
        self
    }
}

/// Widget for displaying a list of chat messages
pub struct MessageList<'a> {
    messages: &'a [ChatMessage],
    theme: &'a Theme,
    scroll: usize,
}

impl<'a> MessageList<'a> {
    /// Create a new message list
    pub fn new(messages: &'a [ChatMessage], theme: &'a Theme) -> Self {
        Self {
            messages,
            theme,
            scroll: 0,
        }
    }

    /// Set scroll offset
    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }
}

fn render_message(msg: &ChatMessage, theme: &Theme, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    // Role header with visual distinction
    let (role_text, role_style, prefix) = match msg.role.as_str() {
        "user" => ("You", theme.accent_bold(), "▶ "),
        "assistant" => (
            "AI",
            theme.success_style().add_modifier(Modifier::BOLD),
            "◀ ",
        ),
        _ => ("Unknown", theme.dim_style(), "  "),
    };

    let mut header = vec![Span::styled(format!("{}{}", prefix, role_text), role_style)];
    if !msg.time.is_empty() {
        header.push(Span::styled(format!(" · {}", msg.time), theme.dim_style()));
    }
    lines.push(Line::from(header));

    let content_width = width.saturating_sub(2).max(1);

    if msg.is_pending {
        // Time-based frame so every redraw advances the animation
        let elapsed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default();
        lines.push(Line::from(Span::styled(
            format!("  {} {}", frame_at(elapsed), msg.content),
            theme.warning_style(),
        )));
    } else {
        let content_style = if msg.is_error {
            theme.error_style()
        } else {
            theme.base_style()
        };

        for line in textwrap::wrap(&msg.content, content_width) {
            lines.push(Line::from(Span::styled(
                format!("  {}", line),
                content_style,
            )));
        }
    }

    // Empty line between messages
    lines.push(Line::from(""));

    lines
}

impl Widget for MessageList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default().borders(Borders::NONE);

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        // Render all messages into lines
        let width = inner.width as usize;
        let visible_lines: Vec<Line> = self
            .messages
            .iter()
            .flat_map(|msg| render_message(msg, self.theme, width))
            .skip(self.scroll)
            .take(inner.height as usize)
            .collect();

        Paragraph::new(visible_lines).render(inner, buf);
    }
}

/// Calculate total height of messages
pub fn calculate_message_height(messages: &[ChatMessage], width: usize) -> usize {
    let theme = Theme::dark();
    messages
        .iter()
        .map(|msg| render_message(msg, &theme, width).len())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen(messages: &[ChatMessage], width: u16, height: u16, scroll: usize) -> Vec<String> {
        let theme = Theme::dark();
        let mut buf = Buffer::empty(Rect::new(0, 0, width, height));
        MessageList::new(messages, &theme)
            .scroll(scroll)
            .render(buf.area, &mut buf);
        (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect()
    }

    #[test]
    fn test_renders_labels_and_time() {
        let messages = vec![
            ChatMessage::assistant("Ask me something about Azure OpenAI.").at("09:30"),
            ChatMessage::user("Hello").at("09:31"),
        ];
        let rows = screen(&messages, 60, 8, 0);
        assert_eq!(rows[0], "◀ AI · 09:30");
        assert_eq!(rows[1], "  Ask me something about Azure OpenAI.");
        assert_eq!(rows[3], "▶ You · 09:31");
        assert_eq!(rows[4], "  Hello");
    }

    #[test]
    fn test_pending_shows_spinner_and_text() {
        let messages = vec![ChatMessage::assistant("Thinking... 🤔").pending(true)];
        let rows = screen(&messages, 40, 3, 0);
        assert!(rows[1].contains("Thinking..."), "got: {:?}", rows);
    }

    #[test]
    fn test_multiline_content_keeps_breaks() {
        let messages = vec![ChatMessage::user("line one\nline two")];
        let rows = screen(&messages, 40, 4, 0);
        assert_eq!(rows[1], "  line one");
        assert_eq!(rows[2], "  line two");
    }

    #[test]
    fn test_height_counts_wrapped_lines() {
        let messages = vec![ChatMessage::assistant("aaaa bbbb cccc dddd")];
        // header + 2 wrapped lines at content width 10 + separator
        assert_eq!(calculate_message_height(&messages, 12), 4);
    }

    #[test]
    fn test_scroll_skips_lines() {
        let messages = vec![ChatMessage::user("first"), ChatMessage::user("second")];
        let rows = screen(&messages, 30, 2, 3);
        assert_eq!(rows[0], "▶ You");
        assert_eq!(rows[1], "  second");
    }
}
