//! Text input widget

use crate::input::Action;
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthChar;

/// Multi-line text input widget
#[derive(Debug, Default)]
pub struct InputBox {
    /// Current input text, lines separated by '\n'
    content: String,
    /// Cursor position (character index, not byte index)
    cursor: usize,
    /// Placeholder text
    placeholder: String,
    /// Whether the input is focused
    focused: bool,
}

impl InputBox {
    /// Create a new input box
    pub fn new() -> Self {
        Self::default()
    }

    /// Set placeholder text
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Set focus state
    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Get the current content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Set the content, cursor at the end
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.cursor = self.content.chars().count();
    }

    /// Clear the content
    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    /// Number of lines in the draft (at least 1)
    pub fn line_count(&self) -> usize {
        self.content.split('\n').count()
    }

    /// Rows needed to show the draft, borders included, capped at `max_lines` of text
    pub fn height(&self, max_lines: u16) -> u16 {
        let lines = u16::try_from(self.line_count()).unwrap_or(u16::MAX);
        lines.clamp(1, max_lines.max(1)) + 2
    }

    /// Row and column (in characters) of the cursor
    pub fn cursor_position(&self) -> (usize, usize) {
        let mut row = 0;
        let mut col = 0;
        for c in self.content.chars().take(self.cursor) {
            if c == '\n' {
                row += 1;
                col = 0;
            } else {
                col += 1;
            }
        }
        (row, col)
    }

    fn line_lengths(&self) -> Vec<usize> {
        self.content
            .split('\n')
            .map(|line| line.chars().count())
            .collect()
    }

    /// Character index of `col` on `row`, clamped to the line's end
    fn index_of(&self, row: usize, col: usize) -> usize {
        let lengths = self.line_lengths();
        let before: usize = lengths.iter().take(row).map(|len| len + 1).sum();
        before + col.min(lengths.get(row).copied().unwrap_or(0))
    }

    /// Get the byte offset for the current cursor position
    fn cursor_byte_offset(&self) -> usize {
        self.byte_offset(self.cursor)
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.content.len())
    }

    /// Handle an input action. Returns whether the draft or cursor changed.
    pub fn handle_action(&mut self, action: &Action) -> bool {
        let char_count = self.content.chars().count();
        let (row, col) = self.cursor_position();

        match action {
            Action::Char(c) => {
                self.insert_char(*c);
                true
            }
            Action::Newline => {
                self.insert_char('\n');
                true
            }
            Action::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.remove_at_cursor();
                    true
                } else {
                    false
                }
            }
            Action::Delete => {
                if self.cursor < char_count {
                    self.remove_at_cursor();
                    true
                } else {
                    false
                }
            }
            Action::Left => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    true
                } else {
                    false
                }
            }
            Action::Right => {
                if self.cursor < char_count {
                    self.cursor += 1;
                    true
                } else {
                    false
                }
            }
            Action::Up => {
                if row == 0 {
                    return false;
                }
                self.cursor = self.index_of(row - 1, col);
                true
            }
            Action::Down => {
                if row + 1 >= self.line_count() {
                    return false;
                }
                self.cursor = self.index_of(row + 1, col);
                true
            }
            Action::Home => {
                self.cursor = self.index_of(row, 0);
                true
            }
            Action::End => {
                self.cursor = self.index_of(row, usize::MAX);
                true
            }
            Action::ClearLine => {
                self.clear();
                true
            }
            Action::DeleteWord => {
                // Delete word before cursor
                let mut new_cursor = self.cursor;
                let chars: Vec<char> = self.content.chars().collect();

                // Skip trailing spaces
                while new_cursor > 0 && chars.get(new_cursor - 1) == Some(&' ') {
                    new_cursor -= 1;
                }
                // Skip word characters, stopping at line breaks
                while new_cursor > 0
                    && !matches!(chars.get(new_cursor - 1), Some(' ') | Some('\n'))
                {
                    new_cursor -= 1;
                }

                let start_byte = self.byte_offset(new_cursor);
                let end_byte = self.cursor_byte_offset();
                self.content.drain(start_byte..end_byte);
                self.cursor = new_cursor;
                true
            }
            Action::Paste(text) => {
                let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
                for c in normalized.chars() {
                    self.insert_char(c);
                }
                true
            }
            _ => false,
        }
    }

    fn insert_char(&mut self, c: char) {
        let byte_offset = self.cursor_byte_offset();
        self.content.insert(byte_offset, c);
        self.cursor += 1;
    }

    fn remove_at_cursor(&mut self) {
        let byte_offset = self.cursor_byte_offset();
        if let Some(c) = self.content[byte_offset..].chars().next() {
            self.content.drain(byte_offset..byte_offset + c.len_utf8());
        }
    }

    /// Render the input box
    pub fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(if self.focused {
                theme.accent_style()
            } else {
                theme.border_style()
            });

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let height = inner.height as usize;
        let width = inner.width as usize;
        let (row, col) = self.cursor_position();

        // Keep the cursor line and column on screen
        let first_row = (row + 1).saturating_sub(height);
        let cursor_x: usize = self
            .content
            .split('\n')
            .nth(row)
            .unwrap_or("")
            .chars()
            .take(col)
            .map(|c| c.width().unwrap_or(0))
            .sum();
        let x_offset = cursor_x.saturating_sub(width.saturating_sub(1));

        if self.content.is_empty() {
            Paragraph::new(self.placeholder.as_str())
                .style(theme.dim_style())
                .render(inner, buf);
        } else {
            let lines: Vec<Line> = self
                .content
                .split('\n')
                .skip(first_row)
                .take(height)
                .map(|line| Line::from(visible_slice(line, x_offset, width)))
                .collect();
            Paragraph::new(lines)
                .style(theme.base_style())
                .render(inner, buf);
        }

        // Render cursor if focused
        if self.focused {
            let x = cursor_x - x_offset;
            let y = row - first_row;
            if x < width && y < height {
                if let Some(cell) = buf.cell_mut((inner.x + x as u16, inner.y + y as u16)) {
                    cell.set_style(Style::default().bg(theme.accent));
                }
            }
        }
    }
}

/// The part of `line` starting at display column `skip`, at most `max` columns wide
fn visible_slice(line: &str, skip: usize, max: usize) -> String {
    let mut position = 0;
    let mut used = 0;
    let mut visible = String::new();
    for c in line.chars() {
        let w = c.width().unwrap_or(0);
        if position < skip {
            position += w;
            continue;
        }
        if used + w > max {
            break;
        }
        visible.push(c);
        used += w;
    }
    visible
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> InputBox {
        let mut input = InputBox::new();
        for c in text.chars() {
            if c == '\n' {
                input.handle_action(&Action::Newline);
            } else {
                input.handle_action(&Action::Char(c));
            }
        }
        input
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (buf.area.x..buf.area.x + buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_typing_and_newline() {
        let input = typed("hello\nworld");
        assert_eq!(input.content(), "hello\nworld");
        assert_eq!(input.line_count(), 2);
        assert_eq!(input.cursor_position(), (1, 5));
    }

    #[test]
    fn test_up_down_keep_column() {
        let mut input = typed("abcdef\nxy");
        assert!(input.handle_action(&Action::Up));
        assert_eq!(input.cursor_position(), (0, 2));
        input.handle_action(&Action::End);
        assert_eq!(input.cursor_position(), (0, 6));
        assert!(input.handle_action(&Action::Down));
        assert_eq!(input.cursor_position(), (1, 2));
        assert!(!input.handle_action(&Action::Down));
    }

    #[test]
    fn test_backspace_joins_lines() {
        let mut input = typed("ab\ncd");
        input.handle_action(&Action::Home);
        input.handle_action(&Action::Backspace);
        assert_eq!(input.content(), "abcd");
        assert_eq!(input.cursor_position(), (0, 2));
    }

    #[test]
    fn test_multibyte_edit() {
        let mut input = typed("héllo 🤔");
        input.handle_action(&Action::Backspace);
        assert_eq!(input.content(), "héllo ");
        input.handle_action(&Action::Home);
        input.handle_action(&Action::Right);
        input.handle_action(&Action::Delete);
        assert_eq!(input.content(), "hllo ");
    }

    #[test]
    fn test_delete_word_stops_at_line_break() {
        let mut input = typed("first line\nsecond word");
        input.handle_action(&Action::DeleteWord);
        assert_eq!(input.content(), "first line\nsecond ");
        input.handle_action(&Action::DeleteWord);
        assert_eq!(input.content(), "first line\n");
    }

    #[test]
    fn test_paste_normalizes_line_endings() {
        let mut input = InputBox::new();
        input.handle_action(&Action::Paste("a\r\nb\rc".into()));
        assert_eq!(input.content(), "a\nb\nc");
        assert_eq!(input.line_count(), 3);
    }

    #[test]
    fn test_clear_line_empties_draft() {
        let mut input = typed("draft");
        assert!(input.handle_action(&Action::ClearLine));
        assert_eq!(input.content(), "");
        assert_eq!(input.cursor_position(), (0, 0));
    }

    #[test]
    fn test_height_is_capped() {
        assert_eq!(InputBox::new().height(4), 3);
        assert_eq!(typed("a\nb").height(4), 4);
        assert_eq!(typed("1\n2\n3\n4\n5\n6").height(4), 6);
    }

    #[test]
    fn test_render_placeholder_when_empty() {
        let input = InputBox::new().with_placeholder("Type your question...");
        let mut buf = Buffer::empty(Rect::new(0, 0, 30, 3));
        input.render(buf.area, &mut buf, &Theme::dark());
        assert!(row_text(&buf, 1).contains("Type your question..."));
    }

    #[test]
    fn test_render_follows_cursor_line() {
        let input = typed("one\ntwo\nthree");
        // Two text rows visible: the last two lines
        let mut buf = Buffer::empty(Rect::new(0, 0, 20, 4));
        input.render(buf.area, &mut buf, &Theme::dark());
        assert!(row_text(&buf, 1).contains("two"));
        assert!(row_text(&buf, 2).contains("three"));
    }

    #[test]
    fn test_visible_slice() {
        assert_eq!(visible_slice("abcdef", 2, 3), "cde");
        assert_eq!(visible_slice("abc", 0, 10), "abc");
        assert_eq!(visible_slice("🤔x", 0, 1), "");
    }
}
