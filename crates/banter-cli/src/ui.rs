//! TUI implementation for banter

use banter_api::{CompletionClient, CompletionOutcome};
use banter_chat::{ChatEvent, ChatSession, Message, PendingTurn, Role};
use banter_tui::{
    App, Theme,
    input::{Action, event_to_action},
    widgets::{
        InputBox, MessageList, Spinner,
        message_list::{ChatMessage, calculate_message_height},
    },
};
use chrono::Datelike;
use crossterm::event::EventStream;
use futures::{FutureExt, StreamExt, future::BoxFuture};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::broadcast;

const TITLE: &str = "Azure OpenAI Chat";
const INPUT_PLACEHOLDER: &str = "Type your question...";
const MAX_INPUT_LINES: u16 = 6;

/// What the event loop should do after a key press
enum Flow {
    Continue,
    /// A turn was reserved; start its request
    Send(PendingTurn),
    Quit,
}

/// TUI application state
pub struct TuiState {
    /// Conversation and client
    session: ChatSession,
    /// Input box
    input: InputBox,
    /// Current scroll position
    scroll: usize,
    /// Theme
    theme: Theme,
    /// Spinner start time for animation
    spinner_start: Instant,
}

impl TuiState {
    pub fn new(session: ChatSession, theme: Theme) -> Self {
        let mut input = InputBox::new().with_placeholder(INPUT_PLACEHOLDER);
        input.set_focused(true);

        Self {
            session,
            input,
            scroll: 0,
            theme,
            spinner_start: Instant::now(),
        }
    }

    /// React to a committed conversation change
    fn handle_chat_event(&mut self, event: ChatEvent) {
        tracing::debug!("Chat event for slot {}", event.slot());
        if event.is_terminal() {
            // Draft is cleared once the turn settles, whatever the outcome
            self.input.clear();
        } else {
            self.spinner_start = Instant::now();
        }
        self.scroll_to_bottom();
    }

    fn scroll_to_bottom(&mut self) {
        // Will be calculated during render based on content height
        self.scroll = usize::MAX;
    }

    /// Handle keyboard action
    fn handle_action(&mut self, action: Action) -> Flow {
        match action {
            Action::Submit => match self.session.begin(self.input.content()) {
                Some(turn) => Flow::Send(turn),
                None => Flow::Continue,
            },
            Action::Quit | Action::Interrupt => Flow::Quit,
            Action::PageUp => {
                self.scroll = self.scroll.saturating_sub(10);
                Flow::Continue
            }
            Action::PageDown => {
                self.scroll = self.scroll.saturating_add(10);
                Flow::Continue
            }
            _ => {
                self.input.handle_action(&action);
                Flow::Continue
            }
        }
    }

    /// Messages as the list widget shows them
    fn chat_messages(&self) -> Vec<ChatMessage> {
        self.session
            .conversation()
            .messages()
            .iter()
            .map(to_chat_message)
            .collect()
    }

    /// Render the UI
    pub fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();
        let banner_height = u16::from(self.session.conversation().last_error().is_some());

        // Layout: title (1), messages (flex), banner (0-1), status (1), input, footer (1)
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(banner_height),
                Constraint::Length(1),
                Constraint::Length(self.input.height(MAX_INPUT_LINES)),
                Constraint::Length(1),
            ])
            .split(size);

        self.render_title(frame, chunks[0]);
        self.render_messages(frame, chunks[1]);
        self.render_banner(frame, chunks[2]);
        self.render_status(frame, chunks[3]);
        self.input
            .render(chunks[4], frame.buffer_mut(), &self.theme);
        self.render_footer(frame, chunks[5]);
    }

    fn render_title(&self, frame: &mut Frame, area: Rect) {
        let left = vec![
            Span::styled(format!(" {} ", TITLE), self.theme.accent_bold()),
            Span::styled(
                " Single Turn ",
                self.theme.dim_style().add_modifier(Modifier::REVERSED),
            ),
        ];
        let right = vec![Span::styled("Guest ", self.theme.dim_style())];
        frame.render_widget(Paragraph::new(spread(left, right, area.width)), area);
    }

    fn render_messages(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_style());

        let inner = block.inner(area);
        frame.render_widget(block, area);

        if inner.height == 0 {
            return;
        }

        let messages = self.chat_messages();

        // Calculate scroll
        let content_height = calculate_message_height(&messages, inner.width as usize);
        if self.scroll == usize::MAX {
            // Auto-scroll to bottom
            self.scroll = content_height.saturating_sub(inner.height as usize);
        } else {
            // Clamp scroll
            self.scroll = self
                .scroll
                .min(content_height.saturating_sub(inner.height as usize));
        }

        let message_list = MessageList::new(&messages, &self.theme).scroll(self.scroll);
        frame.render_widget(message_list, inner);

        // Render scrollbar if content overflows
        if content_height > inner.height as usize {
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓"))
                .track_symbol(Some("│"))
                .thumb_symbol("█");

            let mut scrollbar_state = ScrollbarState::new(content_height)
                .position(self.scroll)
                .viewport_content_length(inner.height as usize);

            frame.render_stateful_widget(scrollbar, inner, &mut scrollbar_state);
        }
    }

    fn render_banner(&self, frame: &mut Frame, area: Rect) {
        if let Some(error) = self.session.conversation().last_error() {
            let banner = Paragraph::new(Line::from(Span::styled(
                format!(" ⚠ {}", error),
                self.theme.error_style(),
            )));
            frame.render_widget(banner, area);
        }
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let conversation = self.session.conversation();
        if conversation.is_in_flight() {
            let spinner =
                Spinner::new("Sending…", &self.theme).with_start_time(self.spinner_start);
            frame.render_widget(spinner, area);
            return;
        }

        let status = match conversation.last_usage() {
            Some(usage) => format!(
                "Ready │ {} chars in, {} chars out",
                usage.prompt_chars, usage.response_chars
            ),
            None => "Ready".to_string(),
        };
        let line = Line::from(Span::styled(status, self.theme.dim_style()));
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let year = chrono::Local::now().year();
        let left = vec![Span::styled(
            format!("Azure OpenAI Text Generation · © {}", year),
            self.theme.dim_style(),
        )];
        let right = vec![Span::styled(
            "Enter: send │ Shift+Enter: newline │ Ctrl+Q: quit",
            self.theme.dim_style(),
        )];
        frame.render_widget(Paragraph::new(spread(left, right, area.width)), area);
    }
}

fn to_chat_message(message: &Message) -> ChatMessage {
    let base = match message.role {
        Role::User => ChatMessage::user(message.content.clone()),
        Role::Assistant => ChatMessage::assistant(message.content.clone()),
    };
    base.at(message.time_label())
        .error(message.is_error)
        .pending(message.pending)
}

/// Left and right spans on one line, the right part dropped if it does not fit
fn spread<'a>(mut left: Vec<Span<'a>>, right: Vec<Span<'a>>, width: u16) -> Line<'a> {
    let left_width: usize = left.iter().map(Span::width).sum();
    let right_width: usize = right.iter().map(Span::width).sum();
    let available = width as usize;

    if left_width + right_width + 2 <= available {
        left.push(Span::raw(" ".repeat(available - left_width - right_width)));
        left.extend(right);
    }
    Line::from(left)
}

/// Start the request for a reserved turn without borrowing the session
fn dispatch(
    client: Arc<dyn CompletionClient>,
    prompt: String,
) -> BoxFuture<'static, CompletionOutcome> {
    async move { client.complete(&prompt).await }.boxed()
}

fn drain_events(state: &mut TuiState, chat_rx: &mut broadcast::Receiver<ChatEvent>) {
    while let Ok(event) = chat_rx.try_recv() {
        state.handle_chat_event(event);
    }
}

/// Run the TUI application
pub async fn run_tui(session: ChatSession, theme: Theme) -> anyhow::Result<()> {
    let mut app = App::new()?.with_theme(theme);

    let mut state = TuiState::new(session, app.theme().clone());
    let mut chat_rx = state.session.subscribe();

    // Event stream
    let mut event_stream = EventStream::new();

    // Tick interval for animations
    let mut tick_interval = tokio::time::interval(app.tick_rate());

    // The outstanding request, if any, and the turn it will settle
    let mut request: Option<(PendingTurn, BoxFuture<'static, CompletionOutcome>)> = None;

    loop {
        drain_events(&mut state, &mut chat_rx);
        app.draw(|frame| state.render(frame))?;

        tokio::select! {
            outcome = async {
                match request.as_mut() {
                    Some((_, future)) => future.await,
                    None => std::future::pending().await,
                }
            }, if request.is_some() => {
                if let Some((turn, _)) = request.take() {
                    state.session.settle(turn, outcome);
                }
            }

            // Input keeps working while a request is outstanding
            event = event_stream.next() => {
                match event {
                    Some(Ok(event)) => {
                        let Some(action) = event_to_action(event) else {
                            continue;
                        };
                        match state.handle_action(action) {
                            Flow::Continue => {}
                            Flow::Send(turn) => {
                                let future =
                                    dispatch(state.session.client(), turn.prompt().to_string());
                                request = Some((turn, future));
                            }
                            Flow::Quit => break,
                        }
                    }
                    Some(Err(e)) => {
                        return Err(anyhow::anyhow!("Event error: {}", e));
                    }
                    None => break,
                }
            }

            // Tick for animations (spinner updates)
            _ = tick_interval.tick() => {}
        }
    }

    Ok(())
}
