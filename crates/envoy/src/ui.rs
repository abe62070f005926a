use std::io::stdout;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use chatbox_shared::Sender;
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyCode, KeyEvent,
    KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use futures_util::StreamExt;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use ratatui::{DefaultTerminal, Frame};
use tracing::info;

use crate::client::ApiClient;
use crate::view::{lock, ConversationView, InputField, MessageList, TextInput};
use crate::widget::{ChatWidget, Trigger};

const REDRAW_INTERVAL: Duration = Duration::from_millis(100);

pub async fn single_message(client: ApiClient, message: String) -> Result<()> {
    let view = Arc::new(Mutex::new(MessageList::new()));
    let input = Arc::new(Mutex::new(TextInput::with_value(message)));
    let widget = ChatWidget::mount(Arc::clone(&view), input, client);

    if let Some(request) = widget.send() {
        request.await?;
    }

    for node in lock(&view).nodes() {
        if node.sender() == Sender::Bot {
            println!("{}", node.text());
        }
    }
    Ok(())
}

pub async fn interactive_chat(client: ApiClient) -> Result<()> {
    info!(server = client.base_url(), "starting interactive chat");

    let view = Arc::new(Mutex::new(MessageList::new()));
    let input = Arc::new(Mutex::new(TextInput::new()));
    let widget = ChatWidget::mount(view, input, client);

    let mut terminal = ratatui::init();
    execute!(stdout(), EnableMouseCapture)?;

    let result = run(&mut terminal, &widget).await;

    let _ = execute!(stdout(), DisableMouseCapture);
    ratatui::restore();
    result
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

async fn run(
    terminal: &mut DefaultTerminal,
    widget: &ChatWidget<MessageList, TextInput>,
) -> Result<()> {
    let mut events = EventStream::new();
    let mut redraw = tokio::time::interval(REDRAW_INTERVAL);
    let mut send_button = Rect::default();

    loop {
        terminal.draw(|frame| send_button = draw(frame, widget))?;

        tokio::select! {
            _ = redraw.tick() => {}
            event = events.next() => match event {
                Some(Ok(event)) => {
                    if handle_event(event, widget, send_button) == Flow::Quit {
                        break;
                    }
                }
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
        }
    }

    Ok(())
}

fn handle_event(
    event: Event,
    widget: &ChatWidget<MessageList, TextInput>,
    send_button: Rect,
) -> Flow {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(key, widget),
        Event::Mouse(mouse) => {
            handle_mouse(mouse, widget, send_button);
            Flow::Continue
        }
        _ => Flow::Continue,
    }
}

fn handle_key(key: KeyEvent, widget: &ChatWidget<MessageList, TextInput>) -> Flow {
    let page = lock(widget.view()).viewport().height.max(1) as isize;

    match key.code {
        KeyCode::Esc => return Flow::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return Flow::Quit;
        }
        KeyCode::Enter => {
            // Reply lands in the view on its own; the handle is not awaited.
            let _ = widget.handle(Trigger::KeyPress(key.code));
        }
        KeyCode::PageUp => lock(widget.view()).scroll_by(-page),
        KeyCode::PageDown => lock(widget.view()).scroll_by(page),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            lock(widget.input()).insert(c);
        }
        KeyCode::Backspace => lock(widget.input()).backspace(),
        KeyCode::Delete => lock(widget.input()).delete(),
        KeyCode::Left => lock(widget.input()).move_left(),
        KeyCode::Right => lock(widget.input()).move_right(),
        KeyCode::Home => lock(widget.input()).home(),
        KeyCode::End => lock(widget.input()).end(),
        _ => {}
    }
    Flow::Continue
}

fn handle_mouse(
    mouse: MouseEvent,
    widget: &ChatWidget<MessageList, TextInput>,
    send_button: Rect,
) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left)
            if send_button.contains(Position::new(mouse.column, mouse.row)) =>
        {
            let _ = widget.handle(Trigger::SendButton);
        }
        MouseEventKind::ScrollUp => lock(widget.view()).scroll_by(-3),
        MouseEventKind::ScrollDown => lock(widget.view()).scroll_by(3),
        _ => {}
    }
}

/// Draws the widget and returns the area of the send button.
fn draw(frame: &mut Frame, widget: &ChatWidget<MessageList, TextInput>) -> Rect {
    let [messages_area, bottom] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(3)]).areas(frame.area());
    let [input_area, button_area] =
        Layout::horizontal([Constraint::Min(10), Constraint::Length(10)]).areas(bottom);

    let block = Block::bordered().title(" Chat ");
    let inner = block.inner(messages_area);

    let lines: Vec<Line> = {
        let mut view = lock(widget.view());
        view.set_viewport(inner.width, inner.height);
        view.visible_rows()
            .into_iter()
            .map(|row| {
                let color = match row.sender {
                    Sender::User => Color::Cyan,
                    Sender::Bot => Color::Green,
                };
                Line::from(vec![
                    Span::styled(row.prefix, Style::default().fg(color).add_modifier(Modifier::BOLD)),
                    Span::raw(row.text),
                ])
            })
            .collect()
    };
    frame.render_widget(Paragraph::new(lines).block(block), messages_area);

    let (shown, column) = lock(widget.input()).window(input_area.width.saturating_sub(2) as usize);
    frame.render_widget(
        Paragraph::new(shown).block(Block::bordered().title(" Message ")),
        input_area,
    );
    frame.set_cursor_position(Position::new(
        input_area.x + 1 + column as u16,
        input_area.y + 1,
    ));

    frame.render_widget(
        Paragraph::new("Send").centered().block(Block::bordered()),
        button_area,
    );

    button_area
}
