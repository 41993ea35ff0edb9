//! Ratatui rendering for the TUI.

use chrono::Local;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, List, ListItem, ListState, Paragraph};

use super::app::{App, Focus};
use crate::domain::{ConnectionStatus, DraftField, EventRecord};
use crate::service::CommandSink;

/// Placeholder shown instead of an empty event list.
pub const EMPTY_PLACEHOLDER: &str = "No events scheduled yet";

const NOTIFICATION_WIDTH: u16 = 44;
const NOTIFICATION_HEIGHT: u16 = 3;

/// Draws the whole screen.
pub fn draw<S: CommandSink>(frame: &mut Frame, app: &App<S>) {
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(3), // title + status
        Constraint::Min(8),    // form + list
        Constraint::Length(1), // key hints
    ])
    .areas(frame.area());

    draw_header(frame, app.board.status(), header);

    let [form, list] =
        Layout::horizontal([Constraint::Ratio(1, 3), Constraint::Ratio(2, 3)]).areas(body);
    draw_form(frame, app, form);
    draw_events(frame, app, list);
    draw_footer(frame, footer);

    // Overlay: notification stack
    draw_notifications(frame, app);
}

fn status_color(status: ConnectionStatus) -> Color {
    match status {
        ConnectionStatus::Connected => Color::Green,
        ConnectionStatus::Connecting => Color::Yellow,
        ConnectionStatus::Disconnected => Color::Red,
    }
}

fn draw_header(frame: &mut Frame, status: ConnectionStatus, area: Rect) {
    let block = Block::bordered().border_style(Style::default().fg(Color::Magenta));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [title, indicator] =
        Layout::horizontal([Constraint::Min(10), Constraint::Length(16)]).areas(inner);

    let heading = Paragraph::new(Line::from(vec![
        Span::styled(
            "Realtime Event Board",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled("  live event list", Style::default().fg(Color::DarkGray)),
    ]));
    frame.render_widget(heading, title);

    let dot = Paragraph::new(Line::from(vec![
        Span::styled("● ", Style::default().fg(status_color(status))),
        Span::styled(
            status.as_str(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
    ]))
    .alignment(Alignment::Right);
    frame.render_widget(dot, indicator);
}

fn draw_form<S: CommandSink>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let block = Block::bordered()
        .title(" Add Event ")
        .border_style(Style::default().fg(Color::Magenta));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [title, date, time, location, attendees, submit, _rest] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Min(0),
    ])
    .areas(inner);

    let inputs = [title, date, time, location, attendees];
    for (field, rect) in DraftField::ALL.into_iter().zip(inputs) {
        draw_input(frame, app, field, rect);
    }
    draw_submit(frame, app, submit);
}

fn draw_input<S: CommandSink>(frame: &mut Frame, app: &App<S>, field: DraftField, area: Rect) {
    let focused = app.focus == Focus::Field(field);
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let mut text = app.draft.field(field).to_string();
    if focused {
        text.push('▏');
    }
    let input = Paragraph::new(text)
        .style(Style::default().fg(Color::White))
        .block(Block::bordered().title(field.label()).border_style(border));
    frame.render_widget(input, area);
}

fn draw_submit<S: CommandSink>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let enabled = app.can_submit();
    let label = if enabled { "Add Event" } else { "Connecting..." };
    let mut style = if enabled {
        Style::default()
            .fg(Color::White)
            .bg(Color::Magenta)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    if app.focus == Focus::Submit {
        style = style.add_modifier(Modifier::REVERSED);
    }
    let button = Paragraph::new(label)
        .alignment(Alignment::Center)
        .style(style)
        .block(Block::bordered().border_style(Style::default().fg(Color::DarkGray)));
    frame.render_widget(button, area);
}

fn event_item(record: &EventRecord) -> ListItem<'static> {
    let dim = Style::default().fg(Color::DarkGray);
    let updated = record
        .timestamp
        .with_timezone(&Local)
        .format("%H:%M:%S")
        .to_string();
    ListItem::new(vec![
        Line::from(Span::styled(
            record.title.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("  Date  ", Style::default().fg(Color::LightMagenta)),
            Span::raw(record.display_date()),
            Span::styled("   Time  ", Style::default().fg(Color::LightBlue)),
            Span::raw(record.display_time()),
        ]),
        Line::from(vec![
            Span::styled("  Where ", Style::default().fg(Color::Blue)),
            Span::raw(record.location.clone()),
            Span::styled("   ", dim),
            Span::styled(
                format!("{} attendees", record.attendees),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(format!("  Live update • {updated}"), dim)),
        Line::from(""),
    ])
}

fn draw_events<S: CommandSink>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let focused = app.focus == Focus::List;
    let border = if focused { Color::Cyan } else { Color::Magenta };
    let block = Block::bordered()
        .title(format!(" Events ({}) ", app.board.events().len()))
        .border_style(Style::default().fg(border));

    if app.board.events().is_empty() {
        let placeholder = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                EMPTY_PLACEHOLDER,
                Style::default().fg(Color::Gray),
            )),
        ])
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let list = List::new(app.board.events().iter().map(event_item))
        .block(block)
        .highlight_symbol(if focused { "▶ " } else { "  " })
        .highlight_style(if focused {
            Style::default().bg(Color::DarkGray)
        } else {
            Style::default()
        });
    let mut state = ListState::default().with_selected(Some(app.selected));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_footer(frame: &mut Frame, area: Rect) {
    let hints = Paragraph::new(Line::from(Span::styled(
        " Tab/Shift-Tab focus · Enter submit · ↑/↓ select · d delete · Esc quit",
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(hints, area);
}

fn draw_notifications<S: CommandSink>(frame: &mut Frame, app: &App<S>) {
    let area = frame.area();
    let width = NOTIFICATION_WIDTH.min(area.width);
    let x = area.right().saturating_sub(width + 1);
    let mut y = area.y + 1;

    for notification in app.board.notifications().iter() {
        if y + NOTIFICATION_HEIGHT > area.bottom() {
            break;
        }
        let rect = Rect::new(x, y, width, NOTIFICATION_HEIGHT);
        frame.render_widget(Clear, rect);
        let toast = Paragraph::new(Line::from(vec![
            Span::styled("⚡ ", Style::default().fg(Color::Yellow)),
            Span::styled(
                notification.message.as_str(),
                Style::default().fg(Color::Black),
            ),
        ]))
        .style(Style::default().bg(Color::White))
        .block(Block::bordered().border_style(Style::default().fg(Color::Gray)));
        frame.render_widget(toast, rect);
        y += NOTIFICATION_HEIGHT;
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::time::Duration;

    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::service::BoardService;
    use crate::service::board_service::tests::{RecordingSink, record};
    use crate::ws::{ClientEvent, ServerPush};

    fn render(app: &App<RecordingSink>) -> String {
        let Ok(mut terminal) = Terminal::new(TestBackend::new(120, 40)) else {
            panic!("test terminal");
        };
        if let Err(e) = terminal.draw(|f| draw(f, app)) {
            panic!("draw failed: {e}");
        }
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn app() -> App<RecordingSink> {
        App::new(BoardService::new(
            RecordingSink::connected(),
            Duration::from_secs(60),
        ))
    }

    #[tokio::test]
    async fn empty_list_shows_placeholder_and_connecting_button() {
        let screen = render(&app());
        assert!(screen.contains(EMPTY_PLACEHOLDER));
        assert!(screen.contains("Connecting..."));
        assert!(screen.contains("connecting"));
    }

    #[tokio::test]
    async fn connected_board_renders_records_and_notification() {
        let mut app = app();
        app.on_client_event(ClientEvent::Connected);
        app.on_client_event(ClientEvent::Push(ServerPush::InitialEvents(vec![
            record(1, "Standup"),
            record(2, "Retro"),
        ])));

        let screen = render(&app);

        assert!(!screen.contains(EMPTY_PLACEHOLDER));
        assert!(!screen.contains("Connecting..."));
        assert!(screen.contains("Standup"));
        assert!(screen.contains("Retro"));
        assert!(screen.contains("Monday, 1 Jan 2024"));
        assert!(screen.contains("3 attendees"));
        assert!(screen.contains("Events loaded successfully"));
    }

    #[tokio::test]
    async fn draft_text_is_visible() {
        let mut app = app();
        app.draft.location = "Room 42".to_string();
        let screen = render(&app);
        assert!(screen.contains("Room 42"));
    }
}
