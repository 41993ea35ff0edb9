//! Application state for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::{DraftEvent, DraftField};
use crate::service::{BoardService, CommandSink};
use crate::ws::ClientEvent;

/// Which widget receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// One of the form inputs.
    Field(DraftField),
    /// The submit button.
    Submit,
    /// The event list.
    List,
}

impl Focus {
    const ORDER: [Self; 7] = [
        Self::Field(DraftField::Title),
        Self::Field(DraftField::Date),
        Self::Field(DraftField::Time),
        Self::Field(DraftField::Location),
        Self::Field(DraftField::Attendees),
        Self::Submit,
        Self::List,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        let i = (self.index() + 1) % Self::ORDER.len();
        Self::ORDER.get(i).copied().unwrap_or(self)
    }

    fn prev(self) -> Self {
        let len = Self::ORDER.len();
        let i = (self.index() + len - 1) % len;
        Self::ORDER.get(i).copied().unwrap_or(self)
    }
}

/// Top-level application state.
#[derive(Debug)]
pub struct App<S> {
    /// Board state and command sender.
    pub board: BoardService<S>,
    /// Add-event form.
    pub draft: DraftEvent,
    /// Focused widget.
    pub focus: Focus,
    /// Selected index in the event list.
    pub selected: usize,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl<S: CommandSink> App<S> {
    /// Creates the app around a board.
    pub fn new(board: BoardService<S>) -> Self {
        Self {
            board,
            draft: DraftEvent::default(),
            focus: Focus::Field(DraftField::Title),
            selected: 0,
            should_quit: false,
        }
    }

    /// Whether the submit button is enabled.
    pub fn can_submit(&self) -> bool {
        self.board.status().is_connected()
    }

    /// Applies an event from the connection task.
    pub fn on_client_event(&mut self, event: ClientEvent) {
        self.board.handle_client_event(event);
        self.clamp_selection();
    }

    /// Drops expired notifications.
    pub fn tick(&mut self) {
        self.board.tick();
    }

    /// Handles one key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        if key.code == KeyCode::Esc
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
        {
            self.should_quit = true;
            return;
        }
        match key.code {
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.prev(),
            _ => match self.focus {
                Focus::Field(field) => self.edit_field(field, key.code),
                Focus::Submit => {
                    if key.code == KeyCode::Enter {
                        self.submit();
                    }
                }
                Focus::List => self.navigate_list(key.code),
            },
        }
    }

    fn edit_field(&mut self, field: DraftField, code: KeyCode) {
        match code {
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => {
                self.draft.field_mut(field).pop();
            }
            KeyCode::Char(c) => self.draft.field_mut(field).push(c),
            _ => {}
        }
    }

    fn navigate_list(&mut self, code: KeyCode) {
        let len = self.board.events().len();
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < len {
                    self.selected += 1;
                }
            }
            KeyCode::Delete | KeyCode::Char('d') => self.delete_selected(),
            _ => {}
        }
    }

    /// Submits the form. Does nothing while the button is disabled.
    pub fn submit(&mut self) {
        if !self.can_submit() {
            return;
        }
        if self.board.add_event(&mut self.draft).is_ok() {
            self.focus = Focus::Field(DraftField::Title);
        }
    }

    /// Requests deletion of the selected record.
    pub fn delete_selected(&mut self) {
        let Some(id) = self
            .board
            .events()
            .as_slice()
            .get(self.selected)
            .map(|e| e.id.clone())
        else {
            return;
        };
        self.board.delete_event(&id);
    }

    fn clamp_selection(&mut self) {
        let len = self.board.events().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::domain::EventId;
    use crate::service::board_service::tests::{RecordingSink, record};
    use crate::ws::{ClientCommand, ServerPush};

    fn app(sink: RecordingSink) -> App<RecordingSink> {
        App::new(BoardService::new(sink, Duration::from_secs(60)))
    }

    fn press(app: &mut App<RecordingSink>, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App<RecordingSink>, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[tokio::test]
    async fn typing_fills_fields_in_tab_order() {
        let mut app = app(RecordingSink::connected());
        type_text(&mut app, "Standup");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "2024-01-01");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "09:00");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "Room 1");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "55");
        press(&mut app, KeyCode::Backspace);

        assert_eq!(app.draft.title, "Standup");
        assert_eq!(app.draft.date, "2024-01-01");
        assert_eq!(app.draft.time, "09:00");
        assert_eq!(app.draft.location, "Room 1");
        assert_eq!(app.draft.attendees, "5");
    }

    #[tokio::test]
    async fn enter_submits_when_connected() {
        let mut app = app(RecordingSink::connected());
        app.on_client_event(ClientEvent::Connected);
        app.draft = DraftEvent {
            title: "Standup".to_string(),
            date: "2024-01-01".to_string(),
            time: "09:00".to_string(),
            location: "Room 1".to_string(),
            attendees: "5".to_string(),
        };
        app.focus = Focus::Field(DraftField::Location);

        press(&mut app, KeyCode::Enter);

        assert_eq!(app.board.sink().sent.borrow().len(), 1);
        assert_eq!(app.draft, DraftEvent::default());
        assert_eq!(app.focus, Focus::Field(DraftField::Title));
    }

    #[tokio::test]
    async fn submit_is_disabled_until_connected() {
        let mut app = app(RecordingSink::connected());
        app.focus = Focus::Submit;
        press(&mut app, KeyCode::Enter);
        assert!(app.board.sink().sent.borrow().is_empty());
        assert!(app.board.notifications().is_empty());
    }

    #[tokio::test]
    async fn focus_wraps_both_ways() {
        let mut app = app(RecordingSink::default());
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focus, Focus::List);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::Field(DraftField::Title));
    }

    #[tokio::test]
    async fn list_selection_and_delete() {
        let mut app = app(RecordingSink::connected());
        app.on_client_event(ClientEvent::Connected);
        app.on_client_event(ClientEvent::Push(ServerPush::InitialEvents(vec![
            record(1, "A"),
            record(2, "B"),
        ])));
        app.focus = Focus::List;

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected, 1);
        press(&mut app, KeyCode::Char('d'));

        assert_eq!(
            *app.board.sink().sent.borrow(),
            vec![ClientCommand::DeleteEvent(EventId::Number(2))]
        );
    }

    #[tokio::test]
    async fn selection_follows_shrinking_list() {
        let mut app = app(RecordingSink::connected());
        app.on_client_event(ClientEvent::Push(ServerPush::InitialEvents(vec![
            record(1, "A"),
            record(2, "B"),
        ])));
        app.selected = 1;
        app.on_client_event(ClientEvent::Push(ServerPush::EventDeleted(EventId::Number(2))));
        assert_eq!(app.selected, 0);
    }

    #[tokio::test]
    async fn escape_and_ctrl_c_quit() {
        let mut by_escape = app(RecordingSink::default());
        press(&mut by_escape, KeyCode::Esc);
        assert!(by_escape.should_quit);

        let mut by_ctrl_c = app(RecordingSink::default());
        by_ctrl_c.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(by_ctrl_c.should_quit);
        assert!(by_ctrl_c.draft.title.is_empty());
    }
}
