use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Instant;

use crate::config::AppConfig;
use crate::members::{fetch, Member, MemberId};
use crate::table::state::{Action, TableState};
use crate::table::{PageSize, SortField};
use crate::theme::Theme;

/// Seconds before a status message disappears
const STATUS_TIMEOUT_SECS: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Table,
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    Help,
    ConfirmDelete,
}

/// What the confirm popup will delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    Selection,
    Row(MemberId),
}

pub struct App {
    pub table: TableState,
    pub theme: Theme,
    pub focus: Focus,
    pub popup: Popup,

    // Cursor row, as an index into the visible page
    pub cursor: usize,

    // Rows-per-page choices, cycled with +/-
    pub page_sizes: Vec<PageSize>,

    pub pending_delete: Option<DeleteTarget>,

    // Status message (shown in info line, auto-clears after timeout)
    pub status_message: Option<String>,
    pub status_message_time: Option<Instant>,

    // Info line content when no status message is showing
    pub info_message: String,
}

impl App {
    /// Fetch the member list and build the initial view.
    /// A failed fetch is logged and leaves the table empty.
    pub async fn new(config: &AppConfig) -> Self {
        let members = fetch::load_members(&config.source_url).await;
        Self::with_members(config, members)
    }

    pub fn with_members(config: &AppConfig, members: Vec<Member>) -> Self {
        let info_message = format!("{} members from {}", members.len(), config.source_url);
        let mut table = TableState::new(members, config.initial_query());
        table.dense = config.dense;

        Self {
            table,
            theme: Theme::from_config(&config.theme),
            focus: Focus::Table,
            popup: Popup::None,
            cursor: 0,
            page_sizes: config.page_sizes(),
            pending_delete: None,
            status_message: None,
            status_message_time: None,
            info_message,
        }
    }

    /// Set a status message (auto-clears after a few seconds)
    fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_message_time = Some(Instant::now());
    }

    /// True while keystrokes are going into a text field, so global keys
    /// like `q` must not fire
    pub fn captures_text(&self) -> bool {
        self.focus == Focus::Search || self.table.editing().is_some()
    }

    /// Id of the row under the cursor
    pub fn cursor_id(&self) -> Option<MemberId> {
        self.table.view().rows.get(self.cursor).map(|m| m.id.clone())
    }

    fn dispatch(&mut self, action: Action) {
        self.table.update(action);
        self.clamp_cursor();
    }

    fn clamp_cursor(&mut self) {
        let len = self.table.view().rows.len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        // Popups first, then whichever text field has focus
        if self.popup != Popup::None {
            self.handle_popup_key(key);
        } else if self.focus == Focus::Search {
            self.handle_search_key(key);
        } else if self.table.editing().is_some() {
            self.handle_edit_key(key);
        } else {
            self.handle_normal_key(key);
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                let len = self.table.view().rows.len();
                if self.cursor + 1 < len {
                    self.cursor += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => self.cursor = self.cursor.saturating_sub(1),

            KeyCode::Right | KeyCode::PageDown => {
                self.dispatch(Action::NextPage);
                self.cursor = 0;
            }
            KeyCode::Left | KeyCode::PageUp => {
                self.dispatch(Action::PrevPage);
                self.cursor = 0;
            }
            KeyCode::Home => {
                self.dispatch(Action::SetPage(0));
                self.cursor = 0;
            }
            KeyCode::End => {
                let last = self.table.page_count() - 1;
                self.dispatch(Action::SetPage(last));
                self.cursor = 0;
            }

            // Selection
            KeyCode::Char(' ') => {
                if let Some(id) = self.cursor_id() {
                    self.dispatch(Action::ToggleRow(id));
                }
            }
            KeyCode::Char('a') => self.dispatch(Action::ToggleAll),

            // Delete asks first
            KeyCode::Char('d') | KeyCode::Delete => self.request_delete(),

            // Inline edit of the cursor row
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(id) = self.cursor_id() {
                    self.dispatch(Action::StartEdit(id));
                }
            }

            // Sort by column
            KeyCode::Char('1') => self.dispatch(Action::RequestSort(SortField::Name)),
            KeyCode::Char('2') => self.dispatch(Action::RequestSort(SortField::Email)),
            KeyCode::Char('3') => self.dispatch(Action::RequestSort(SortField::Role)),

            // Rows per page
            KeyCode::Char('+') | KeyCode::Char('=') => self.cycle_page_size(true),
            KeyCode::Char('-') => self.cycle_page_size(false),

            KeyCode::Char('D') => self.dispatch(Action::ToggleDense),

            KeyCode::Char('/') => self.focus = Focus::Search,
            KeyCode::Esc => {
                if !self.table.query.filter.is_empty() {
                    self.dispatch(Action::Search(String::new()));
                    self.set_status("Search cleared");
                }
            }

            KeyCode::Char('?') => self.popup = Popup::Help,

            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        let mut text = self.table.query.filter.clone();
        match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Tab | KeyCode::Down => {
                self.focus = Focus::Table;
                return;
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => text.clear(),
            KeyCode::Char(c) => text.push(c),
            KeyCode::Backspace => {
                text.pop();
            }
            _ => return,
        }
        self.dispatch(Action::Search(text));
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.dispatch(Action::CancelEdit);
                self.set_status("Edit cancelled");
            }
            KeyCode::Enter => {
                self.dispatch(Action::SaveEdit);
                self.set_status("Saved");
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(focus) = self.table.editing().map(|s| s.focus) {
                    self.dispatch(Action::EditSet(focus, String::new()));
                }
            }
            KeyCode::Tab => self.dispatch(Action::EditNextField),
            KeyCode::BackTab => self.dispatch(Action::EditPrevField),
            KeyCode::Backspace => self.dispatch(Action::EditBackspace),
            KeyCode::Char(c) => self.dispatch(Action::EditInput(c)),
            _ => {}
        }
    }

    fn handle_popup_key(&mut self, key: KeyEvent) {
        match self.popup {
            Popup::Help => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Enter | KeyCode::Char('q')) {
                    self.popup = Popup::None;
                }
            }
            Popup::ConfirmDelete => match key.code {
                KeyCode::Char('y') | KeyCode::Enter => {
                    self.confirm_delete();
                    self.popup = Popup::None;
                }
                KeyCode::Char('n') | KeyCode::Esc => {
                    self.pending_delete = None;
                    self.popup = Popup::None;
                }
                _ => {}
            },
            Popup::None => {}
        }
    }

    /// Delete the selection, or the cursor row when nothing is selected
    fn request_delete(&mut self) {
        let target = if !self.table.selection.is_empty() {
            DeleteTarget::Selection
        } else if let Some(id) = self.cursor_id() {
            DeleteTarget::Row(id)
        } else {
            return;
        };

        let prompt = match &target {
            DeleteTarget::Selection => format!("Delete {} selected? (y/n)", self.table.selection.len()),
            DeleteTarget::Row(id) => {
                let name = self
                    .table
                    .members()
                    .iter()
                    .find(|m| &m.id == id)
                    .map(|m| m.name.as_str())
                    .unwrap_or("row");
                format!("Delete '{}'? (y/n)", name)
            }
        };

        self.pending_delete = Some(target);
        self.set_status(prompt);
        self.popup = Popup::ConfirmDelete;
    }

    fn confirm_delete(&mut self) {
        let before = self.table.members().len();
        match self.pending_delete.take() {
            Some(DeleteTarget::Selection) => self.dispatch(Action::DeleteSelected),
            Some(DeleteTarget::Row(id)) => self.dispatch(Action::DeleteRow(id)),
            None => return,
        }
        let removed = before - self.table.members().len();
        self.set_status(format!("Deleted {}", removed));
    }

    fn cycle_page_size(&mut self, forward: bool) {
        if self.page_sizes.is_empty() {
            return;
        }
        let len = self.page_sizes.len();
        let next = match self.page_sizes.iter().position(|s| *s == self.table.query.page_size) {
            Some(i) if forward => (i + 1) % len,
            Some(i) => (i + len - 1) % len,
            None => 0,
        };
        let size = self.page_sizes[next];
        self.dispatch(Action::SetPageSize(size));
        self.cursor = 0;
        self.set_status(format!("Rows per page: {}", size));
    }

    pub fn tick(&mut self) {
        if let Some(time) = self.status_message_time {
            if time.elapsed().as_secs() >= STATUS_TIMEOUT_SECS {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::members::member;
    use crate::table::state::Mode;
    use crate::table::SortDirection;

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn app() -> App {
        let members = vec![
            member("1", "Aaron Miles", "aaron@mailinator.com", "member"),
            member("2", "Aishwarya Naik", "aishwarya@mailinator.com", "member"),
            member("3", "Arvind Kumar", "arvind@mailinator.com", "admin"),
            member("4", "Caterina Binotto", "caterina@mailinator.com", "member"),
            member("5", "Chetan Kumar", "chetan@mailinator.com", "member"),
            member("6", "Jim McClain", "jim@mailinator.com", "member"),
            member("7", "Mahaveer Singh", "mahaveer@mailinator.com", "member"),
        ];
        App::with_members(&AppConfig::default(), members)
    }

    #[test]
    fn test_search_typing() {
        let mut app = app();
        press(&mut app, KeyCode::Char('/'));
        assert!(app.captures_text());

        type_str(&mut app, "kum");
        assert_eq!(app.table.query.filter, "kum");
        assert_eq!(app.table.view().total, 2);

        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.table.query.filter, "ku");

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.focus, Focus::Table);

        press(&mut app, KeyCode::Esc);
        assert!(app.table.query.filter.is_empty(), "Esc clears the search");
    }

    #[test]
    fn test_cursor_stays_on_page() {
        let mut app = app();
        for _ in 0..10 {
            press(&mut app, KeyCode::Down);
        }
        assert_eq!(app.cursor, 4, "Default page holds five rows");

        press(&mut app, KeyCode::Right);
        assert_eq!(app.table.query.page, 1);
        assert_eq!(app.cursor, 0);

        press(&mut app, KeyCode::Right);
        assert_eq!(app.table.query.page, 1, "No page past the last one");
    }

    #[test]
    fn test_space_toggles_cursor_row() {
        let mut app = app();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char(' '));

        assert!(app.table.selection.contains("2"));
    }

    #[test]
    fn test_delete_selection_with_confirm() {
        let mut app = app();
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.popup, Popup::ConfirmDelete);
        assert_eq!(app.pending_delete, Some(DeleteTarget::Selection));

        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.popup, Popup::None);
        assert_eq!(app.table.members().len(), 5);
        assert!(app.table.selection.is_empty());
    }

    #[test]
    fn test_delete_cancelled() {
        let mut app = app();
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.pending_delete, Some(DeleteTarget::Row("1".to_string())));

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.table.members().len(), 7);
        assert!(app.pending_delete.is_none());
    }

    #[test]
    fn test_delete_last_row_on_page_moves_cursor() {
        let mut app = app();
        for _ in 0..4 {
            press(&mut app, KeyCode::Down);
        }
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.cursor, 1);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn test_inline_edit_flow() {
        let mut app = app();
        press(&mut app, KeyCode::Char('e'));
        assert!(app.table.is_editing("1"));
        assert!(app.captures_text());

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        for _ in 0.."member".len() {
            press(&mut app, KeyCode::Backspace);
        }
        type_str(&mut app, "admin");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.table.mode, Mode::Viewing);
        assert_eq!(app.table.members()[0].role, "admin");
        assert_eq!(app.status_message.as_deref(), Some("Saved"));
    }

    #[test]
    fn test_q_is_text_while_editing() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('q'));
        press(&mut app, KeyCode::Esc);

        assert_eq!(app.table.members()[0].name, "Aaron Miles");
        assert_eq!(app.table.mode, Mode::Viewing);
    }

    #[test]
    fn test_sort_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.table.query.direction, SortDirection::Descending);

        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.table.query.sort_field, SortField::Role);
        assert_eq!(app.table.view().rows[0].id, "3", "admin sorts first");
    }

    #[test]
    fn test_page_size_cycle() {
        let mut app = app();
        press(&mut app, KeyCode::Char('+'));
        assert_eq!(app.table.query.page_size, PageSize::Rows(10));

        press(&mut app, KeyCode::Char('+'));
        press(&mut app, KeyCode::Char('+'));
        assert_eq!(app.table.query.page_size, PageSize::All);

        press(&mut app, KeyCode::Char('+'));
        assert_eq!(app.table.query.page_size, PageSize::Rows(5), "Wraps around");

        press(&mut app, KeyCode::Char('-'));
        assert_eq!(app.table.query.page_size, PageSize::All);
    }

    #[test]
    fn test_help_popup() {
        let mut app = app();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.popup, Popup::Help);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.popup, Popup::None);
    }
}
