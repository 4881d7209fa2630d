//! View state for the member table and the reducer that mutates it.
//!
//! Every user intent is an `Action`; `TableState::update` is the only place
//! the collection, selection, query or edit slot change.

use crate::members::{Member, MemberId};

use super::edit::{EditField, EditSession};
use super::selection::{Coverage, Selection};
use super::{page_count, process, Page, PageSize, Query, SortDirection, SortField};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Viewing,
    Editing(EditSession),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Search(String),
    /// Column header click: same column ascending flips to descending,
    /// anything else sorts ascending by that column
    RequestSort(SortField),
    SetPage(usize),
    NextPage,
    PrevPage,
    SetPageSize(PageSize),
    ToggleRow(MemberId),
    ToggleAll,
    DeleteSelected,
    DeleteRow(MemberId),
    StartEdit(MemberId),
    EditInput(char),
    EditBackspace,
    EditNextField,
    EditPrevField,
    EditSet(EditField, String),
    SaveEdit,
    CancelEdit,
    ToggleDense,
}

#[derive(Debug, Clone, Default)]
pub struct TableState {
    members: Vec<Member>,
    pub query: Query,
    pub selection: Selection,
    pub mode: Mode,
    pub dense: bool,
}

impl TableState {
    pub fn new(members: Vec<Member>, query: Query) -> Self {
        Self {
            members,
            query,
            ..Self::default()
        }
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// The rows to draw for the current query
    pub fn view(&self) -> Page<'_> {
        process(&self.members, &self.query)
    }

    /// Every row matching the current filter, in collection order
    pub fn filtered(&self) -> Vec<&Member> {
        super::filter(&self.members, &self.query.filter)
    }

    pub fn page_count(&self) -> usize {
        page_count(self.filtered().len(), self.query.page_size)
    }

    pub fn selection_coverage(&self) -> Coverage {
        self.selection.coverage(&self.filtered())
    }

    pub fn editing(&self) -> Option<&EditSession> {
        match &self.mode {
            Mode::Editing(session) => Some(session),
            Mode::Viewing => None,
        }
    }

    pub fn is_editing(&self, id: &str) -> bool {
        self.editing().is_some_and(|s| s.id == id)
    }

    pub fn update(&mut self, action: Action) {
        tracing::debug!("table action: {:?}", action);

        match action {
            Action::Search(text) => self.query.filter = text,
            Action::RequestSort(field) => {
                let flip = self.query.sort_field == field
                    && self.query.direction == SortDirection::Ascending;
                self.query.direction = if flip {
                    SortDirection::Descending
                } else {
                    SortDirection::Ascending
                };
                self.query.sort_field = field;
            }
            Action::SetPage(page) => self.query.page = page,
            Action::NextPage => {
                if self.query.page + 1 < self.page_count() {
                    self.query.page += 1;
                }
            }
            Action::PrevPage => self.query.page = self.query.page.saturating_sub(1),
            Action::SetPageSize(size) => {
                self.query.page_size = size;
                self.query.page = 0;
            }
            Action::ToggleRow(id) => self.selection.toggle(&id),
            Action::ToggleAll => {
                let visible = super::filter(&self.members, &self.query.filter);
                self.selection.toggle_all(&visible);
            }
            Action::DeleteSelected => {
                let doomed = self.selection.take();
                let before = self.members.len();
                self.members.retain(|m| !doomed.contains(&m.id));
                tracing::info!("Deleted {} members", before - self.members.len());
                self.drop_stale_edit();
            }
            Action::DeleteRow(id) => {
                self.members.retain(|m| m.id != id);
                self.selection.remove(&id);
                self.drop_stale_edit();
            }
            Action::StartEdit(id) => {
                if let Some(member) = self.members.iter().find(|m| m.id == id) {
                    self.mode = Mode::Editing(EditSession::start(member));
                }
            }
            Action::EditInput(c) => {
                if let Mode::Editing(session) = &mut self.mode {
                    session.push(c);
                }
            }
            Action::EditBackspace => {
                if let Mode::Editing(session) = &mut self.mode {
                    session.backspace();
                }
            }
            Action::EditNextField => {
                if let Mode::Editing(session) = &mut self.mode {
                    session.focus = session.focus.next();
                }
            }
            Action::EditPrevField => {
                if let Mode::Editing(session) = &mut self.mode {
                    session.focus = session.focus.prev();
                }
            }
            Action::EditSet(field, value) => {
                if let Mode::Editing(session) = &mut self.mode {
                    session.set(field, value);
                }
            }
            Action::SaveEdit => {
                if let Mode::Editing(session) = std::mem::take(&mut self.mode) {
                    if let Some(member) = self.members.iter_mut().find(|m| m.id == session.id) {
                        member.apply(session.draft);
                    }
                }
            }
            Action::CancelEdit => self.mode = Mode::Viewing,
            Action::ToggleDense => self.dense = !self.dense,
        }
    }

    /// Leave edit mode if the row being edited no longer exists
    fn drop_stale_edit(&mut self) {
        let stale = match &self.mode {
            Mode::Editing(session) => !self.members.iter().any(|m| m.id == session.id),
            Mode::Viewing => false,
        };
        if stale {
            self.mode = Mode::Viewing;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::members::member;
    use std::collections::HashSet;

    fn state() -> TableState {
        TableState::new(
            vec![
                member("1", "Aaron Miles", "aaron@mailinator.com", "member"),
                member("2", "Aishwarya Naik", "aishwarya@mailinator.com", "member"),
                member("3", "Arvind Kumar", "arvind@mailinator.com", "admin"),
                member("4", "Caterina Binotto", "caterina@mailinator.com", "member"),
                member("5", "Chetan Kumar", "chetan@mailinator.com", "member"),
                member("6", "Jim McClain", "jim@mailinator.com", "member"),
            ],
            Query::default(),
        )
    }

    fn id_set(state: &TableState) -> HashSet<String> {
        state.members().iter().map(|m| m.id.clone()).collect()
    }

    #[test]
    fn test_request_sort_toggles_direction() {
        let mut s = state();
        assert_eq!(s.query.sort_field, SortField::Name);

        s.update(Action::RequestSort(SortField::Name));
        assert_eq!(s.query.direction, SortDirection::Descending);

        s.update(Action::RequestSort(SortField::Name));
        assert_eq!(s.query.direction, SortDirection::Ascending);

        s.update(Action::RequestSort(SortField::Name));
        s.update(Action::RequestSort(SortField::Role));
        assert_eq!(s.query.sort_field, SortField::Role);
        assert_eq!(s.query.direction, SortDirection::Ascending, "New column starts ascending");
    }

    #[test]
    fn test_page_navigation_is_bounded() {
        let mut s = state();
        s.update(Action::SetPageSize(PageSize::Rows(4)));
        assert_eq!(s.page_count(), 2);

        s.update(Action::NextPage);
        s.update(Action::NextPage);
        assert_eq!(s.query.page, 1);
        assert_eq!(s.view().rows.len(), 2);

        s.update(Action::PrevPage);
        s.update(Action::PrevPage);
        assert_eq!(s.query.page, 0);
    }

    #[test]
    fn test_page_size_change_resets_page() {
        let mut s = state();
        s.update(Action::SetPageSize(PageSize::Rows(2)));
        s.update(Action::SetPage(2));
        s.update(Action::SetPageSize(PageSize::Rows(5)));
        assert_eq!(s.query.page, 0);
    }

    #[test]
    fn test_search_under_current_page_leaves_empty_view() {
        let mut s = state();
        s.update(Action::SetPageSize(PageSize::Rows(2)));
        s.update(Action::SetPage(2));
        s.update(Action::Search("kumar".to_string()));

        let page = s.view();
        assert!(page.rows.is_empty());
        assert_eq!(page.total, 2);
    }

    #[test]
    fn test_delete_selected() {
        let mut s = state();
        let original = id_set(&s);
        s.update(Action::ToggleRow("2".to_string()));
        s.update(Action::ToggleRow("5".to_string()));
        s.update(Action::DeleteSelected);

        let expected: HashSet<String> = original
            .into_iter()
            .filter(|id| id != "2" && id != "5")
            .collect();
        assert_eq!(id_set(&s), expected);
        assert!(s.selection.is_empty());
    }

    #[test]
    fn test_delete_row_drops_it_from_selection() {
        let mut s = state();
        s.update(Action::ToggleRow("3".to_string()));
        s.update(Action::ToggleRow("4".to_string()));
        s.update(Action::DeleteRow("3".to_string()));

        assert!(!id_set(&s).contains("3"));
        assert!(!s.selection.contains("3"));
        assert!(s.selection.contains("4"));
    }

    #[test]
    fn test_select_all_respects_filter() {
        let mut s = state();
        s.update(Action::Search("kumar".to_string()));
        s.update(Action::ToggleAll);

        assert_eq!(s.selection.len(), 2);
        assert_eq!(s.selection_coverage(), Coverage::All);

        s.update(Action::ToggleAll);
        assert!(s.selection.is_empty());
    }

    #[test]
    fn test_edit_round_trip() {
        let mut s = state();
        let before: Vec<Member> = s.members().to_vec();

        s.update(Action::StartEdit("4".to_string()));
        s.update(Action::EditSet(EditField::Name, "Caterina B.".to_string()));
        s.update(Action::EditSet(EditField::Email, "cb@mailinator.com".to_string()));
        s.update(Action::EditSet(EditField::Role, "admin".to_string()));
        s.update(Action::SaveEdit);

        assert_eq!(s.mode, Mode::Viewing);
        for (old, new) in before.iter().zip(s.members()) {
            if old.id == "4" {
                assert_eq!(new.name, "Caterina B.");
                assert_eq!(new.email, "cb@mailinator.com");
                assert_eq!(new.role, "admin");
            } else {
                assert_eq!(old, new, "Row {} should be untouched", old.id);
            }
        }
    }

    #[test]
    fn test_edit_typing_and_cancel() {
        let mut s = state();
        s.update(Action::StartEdit("1".to_string()));
        s.update(Action::EditBackspace);
        s.update(Action::EditInput('X'));
        assert_eq!(s.editing().map(|e| e.draft.name.as_str()), Some("Aaron MileX"));

        s.update(Action::CancelEdit);
        assert_eq!(s.mode, Mode::Viewing);
        assert_eq!(s.members()[0].name, "Aaron Miles", "Cancel must not write back");
    }

    #[test]
    fn test_start_edit_retargets() {
        let mut s = state();
        s.update(Action::StartEdit("1".to_string()));
        s.update(Action::EditInput('?'));
        s.update(Action::StartEdit("6".to_string()));

        assert!(s.is_editing("6"));
        assert!(!s.is_editing("1"));
        assert_eq!(s.editing().map(|e| e.draft.name.as_str()), Some("Jim McClain"));

        s.update(Action::SaveEdit);
        assert_eq!(s.members()[0].name, "Aaron Miles", "Abandoned draft is discarded");
    }

    #[test]
    fn test_start_edit_unknown_id_is_ignored() {
        let mut s = state();
        s.update(Action::StartEdit("404".to_string()));
        assert_eq!(s.mode, Mode::Viewing);
    }

    #[test]
    fn test_deleting_edited_row_leaves_edit_mode() {
        let mut s = state();
        s.update(Action::StartEdit("2".to_string()));
        s.update(Action::ToggleRow("2".to_string()));
        s.update(Action::DeleteSelected);

        assert_eq!(s.mode, Mode::Viewing);
    }

    #[test]
    fn test_edit_actions_ignored_while_viewing() {
        let mut s = state();
        s.update(Action::EditInput('z'));
        s.update(Action::SaveEdit);

        assert_eq!(s.mode, Mode::Viewing);
        assert_eq!(s.members()[0].name, "Aaron Miles");
    }

    #[test]
    fn test_toggle_dense() {
        let mut s = state();
        s.update(Action::ToggleDense);
        assert!(s.dense);
    }
}
