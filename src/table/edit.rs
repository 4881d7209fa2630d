use crate::members::{Member, MemberFields, MemberId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditField {
    #[default]
    Name,
    Email,
    Role,
}

impl EditField {
    pub fn next(self) -> Self {
        match self {
            EditField::Name => EditField::Email,
            EditField::Email => EditField::Role,
            EditField::Role => EditField::Name,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            EditField::Name => EditField::Role,
            EditField::Email => EditField::Name,
            EditField::Role => EditField::Email,
        }
    }
}

/// The single row being edited and its uncommitted field values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub id: MemberId,
    pub draft: MemberFields,
    pub focus: EditField,
}

impl EditSession {
    pub fn start(member: &Member) -> Self {
        Self {
            id: member.id.clone(),
            draft: member.fields(),
            focus: EditField::Name,
        }
    }

    pub fn value(&self, field: EditField) -> &str {
        match field {
            EditField::Name => &self.draft.name,
            EditField::Email => &self.draft.email,
            EditField::Role => &self.draft.role,
        }
    }

    fn value_mut(&mut self, field: EditField) -> &mut String {
        match field {
            EditField::Name => &mut self.draft.name,
            EditField::Email => &mut self.draft.email,
            EditField::Role => &mut self.draft.role,
        }
    }

    pub fn set(&mut self, field: EditField, value: String) {
        *self.value_mut(field) = value;
    }

    pub fn push(&mut self, c: char) {
        let focus = self.focus;
        self.value_mut(focus).push(c);
    }

    pub fn backspace(&mut self) {
        let focus = self.focus;
        self.value_mut(focus).pop();
    }
}
