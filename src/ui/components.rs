//! Small pieces shared by the table, toolbar and popups

use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::table::selection::Coverage;
use crate::table::{Query, SortField};

pub fn checkbox(checked: bool) -> &'static str {
    if checked { "[x]" } else { "[ ]" }
}

/// Header checkbox: all, some or none of the filtered rows checked
pub fn header_checkbox(coverage: Coverage) -> &'static str {
    match coverage {
        Coverage::All => "[x]",
        Coverage::Partial => "[-]",
        Coverage::None => "[ ]",
    }
}

/// Column title with the sort arrow when it is the active sort key
pub fn column_title(field: SortField, query: &Query) -> String {
    if query.sort_field == field {
        format!("{} {}", field.label(), query.direction.arrow())
    } else {
        field.label().to_string()
    }
}

/// Text of an inline input, with a cursor mark when focused
pub fn input_text(value: &str, focused: bool) -> String {
    if focused {
        format!("{}_", value)
    } else {
        value.to_string()
    }
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
