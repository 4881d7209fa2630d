mod components;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::app::{App, Focus, Popup};
use crate::table::edit::EditField;
use crate::table::{empty_rows, range_label, SortField};
use crate::theme::Theme;
use components::{centered_rect, checkbox, column_title, header_checkbox, input_text};

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(1),   // Info line
            Constraint::Length(3),   // Search / selection toolbar
            Constraint::Min(5),      // Member table
            Constraint::Length(1),   // Pagination
            Constraint::Length(1),   // Key hints
        ])
        .split(area);

    draw_info_line(f, app, chunks[0]);
    draw_toolbar(f, app, chunks[1]);
    draw_table(f, app, chunks[2]);
    draw_pagination(f, app, chunks[3]);
    draw_footer(f, app, chunks[4]);

    // Draw popups on top
    match app.popup {
        Popup::None => {}
        Popup::Help => draw_help_popup(f, &app.theme),
        Popup::ConfirmDelete => draw_confirm_popup(f, app),
    }
}

fn draw_info_line(f: &mut Frame, app: &App, area: Rect) {
    let t = &app.theme;
    let line = if let Some(ref status) = app.status_message {
        Line::from(Span::styled(status.as_str(), Style::default().fg(t.accent)))
    } else {
        Line::from(Span::styled(app.info_message.as_str(), Style::default().fg(t.text_dim)))
    };

    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn draw_toolbar(f: &mut Frame, app: &App, area: Rect) {
    let t = &app.theme;
    let selected = app.table.selection.len();
    let focused = app.focus == Focus::Search;

    // An active search keeps its input visible even with rows checked
    if selected > 0 && !focused {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(t.accent));
        let content = Paragraph::new(Line::from(vec![
            Span::styled(format!(" {} selected", selected), Style::default().fg(t.text).add_modifier(Modifier::BOLD)),
            Span::styled("  │  ", Style::default().fg(t.inactive)),
            Span::styled("d", Style::default().fg(t.danger)),
            Span::styled(" delete  ", Style::default().fg(t.text_dim)),
            Span::styled("a", Style::default().fg(t.accent)),
            Span::styled(" select all", Style::default().fg(t.text_dim)),
        ]))
        .block(block);
        f.render_widget(content, area);
        return;
    }

    let border = if focused { t.accent } else { t.inactive };
    let block = Block::default()
        .title(Span::styled(" Search ", Style::default().fg(border)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    let filter = &app.table.query.filter;
    let line = if filter.is_empty() && !focused {
        Line::from(Span::styled(" / to search by name", Style::default().fg(t.text_dim)))
    } else {
        Line::from(vec![
            Span::styled(" 󰍉 ", Style::default().fg(t.accent)),
            Span::styled(input_text(filter, focused), Style::default().fg(t.text)),
        ])
    };

    f.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_table(f: &mut Frame, app: &App, area: Rect) {
    let t = &app.theme;
    let state = &app.table;
    let page = state.view();
    let query = &state.query;

    let block = Block::default()
        .title(Span::styled(" Members ", Style::default().fg(t.accent).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if app.focus == Focus::Table { t.accent } else { t.inactive }));

    let header_style = Style::default().fg(t.header);
    let mut header_cells = vec![Span::styled(header_checkbox(state.selection_coverage()), header_style)];
    header_cells.extend(
        SortField::ALL
            .iter()
            .map(|field| Span::styled(column_title(*field, query), header_style)),
    );
    let header = Row::new(header_cells).bottom_margin(if state.dense { 0 } else { 1 });

    let row_gap = if state.dense { 0 } else { 1 };

    let mut rows: Vec<Row> = if page.rows.is_empty() {
        let msg = if page.total == 0 {
            "  No members match"
        } else {
            "  No rows on this page (←  to go back)"
        };
        vec![Row::new(vec![Span::raw(""), Span::styled(msg, Style::default().fg(t.text_dim))])]
    } else {
        page.rows
            .iter()
            .enumerate()
            .map(|(i, member)| {
                let is_selected = state.selection.contains(&member.id);
                let check_color = if is_selected { t.success } else { t.text_dim };

                let row_style = if i == app.cursor && app.focus == Focus::Table {
                    Style::default().bg(t.bg_selected).fg(t.text)
                } else {
                    Style::default()
                };

                let cells = match state.editing() {
                    Some(session) if state.is_editing(&member.id) => {
                        let input = |field: EditField| {
                            let focused = session.focus == field;
                            let style = if focused {
                                Style::default().fg(t.accent).add_modifier(Modifier::UNDERLINED)
                            } else {
                                Style::default().fg(t.text).add_modifier(Modifier::UNDERLINED)
                            };
                            Span::styled(input_text(session.value(field), focused), style)
                        };
                        vec![
                            Span::styled(checkbox(is_selected), Style::default().fg(check_color)),
                            input(EditField::Name),
                            input(EditField::Email),
                            input(EditField::Role),
                        ]
                    }
                    _ => vec![
                        Span::styled(checkbox(is_selected), Style::default().fg(check_color)),
                        Span::styled(member.name.as_str(), Style::default().fg(t.text)),
                        Span::styled(member.email.as_str(), Style::default().fg(t.text_dim)),
                        Span::styled(member.role.as_str(), Style::default().fg(t.text)),
                    ],
                };

                Row::new(cells).style(row_style).bottom_margin(row_gap)
            })
            .collect()
    };

    // Pad a short trailing page so the table keeps its height
    let filler = empty_rows(page.total, query.page, query.page_size);
    rows.extend((0..filler).map(|_| Row::new(vec![Span::raw("")]).bottom_margin(row_gap)));

    let widths = [
        Constraint::Length(4),
        Constraint::Percentage(30),
        Constraint::Percentage(45),
        Constraint::Percentage(20),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block);

    f.render_widget(table, area);
}

fn draw_pagination(f: &mut Frame, app: &App, area: Rect) {
    let t = &app.theme;
    let query = &app.table.query;
    let total = app.table.view().total;

    let line = Line::from(vec![
        Span::styled("Rows per page: ", Style::default().fg(t.text_dim)),
        Span::styled(query.page_size.to_string(), Style::default().fg(t.text)),
        Span::styled("  │  ", Style::default().fg(t.inactive)),
        Span::styled(range_label(total, query.page, query.page_size), Style::default().fg(t.text)),
        Span::styled("  │  ", Style::default().fg(t.inactive)),
        Span::styled(
            format!("Page {}/{}", query.page + 1, app.table.page_count()),
            Style::default().fg(t.text_dim),
        ),
    ]);

    f.render_widget(Paragraph::new(line).alignment(Alignment::Right), area);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let t = &app.theme;
    let hints: Vec<(&str, &str)> = if app.focus == Focus::Search {
        vec![("type", "Filter"), ("Ctrl-u", "Clear"), ("Enter", "Done")]
    } else if app.table.editing().is_some() {
        vec![("Tab", "Next field"), ("Enter", "Save"), ("Esc", "Cancel")]
    } else {
        vec![
            ("↑↓", "Nav"),
            ("←→", "Page"),
            ("Space", "Select"),
            ("e", "Edit"),
            ("d", "Del"),
            ("1-3", "Sort"),
            ("/", "Search"),
            ("?", "Help"),
        ]
    };

    // Responsive: show fewer hints on narrow terminals
    let max_hints = if area.width < 60 { 4 } else if area.width < 90 { 6 } else { hints.len() };

    let hint_spans: Vec<Span> = hints
        .iter()
        .take(max_hints)
        .flat_map(|(key, action)| {
            vec![
                Span::styled(*key, Style::default().fg(t.accent)),
                Span::styled(format!(" {} │ ", action), Style::default().fg(t.text_dim)),
            ]
        })
        .collect();

    f.render_widget(Paragraph::new(Line::from(hint_spans)).alignment(Alignment::Center), area);
}

fn draw_help_popup(f: &mut Frame, t: &Theme) {
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 80 { 95 } else { 60 },
        if area.height < 30 { 95 } else { 75 },
        area,
    );

    f.render_widget(Clear, popup_area);

    let section = |title: &'static str| {
        Line::from(Span::styled(title, Style::default().fg(t.header).add_modifier(Modifier::BOLD)))
    };
    let key = |k: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<10}", k), Style::default().fg(t.accent)),
            Span::raw(desc),
        ])
    };

    let help_text = vec![
        section("═══ Navigation ═══"),
        key("↑/↓ j/k", "Move between rows"),
        key("←/→", "Previous / next page"),
        key("+/-", "Rows per page (5, 10, 25, All)"),
        key("D", "Dense rows on/off"),
        Line::from(""),
        section("═══ Search & Sort ═══"),
        key("/", "Search by name (Enter to finish)"),
        key("Esc", "Clear search"),
        key("1/2/3", "Sort by name / email / role (again to reverse)"),
        Line::from(""),
        section("═══ Selection ═══"),
        key("Space", "Select row"),
        key("a", "Select all matching rows (again to clear)"),
        key("d", "Delete selected, or the row under the cursor"),
        Line::from(""),
        section("═══ Editing ═══"),
        key("e/Enter", "Edit row"),
        key("Tab", "Next field"),
        key("Enter", "Save"),
        key("Esc", "Cancel"),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", Style::default().fg(t.text_dim)),
            Span::styled("?", Style::default().fg(t.accent)),
            Span::styled("/", Style::default().fg(t.text_dim)),
            Span::styled("Esc", Style::default().fg(t.accent)),
            Span::styled(" to close", Style::default().fg(t.text_dim)),
        ]),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(Span::styled(" 󰋖 roster Help ", Style::default().fg(t.accent)))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(t.accent)),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(help, popup_area);
}

fn draw_confirm_popup(f: &mut Frame, app: &App) {
    let t = &app.theme;
    let popup_area = centered_rect(40, 20, f.area());

    f.render_widget(Clear, popup_area);

    let message = app.status_message.as_deref().unwrap_or("Delete?");

    let confirm = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(t.danger))),
        Line::from(""),
        Line::from(vec![
            Span::styled("  y", Style::default().fg(t.success).add_modifier(Modifier::BOLD)),
            Span::raw(" Yes   "),
            Span::styled("n", Style::default().fg(t.danger).add_modifier(Modifier::BOLD)),
            Span::raw(" No"),
        ]),
    ])
    .block(
        Block::default()
            .title(Span::styled(" Confirm ", Style::default().fg(t.danger)))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(t.danger)),
    )
    .alignment(Alignment::Center);

    f.render_widget(confirm, popup_area);
}
