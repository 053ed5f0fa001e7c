// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};
use std::io;
use std::time::Duration;
use tabula_app::{SortDirection, TableCommand, TableEvent, TableModel, TableRow};

const CHECKBOX_ON: &str = "[x]";
const CHECKBOX_OFF: &str = "[ ]";
const SORT_ASC_MARK: &str = " ↑";
const SORT_DESC_MARK: &str = " ↓";
const SORTABLE_MARK: &str = " ↕";
const FIRST_PAGE_MARK: &str = "«";
const PREVIOUS_PAGE_MARK: &str = "‹";
const NEXT_PAGE_MARK: &str = "›";
const LAST_PAGE_MARK: &str = "»";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct TableUiState {
    selected_row: usize,
    selected_col: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ViewData {
    title: String,
    table_state: TableUiState,
    help_visible: bool,
    status_line: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UiCommand {
    Quit,
    ToggleHelp,
    MoveRow(isize),
    MoveColumn(isize),
    SortCursorColumn,
    ToggleCursorRow,
    SelectPage(bool),
    ClearSelection,
    FirstPage,
    PreviousPage,
    NextPage,
    LastPage,
    CyclePageSize(isize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum UiEvent {
    Quit,
    CursorUpdated,
    HelpToggled(bool),
    Table(Vec<TableEvent>),
}

pub fn run_app(model: &mut TableModel, title: &str) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData {
        title: title.to_owned(),
        ..ViewData::default()
    };
    tracing::info!(
        rows = model.total_entries(),
        columns = model.header().len(),
        "table opened"
    );

    let mut result = Ok(());
    loop {
        if let Err(error) = terminal.draw(|frame| render(frame, model, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = match event::poll(Duration::from_millis(250)).context("poll event") {
            Ok(has_event) => has_event,
            Err(error) => {
                result = Err(error);
                break;
            }
        };
        if !has_event {
            continue;
        }
        match event::read().context("read event") {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                if handle_key_event(model, &mut view_data, key) {
                    break;
                }
            }
            Ok(_) => {}
            Err(error) => {
                result = Err(error);
                break;
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    if let Err(error) = &result {
        tracing::error!("table loop failed: {error:#}");
    } else {
        tracing::info!(selected = model.selected_count(), "table closed");
    }
    result
}

fn handle_key_event(model: &mut TableModel, view_data: &mut ViewData, key: KeyEvent) -> bool {
    let Some(command) = ui_command_for_key(key, view_data.help_visible) else {
        return false;
    };

    match apply_ui_command(model, view_data, command) {
        UiEvent::Quit => true,
        UiEvent::CursorUpdated => false,
        UiEvent::HelpToggled(_) => {
            view_data.status_line = None;
            false
        }
        UiEvent::Table(events) => {
            if let Some(message) = status_for_events(&events) {
                view_data.status_line = Some(message);
            }
            false
        }
    }
}

fn ui_command_for_key(key: KeyEvent, help_visible: bool) -> Option<UiCommand> {
    if help_visible {
        return match (key.code, key.modifiers) {
            (KeyCode::Char('c'), modifiers) if modifiers.contains(KeyModifiers::CONTROL) => {
                Some(UiCommand::Quit)
            }
            (KeyCode::Char('?'), _) | (KeyCode::Esc, _) | (KeyCode::Char('q'), _) => {
                Some(UiCommand::ToggleHelp)
            }
            _ => None,
        };
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), modifiers) if modifiers.contains(KeyModifiers::CONTROL) => {
            Some(UiCommand::Quit)
        }
        (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => Some(UiCommand::Quit),
        (KeyCode::Char('?'), _) => Some(UiCommand::ToggleHelp),
        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Some(UiCommand::MoveRow(1)),
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Some(UiCommand::MoveRow(-1)),
        (KeyCode::Char('h'), _) | (KeyCode::Left, _) => Some(UiCommand::MoveColumn(-1)),
        (KeyCode::Char('l'), _) | (KeyCode::Right, _) => Some(UiCommand::MoveColumn(1)),
        (KeyCode::Char('s'), KeyModifiers::NONE) => Some(UiCommand::SortCursorColumn),
        (KeyCode::Char(' '), _) => Some(UiCommand::ToggleCursorRow),
        (KeyCode::Char('a'), KeyModifiers::NONE) => Some(UiCommand::SelectPage(true)),
        (KeyCode::Char('A'), _) => Some(UiCommand::SelectPage(false)),
        (KeyCode::Char('x'), KeyModifiers::NONE) => Some(UiCommand::ClearSelection),
        (KeyCode::Char('n'), _) | (KeyCode::PageDown, _) => Some(UiCommand::NextPage),
        (KeyCode::Char('p'), _) | (KeyCode::PageUp, _) => Some(UiCommand::PreviousPage),
        (KeyCode::Char('g'), _) | (KeyCode::Home, _) => Some(UiCommand::FirstPage),
        (KeyCode::Char('G'), _) | (KeyCode::End, _) => Some(UiCommand::LastPage),
        (KeyCode::Char('+'), _) | (KeyCode::Char('='), _) => Some(UiCommand::CyclePageSize(1)),
        (KeyCode::Char('-'), _) => Some(UiCommand::CyclePageSize(-1)),
        _ => None,
    }
}

fn apply_ui_command(
    model: &mut TableModel,
    view_data: &mut ViewData,
    command: UiCommand,
) -> UiEvent {
    let table_command = match command {
        UiCommand::Quit => return UiEvent::Quit,
        UiCommand::ToggleHelp => {
            view_data.help_visible = !view_data.help_visible;
            return UiEvent::HelpToggled(view_data.help_visible);
        }
        UiCommand::MoveRow(delta) => {
            move_row(model, view_data, delta);
            return UiEvent::CursorUpdated;
        }
        UiCommand::MoveColumn(delta) => {
            move_col(model, view_data, delta);
            return UiEvent::CursorUpdated;
        }
        UiCommand::SortCursorColumn => TableCommand::SortBy(view_data.table_state.selected_col),
        UiCommand::ToggleCursorRow => TableCommand::ToggleRow(view_data.table_state.selected_row),
        UiCommand::SelectPage(checked) => TableCommand::SelectPage(checked),
        UiCommand::ClearSelection => TableCommand::ClearSelection,
        UiCommand::FirstPage => TableCommand::FirstPage,
        UiCommand::PreviousPage => TableCommand::PreviousPage,
        UiCommand::NextPage => TableCommand::NextPage,
        UiCommand::LastPage => TableCommand::LastPage,
        UiCommand::CyclePageSize(delta) => TableCommand::CyclePageSize(delta),
    };

    let events = model.dispatch(table_command);
    clamp_table_cursor(model, view_data);
    UiEvent::Table(events)
}

fn status_for_events(events: &[TableEvent]) -> Option<String> {
    let selected = events
        .iter()
        .filter(|event| matches!(event, TableEvent::SelectionChanged { .. }))
        .count();
    if selected > 1 {
        let verb = match events.first() {
            Some(TableEvent::SelectionChanged { checked: false, .. }) => "unselected",
            _ => "selected",
        };
        return Some(format!("{selected} rows {verb}"));
    }
    events.first().map(TableEvent::message)
}

fn move_row(model: &TableModel, view_data: &mut ViewData, delta: isize) {
    let row_count = model.page_rows().len();
    if row_count == 0 {
        view_data.table_state.selected_row = 0;
        return;
    }

    let current = view_data.table_state.selected_row;
    let next = current.saturating_add_signed(delta);
    view_data.table_state.selected_row = next.min(row_count.saturating_sub(1));
}

fn move_col(model: &TableModel, view_data: &mut ViewData, delta: isize) {
    let column_count = model.header().len();
    if column_count == 0 {
        view_data.table_state.selected_col = 0;
        return;
    }

    let current = view_data.table_state.selected_col;
    let next = current.saturating_add_signed(delta);
    view_data.table_state.selected_col = next.min(column_count.saturating_sub(1));
}

fn clamp_table_cursor(model: &TableModel, view_data: &mut ViewData) {
    let row_count = model.page_rows().len();
    view_data.table_state.selected_row = view_data
        .table_state
        .selected_row
        .min(row_count.saturating_sub(1));
    let column_count = model.header().len();
    view_data.table_state.selected_col = view_data
        .table_state
        .selected_col
        .min(column_count.saturating_sub(1));
}

fn render(frame: &mut ratatui::Frame<'_>, model: &TableModel, view_data: &ViewData) {
    let options = model.options();
    let mut constraints = vec![Constraint::Min(3)];
    if options.show_pagination {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Length(1));
    constraints.push(Constraint::Length(1));

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(frame.area());

    render_table(frame, layout[0], model, view_data);

    let mut next = 1;
    if options.show_pagination {
        frame.render_widget(Paragraph::new(pagination_line(model)), layout[next]);
        next += 1;
    }

    let footer = Paragraph::new(footer_text(model)).style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(footer, layout[next]);

    let status = Paragraph::new(status_text(view_data)).style(Style::default().fg(Color::Yellow));
    frame.render_widget(status, layout[next + 1]);

    if view_data.help_visible {
        let area = centered_rect(70, 60, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_table(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    model: &TableModel,
    view_data: &ViewData,
) {
    let options = model.options();
    let mut widths = Vec::with_capacity(model.header().len() + 1);
    if options.show_checkbox {
        widths.push(Constraint::Length(3));
    }
    widths.extend(std::iter::repeat_n(
        Constraint::Min(8),
        model.header().len().max(1),
    ));

    let header_cells = header_labels(model)
        .into_iter()
        .enumerate()
        .map(|(index, label)| {
            let column_index = if options.show_checkbox {
                index.checked_sub(1)
            } else {
                Some(index)
            };
            let style = match column_index {
                None => Style::default().fg(Color::DarkGray),
                Some(column) if column == view_data.table_state.selected_col => Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
                Some(_) => Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            };
            Cell::from(label).style(style)
        });
    let header = Row::new(header_cells);

    let rows = model.page_rows().iter().enumerate().map(|(row_index, row)| {
        let cursor_row = row_index == view_data.table_state.selected_row;
        let checked = options.show_checkbox && model.is_selected(row.id);
        let mut style = Style::default();
        if checked {
            style = style.fg(Color::Green);
        }
        if cursor_row {
            style = style.bg(Color::DarkGray);
        }
        let cells = row_cells(model, row)
            .into_iter()
            .map(Cell::from)
            .collect::<Vec<_>>();
        Row::new(cells).style(style)
    });

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(
            Block::default()
                .title(table_title(model, view_data))
                .borders(Borders::ALL),
        );
    frame.render_widget(table, area);
}

// Includes the inert checkbox column when shown.
fn header_labels(model: &TableModel) -> Vec<String> {
    let options = model.options();
    let sort = model.sort();
    let mut labels = Vec::with_capacity(model.header().len() + 1);
    if options.show_checkbox {
        labels.push(CHECKBOX_OFF.to_owned());
    }
    for (index, column) in model.header().iter().enumerate() {
        let mut label = column.heading.to_uppercase();
        if options.show_sorting {
            label.push_str(match sort {
                Some(sort) if sort.column == index => match sort.direction {
                    SortDirection::Asc => SORT_ASC_MARK,
                    SortDirection::Desc => SORT_DESC_MARK,
                },
                _ => SORTABLE_MARK,
            });
        }
        labels.push(label);
    }
    labels
}

fn row_cells(model: &TableModel, row: &TableRow) -> Vec<String> {
    let mut cells = Vec::with_capacity(model.header().len() + 1);
    if model.options().show_checkbox {
        let mark = if model.is_selected(row.id) {
            CHECKBOX_ON
        } else {
            CHECKBOX_OFF
        };
        cells.push(mark.to_owned());
    }
    cells.extend(
        model
            .header()
            .iter()
            .map(|column| row.cell(&column.key).to_owned()),
    );
    cells
}

fn pagination_line(model: &TableModel) -> Line<'static> {
    let info = model.page_info();
    let control = |mark: &str, enabled: bool| {
        let style = if enabled {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Span::styled(mark.to_owned(), style)
    };

    Line::from(vec![
        control(FIRST_PAGE_MARK, info.has_previous),
        Span::raw(" "),
        control(PREVIOUS_PAGE_MARK, info.has_previous),
        Span::raw(format!("  rows per page: {}  ", model.page_size())),
        Span::raw(format!(
            "page {} of {}  ",
            info.current_page,
            info.total_pages.max(1)
        )),
        control(NEXT_PAGE_MARK, info.has_next),
        Span::raw(" "),
        control(LAST_PAGE_MARK, info.has_next),
    ])
}

fn footer_text(model: &TableModel) -> String {
    let total = format!("total entries: {}", model.total_entries());
    if model.options().show_checkbox {
        format!("{total} | selected: {}", model.selected_count())
    } else {
        total
    }
}

fn table_title(model: &TableModel, view_data: &ViewData) -> String {
    let mut parts = vec![view_data.title.clone()];
    if let Some(sort) = model.sort()
        && let Some(column) = model.header().get(sort.column)
    {
        parts.push(format!(
            "sort {}:{}",
            column.key,
            sort.direction.as_str()
        ));
    }
    parts.join(" | ")
}

fn status_text(view_data: &ViewData) -> String {
    let default = "j/k/h/l move | s sort | space check | a/A page | x clear | n/p g/G pages | +/- size | ? help | q quit";
    match &view_data.status_line {
        Some(status) => format!("{status} | {default}"),
        None => default.to_owned(),
    }
}

fn help_overlay_text() -> &'static str {
    "move: j/k rows | h/l columns\n\
sort: s sort by column under cursor (again to reverse)\n\
select: space toggle row | a select page | A unselect page | x clear all\n\
pages: n/pgdn next | p/pgup previous | g/home first | G/end last\n\
size: +/- rows per page (5, 10, 25, 50, 100)\n\
global: ? help | q/esc/ctrl+c quit"
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
