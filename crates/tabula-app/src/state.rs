// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use std::collections::BTreeSet;

use crate::table::{self, PageInfo, Selection};
use crate::{ColumnHeader, PageSize, Row, RowId, SortDirection, TableOptions, TableRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub column: usize,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableModel {
    header: Vec<ColumnHeader>,
    rows: Vec<TableRow>,
    options: TableOptions,
    page_size: PageSize,
    current_page: usize,
    sort: Option<SortState>,
    selection: Selection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableCommand {
    SortBy(usize),
    FirstPage,
    PreviousPage,
    NextPage,
    LastPage,
    SetPageSize(PageSize),
    CyclePageSize(isize),
    SetChecked { index: usize, checked: bool },
    ToggleRow(usize),
    SelectPage(bool),
    ClearSelection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredReason {
    SortingDisabled,
    PaginationDisabled,
    CheckboxDisabled,
    NoSuchColumn,
    NoSuchRow,
    FirstPage,
    LastPage,
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    Sorted {
        column: usize,
        label: String,
        direction: SortDirection,
    },
    PageChanged(usize),
    PageSizeChanged(PageSize),
    SelectionChanged {
        id: RowId,
        checked: bool,
    },
    SelectionCleared,
    Ignored(IgnoredReason),
}

impl TableEvent {
    pub fn message(&self) -> String {
        match self {
            Self::Sorted {
                label, direction, ..
            } => format!("sort {label} {}", direction.as_str()),
            Self::PageChanged(page) => format!("page {page}"),
            Self::PageSizeChanged(size) => format!("{size} rows per page"),
            Self::SelectionChanged { checked: true, .. } => "row selected".to_owned(),
            Self::SelectionChanged { checked: false, .. } => "row unselected".to_owned(),
            Self::SelectionCleared => "selection cleared".to_owned(),
            Self::Ignored(reason) => reason.message().to_owned(),
        }
    }
}

impl IgnoredReason {
    pub const fn message(self) -> &'static str {
        match self {
            Self::SortingDisabled => "sorting disabled",
            Self::PaginationDisabled => "pagination disabled",
            Self::CheckboxDisabled => "selection disabled",
            Self::NoSuchColumn => "no such column",
            Self::NoSuchRow => "no row here",
            Self::FirstPage => "already on first page",
            Self::LastPage => "already on last page",
            Self::Unchanged => "nothing changed",
        }
    }
}

impl TableModel {
    pub fn new(header: Vec<ColumnHeader>, items: Vec<Row>, options: TableOptions) -> Result<Self> {
        let mut keys = BTreeSet::new();
        for column in &header {
            if column.key.trim().is_empty() {
                bail!(
                    "column {:?} has an empty key; every column needs the row key it displays",
                    column.heading
                );
            }
            if !keys.insert(column.key.as_str()) {
                bail!(
                    "duplicate column key {:?}; each column key may appear once",
                    column.key
                );
            }
        }

        let rows = items
            .into_iter()
            .enumerate()
            .map(|(index, cells)| TableRow {
                id: RowId::new(index),
                cells,
            })
            .collect::<Vec<_>>();
        let selection = Selection::new(rows.len());

        Ok(Self {
            header,
            rows,
            options,
            page_size: options.rows_per_page,
            current_page: 1,
            sort: None,
            selection,
        })
    }

    pub fn header(&self) -> &[ColumnHeader] {
        &self.header
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn options(&self) -> TableOptions {
        self.options
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn sort(&self) -> Option<SortState> {
        self.sort
    }

    pub fn total_entries(&self) -> usize {
        self.rows.len()
    }

    pub fn page_info(&self) -> PageInfo {
        table::page_info(self.current_page, self.page_size, self.rows.len())
    }

    pub fn page_rows(&self) -> &[TableRow] {
        table::page_slice(&self.rows, self.current_page, self.page_size)
    }

    pub fn selected_ids(&self) -> Vec<RowId> {
        self.selection.ids().collect()
    }

    pub fn selected_rows(&self) -> Vec<&TableRow> {
        let mut selected = self
            .rows
            .iter()
            .filter(|row| self.selection.is_selected(row.id))
            .collect::<Vec<_>>();
        selected.sort_by_key(|row| row.id);
        selected
    }

    pub fn selected_count(&self) -> usize {
        self.selection.count()
    }

    pub fn is_selected(&self, id: RowId) -> bool {
        self.selection.is_selected(id)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    // Ids are reassigned, so checkbox state cannot carry over.
    pub fn replace_items(&mut self, items: Vec<Row>) {
        self.rows = items
            .into_iter()
            .enumerate()
            .map(|(index, cells)| TableRow {
                id: RowId::new(index),
                cells,
            })
            .collect();
        self.selection = Selection::new(self.rows.len());
        self.sort = None;
        self.current_page = 1;
    }

    pub fn dispatch(&mut self, command: TableCommand) -> Vec<TableEvent> {
        match command {
            TableCommand::SortBy(column) => vec![self.sort_by(column)],
            TableCommand::FirstPage => self.go_to_page(1, IgnoredReason::FirstPage),
            TableCommand::PreviousPage => {
                let target = self.current_page.saturating_sub(1).max(1);
                self.go_to_page(target, IgnoredReason::FirstPage)
            }
            TableCommand::NextPage => {
                if !self.page_info().has_next {
                    return self.ignored_page(IgnoredReason::LastPage);
                }
                self.go_to_page(self.current_page + 1, IgnoredReason::LastPage)
            }
            TableCommand::LastPage => {
                let last = self.page_info().total_pages.max(1);
                self.go_to_page(last, IgnoredReason::LastPage)
            }
            TableCommand::SetPageSize(size) => self.set_page_size(size),
            TableCommand::CyclePageSize(delta) => self.set_page_size(self.page_size.step(delta)),
            TableCommand::SetChecked { index, checked } => vec![self.set_checked(index, checked)],
            TableCommand::ToggleRow(index) => {
                let Some(row) = self.page_rows().get(index) else {
                    return vec![TableEvent::Ignored(self.checkbox_guard(IgnoredReason::NoSuchRow))];
                };
                let checked = !self.selection.is_selected(row.id);
                vec![self.set_checked(index, checked)]
            }
            TableCommand::SelectPage(checked) => self.select_page(checked),
            TableCommand::ClearSelection => {
                if !self.options.show_checkbox {
                    return vec![TableEvent::Ignored(IgnoredReason::CheckboxDisabled)];
                }
                if self.selection.count() == 0 {
                    return vec![TableEvent::Ignored(IgnoredReason::Unchanged)];
                }
                self.selection.clear();
                vec![TableEvent::SelectionCleared]
            }
        }
    }

    fn sort_by(&mut self, column: usize) -> TableEvent {
        if !self.options.show_sorting {
            return TableEvent::Ignored(IgnoredReason::SortingDisabled);
        }
        let Some(header) = self.header.get(column) else {
            return TableEvent::Ignored(IgnoredReason::NoSuchColumn);
        };

        let direction = match self.sort {
            Some(sort) if sort.column == column => sort.direction.toggled(),
            _ => SortDirection::Asc,
        };
        self.rows = table::sort_rows(&self.rows, &header.key, direction);
        self.sort = Some(SortState { column, direction });
        TableEvent::Sorted {
            column,
            label: header.heading.clone(),
            direction,
        }
    }

    fn ignored_page(&self, reason: IgnoredReason) -> Vec<TableEvent> {
        if self.options.show_pagination {
            vec![TableEvent::Ignored(reason)]
        } else {
            vec![TableEvent::Ignored(IgnoredReason::PaginationDisabled)]
        }
    }

    fn go_to_page(&mut self, target: usize, unchanged: IgnoredReason) -> Vec<TableEvent> {
        if !self.options.show_pagination {
            return vec![TableEvent::Ignored(IgnoredReason::PaginationDisabled)];
        }
        if target == self.current_page {
            return vec![TableEvent::Ignored(unchanged)];
        }
        self.current_page = target;
        vec![TableEvent::PageChanged(target)]
    }

    fn set_page_size(&mut self, size: PageSize) -> Vec<TableEvent> {
        if !self.options.show_pagination {
            return vec![TableEvent::Ignored(IgnoredReason::PaginationDisabled)];
        }
        if size == self.page_size {
            return vec![TableEvent::Ignored(IgnoredReason::Unchanged)];
        }
        self.page_size = size;
        self.current_page = 1;
        vec![TableEvent::PageSizeChanged(size), TableEvent::PageChanged(1)]
    }

    fn checkbox_guard(&self, reason: IgnoredReason) -> IgnoredReason {
        if self.options.show_checkbox {
            reason
        } else {
            IgnoredReason::CheckboxDisabled
        }
    }

    fn set_checked(&mut self, index: usize, checked: bool) -> TableEvent {
        if !self.options.show_checkbox {
            return TableEvent::Ignored(IgnoredReason::CheckboxDisabled);
        }
        let Some(id) = self.page_rows().get(index).map(|row| row.id) else {
            return TableEvent::Ignored(IgnoredReason::NoSuchRow);
        };
        if !self.selection.set(id, checked) {
            return TableEvent::Ignored(IgnoredReason::Unchanged);
        }
        TableEvent::SelectionChanged { id, checked }
    }

    fn select_page(&mut self, checked: bool) -> Vec<TableEvent> {
        if !self.options.show_checkbox {
            return vec![TableEvent::Ignored(IgnoredReason::CheckboxDisabled)];
        }
        let ids = self.page_rows().iter().map(|row| row.id).collect::<Vec<_>>();
        let events = ids
            .into_iter()
            .filter(|id| self.selection.set(*id, checked))
            .map(|id| TableEvent::SelectionChanged { id, checked })
            .collect::<Vec<_>>();
        if events.is_empty() {
            return vec![TableEvent::Ignored(IgnoredReason::Unchanged)];
        }
        events
    }
}
