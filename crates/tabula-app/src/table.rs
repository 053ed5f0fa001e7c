// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{PageSize, RowId, SortDirection, TableRow};

// Byte-wise and stable. Rows without the key compare as "".
pub fn sort_rows(rows: &[TableRow], key: &str, direction: SortDirection) -> Vec<TableRow> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|left, right| {
        let ordering = left.cell(key).cmp(right.cell(key));
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    sorted
}

pub fn total_pages(page_size: PageSize, len: usize) -> usize {
    len.div_ceil(page_size.get())
}

pub fn has_next_page(current_page: usize, page_size: PageSize, len: usize) -> bool {
    current_page.saturating_mul(page_size.get()) < len
}

pub fn has_previous_page(current_page: usize) -> bool {
    current_page > 1
}

pub fn page_start(current_page: usize, page_size: PageSize) -> usize {
    current_page.saturating_sub(1).saturating_mul(page_size.get())
}

pub fn page_slice<T>(rows: &[T], current_page: usize, page_size: PageSize) -> &[T] {
    let start = page_start(current_page, page_size).min(rows.len());
    let end = start.saturating_add(page_size.get()).min(rows.len());
    &rows[start..end]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub current_page: usize,
    pub total_pages: usize,
    pub start: usize,
    pub end: usize,
    pub has_next: bool,
    pub has_previous: bool,
}

impl PageInfo {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

pub fn page_info(current_page: usize, page_size: PageSize, len: usize) -> PageInfo {
    let start = page_start(current_page, page_size).min(len);
    let end = start.saturating_add(page_size.get()).min(len);
    PageInfo {
        current_page,
        total_pages: total_pages(page_size, len),
        start,
        end,
        has_next: has_next_page(current_page, page_size, len),
        has_previous: has_previous_page(current_page),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    checked: Vec<bool>,
}

impl Selection {
    pub fn new(len: usize) -> Self {
        Self {
            checked: vec![false; len],
        }
    }

    pub fn len(&self) -> usize {
        self.checked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checked.is_empty()
    }

    pub fn is_selected(&self, id: RowId) -> bool {
        self.checked.get(id.get()).copied().unwrap_or(false)
    }

    pub fn set(&mut self, id: RowId, checked: bool) -> bool {
        match self.checked.get_mut(id.get()) {
            Some(entry) if *entry != checked => {
                *entry = checked;
                true
            }
            _ => false,
        }
    }

    pub fn count(&self) -> usize {
        self.checked.iter().filter(|checked| **checked).count()
    }

    pub fn ids(&self) -> impl Iterator<Item = RowId> + '_ {
        self.checked
            .iter()
            .enumerate()
            .filter(|(_, checked)| **checked)
            .map(|(index, _)| RowId::new(index))
    }

    pub fn clear(&mut self) {
        self.checked.iter_mut().for_each(|entry| *entry = false);
    }
}

pub fn with_selection(selection: &Selection, id: RowId, checked: bool) -> Selection {
    let mut updated = selection.clone();
    updated.set(id, checked);
    updated
}

#[cfg(test)]
mod tests {
    use super::{
        Selection, has_next_page, page_info, page_slice, sort_rows, total_pages, with_selection,
    };
    use crate::{PageSize, Row, RowId, SortDirection, TableRow};
    use anyhow::Result;

    fn rows(values: &[&str]) -> Vec<TableRow> {
        values
            .iter()
            .enumerate()
            .map(|(index, value)| TableRow {
                id: RowId::new(index),
                cells: Row::new().with("company", *value),
            })
            .collect()
    }

    fn companies(rows: &[TableRow]) -> Vec<&str> {
        rows.iter().map(|row| row.cell("company")).collect()
    }

    #[test]
    fn twelve_rows_five_per_page() -> Result<()> {
        let size = PageSize::new(5)?;
        let data = (0..12).collect::<Vec<_>>();

        assert_eq!(total_pages(size, data.len()), 3);
        assert_eq!(page_slice(&data, 1, size), &[0, 1, 2, 3, 4]);
        assert_eq!(page_slice(&data, 3, size), &[10, 11]);
        assert!(has_next_page(2, size, data.len()));
        assert!(!has_next_page(3, size, data.len()));
        Ok(())
    }

    #[test]
    fn pages_cover_every_row_exactly_once() -> Result<()> {
        for len in 0..40 {
            let data = (0..len).collect::<Vec<_>>();
            for size in 1..12 {
                let size = PageSize::new(size)?;
                let mut seen = Vec::new();
                for page in 1..=total_pages(size, len) {
                    seen.extend_from_slice(page_slice(&data, page, size));
                }
                assert_eq!(seen, data, "len {len} size {size}");
            }
        }
        Ok(())
    }

    #[test]
    fn has_next_is_false_only_on_last_page() -> Result<()> {
        for len in 1..30 {
            for size in 1..8 {
                let size = PageSize::new(size)?;
                let last = total_pages(size, len);
                for page in 1..=last {
                    assert_eq!(
                        !has_next_page(page, size, len),
                        page == last,
                        "len {len} size {size} page {page}"
                    );
                }
            }
        }
        Ok(())
    }

    #[test]
    fn out_of_range_page_is_empty() -> Result<()> {
        let data = [1, 2, 3];
        assert!(page_slice(&data, 9, PageSize::new(2)?).is_empty());

        let info = page_info(9, PageSize::new(2)?, data.len());
        assert!(info.is_empty());
        assert!(!info.has_next);
        assert!(info.has_previous);
        Ok(())
    }

    #[test]
    fn empty_rows_have_no_pages() -> Result<()> {
        let info = page_info(1, PageSize::new(5)?, 0);
        assert_eq!(info.total_pages, 0);
        assert!(!info.has_next);
        assert!(!info.has_previous);
        assert_eq!(info.len(), 0);
        Ok(())
    }

    #[test]
    fn sort_orders_by_text_and_reverses() {
        let data = rows(&["beta", "Alpha", "alpha", "gamma"]);

        let asc = sort_rows(&data, "company", SortDirection::Asc);
        assert_eq!(companies(&asc), vec!["Alpha", "alpha", "beta", "gamma"]);

        let desc = sort_rows(&asc, "company", SortDirection::Desc);
        assert_eq!(companies(&desc), vec!["gamma", "beta", "alpha", "Alpha"]);
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let data = rows(&["b", "a", "b", "a"]);
        let sorted = sort_rows(&data, "company", SortDirection::Asc);
        let ids = sorted.iter().map(|row| row.id.get()).collect::<Vec<_>>();
        assert_eq!(ids, vec![1, 3, 0, 2]);
    }

    #[test]
    fn rows_missing_the_key_sort_first_ascending() {
        let mut data = rows(&["b", "a"]);
        data.push(TableRow {
            id: RowId::new(2),
            cells: Row::new().with("contact", "Ann"),
        });

        let sorted = sort_rows(&data, "company", SortDirection::Asc);
        assert_eq!(sorted[0].id, RowId::new(2));
        assert_eq!(companies(&sorted), vec!["", "a", "b"]);
    }

    #[test]
    fn with_selection_touches_one_entry() {
        let mut base = Selection::new(6);
        base.set(RowId::new(1), true);
        base.set(RowId::new(4), true);

        let updated = with_selection(&base, RowId::new(2), true);
        for index in 0..6 {
            let id = RowId::new(index);
            if index == 2 {
                assert!(updated.is_selected(id));
            } else {
                assert_eq!(updated.is_selected(id), base.is_selected(id));
            }
        }

        let cleared = with_selection(&updated, RowId::new(4), false);
        assert!(!cleared.is_selected(RowId::new(4)));
        assert_eq!(cleared.count(), 2);
        assert_eq!(cleared.len(), 6);
    }

    #[test]
    fn selection_ignores_unknown_ids() {
        let mut selection = Selection::new(2);
        assert!(!selection.set(RowId::new(7), true));
        assert_eq!(selection.count(), 0);
        assert!(!selection.is_selected(RowId::new(7)));
    }
}
