// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::ids::RowId;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(BTreeMap<String, String>);

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn cell(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl From<BTreeMap<String, String>> for Row {
    fn from(value: BTreeMap<String, String>) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnHeader {
    pub heading: String,
    pub key: String,
}

impl ColumnHeader {
    pub fn new(heading: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            key: key.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub id: RowId,
    pub cells: Row,
}

impl TableRow {
    pub fn cell(&self, key: &str) -> &str {
        self.cells.cell(key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct PageSize(usize);

impl PageSize {
    pub const CHOICES: [Self; 5] = [Self(5), Self(10), Self(25), Self(50), Self(100)];
    pub const DEFAULT: Self = Self(10);

    pub fn new(value: usize) -> Result<Self> {
        if value == 0 {
            bail!("rows_per_page must be positive, got 0");
        }
        Ok(Self(value))
    }

    pub const fn get(self) -> usize {
        self.0
    }

    // Sizes outside CHOICES snap to the nearest choice in the step direction.
    pub fn step(self, delta: isize) -> Self {
        if delta == 0 {
            return self;
        }
        let choices = Self::CHOICES;
        let last = choices.len() - 1;
        let next = match choices.iter().position(|choice| *choice == self) {
            Some(index) => index.saturating_add_signed(delta).min(last),
            None if delta > 0 => choices
                .iter()
                .position(|choice| *choice > self)
                .unwrap_or(last),
            None => choices
                .iter()
                .rposition(|choice| *choice < self)
                .unwrap_or(0),
        };
        choices[next]
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<usize> for PageSize {
    type Error = anyhow::Error;

    fn try_from(value: usize) -> Result<Self> {
        Self::new(value)
    }
}

impl From<PageSize> for usize {
    fn from(value: PageSize) -> Self {
        value.0
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableOptions {
    pub rows_per_page: PageSize,
    pub show_sorting: bool,
    pub show_pagination: bool,
    pub show_checkbox: bool,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            rows_per_page: PageSize::DEFAULT,
            show_sorting: true,
            show_pagination: true,
            show_checkbox: true,
        }
    }
}
