// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tabula_app::{ColumnHeader, Row};

const COMPANY_PREFIXES: [&str; 16] = [
    "Alfreds",
    "Berglunds",
    "Blauer See",
    "Blondel",
    "Bolido",
    "Centro",
    "Ernst",
    "Folk och fa",
    "Island",
    "Königlich",
    "Laughing",
    "Magazzini",
    "North/South",
    "Paris",
    "Rattlesnake",
    "Wolski",
];

const COMPANY_SUFFIXES: [&str; 10] = [
    "Trading",
    "Delikatessen",
    "Handel",
    "Markets",
    "Winecellars",
    "Comidas",
    "Alimentari",
    "Canyon Grocery",
    "Zajazd",
    "Futterkiste",
];

const FIRST_NAMES: [&str; 16] = [
    "Maria", "Ana", "Antonio", "Thomas", "Christina", "Hanna", "Frederique", "Martin", "Laurence",
    "Elizabeth", "Victoria", "Francisco", "Yang", "Pedro", "Roland", "Helen",
];
const LAST_NAMES: [&str; 16] = [
    "Anders", "Trujillo", "Moreno", "Hardy", "Berglund", "Moos", "Citeaux", "Sommer", "Lebihans",
    "Lincoln", "Ashworth", "Chang", "Wang", "Afonso", "Mendel", "Bennett",
];

const COUNTRIES: [&str; 14] = [
    "Argentina",
    "Austria",
    "Belgium",
    "Brazil",
    "Canada",
    "Denmark",
    "France",
    "Germany",
    "Italy",
    "Mexico",
    "Spain",
    "Sweden",
    "UK",
    "USA",
];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Seeded generator for customer-style rows (company, contact, country).
#[derive(Debug, Clone)]
pub struct RowFaker {
    rng: DeterministicRng,
}

impl RowFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
        }
    }

    pub fn company(&mut self) -> String {
        let prefix = self.pick(&COMPANY_PREFIXES);
        let suffix = self.pick(&COMPANY_SUFFIXES);
        format!("{prefix} {suffix}")
    }

    pub fn contact(&mut self) -> String {
        let first = self.pick(&FIRST_NAMES);
        let last = self.pick(&LAST_NAMES);
        format!("{first} {last}")
    }

    pub fn country(&mut self) -> String {
        self.pick(&COUNTRIES).to_owned()
    }

    pub fn row(&mut self) -> Row {
        Row::new()
            .with("company", self.company())
            .with("contact", self.contact())
            .with("country", self.country())
    }

    pub fn rows(&mut self, count: usize) -> Vec<Row> {
        (0..count).map(|_| self.row()).collect()
    }

    fn pick<'a>(&mut self, values: &'a [&'a str]) -> &'a str {
        values[self.rng.int_n(values.len())]
    }
}

pub fn customer_header() -> Vec<ColumnHeader> {
    vec![
        ColumnHeader::new("Company", "company"),
        ColumnHeader::new("Contact", "contact"),
        ColumnHeader::new("Country", "country"),
    ]
}

/// Writes a dataset file in the `{ "header": [...], "items": [...] }` layout
/// the CLI reads.
pub fn write_dataset(dir: &Path, header: &[ColumnHeader], items: &[Row]) -> Result<PathBuf> {
    let path = dir.join("rows.json");
    let body = json!({ "header": header, "items": items });
    let raw = serde_json::to_string_pretty(&body).context("encode dataset")?;
    fs::write(&path, raw).with_context(|| format!("write dataset {}", path.display()))?;
    Ok(path)
}

pub fn temp_dataset(count: usize, seed: u64) -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let items = RowFaker::new(seed).rows(count);
    let path = write_dataset(dir.path(), &customer_header(), &items)?;
    Ok((dir, path))
}

#[cfg(test)]
mod tests {
    use super::{COUNTRIES, DeterministicRng, RowFaker, customer_header, temp_dataset};
    use anyhow::Result;
    use std::collections::BTreeSet;

    #[test]
    fn new_deterministic_seed() {
        let mut left = RowFaker::new(42);
        let mut right = RowFaker::new(42);
        assert_eq!(left.rows(20), right.rows(20));
    }

    #[test]
    fn zero_seed_is_normalized() {
        assert_eq!(RowFaker::new(0).rows(5), RowFaker::new(1).rows(5));
    }

    #[test]
    fn row_fills_every_header_key() {
        let mut faker = RowFaker::new(7);
        let row = faker.row();
        for column in customer_header() {
            assert!(!row.cell(&column.key).is_empty(), "key {}", column.key);
        }
        assert!(COUNTRIES.contains(&row.cell("country")));
    }

    #[test]
    fn rows_vary_across_a_batch() {
        let mut faker = RowFaker::new(3);
        let companies = faker
            .rows(50)
            .iter()
            .map(|row| row.cell("company").to_owned())
            .collect::<BTreeSet<_>>();
        assert!(companies.len() > 10);
    }

    #[test]
    fn int_n_stays_in_range() {
        let mut rng = DeterministicRng::new(11);
        for _ in 0..200 {
            assert!(rng.int_n(6) < 6);
        }
        assert_eq!(rng.int_n(1), 0);
    }

    #[test]
    fn temp_dataset_writes_header_and_items() -> Result<()> {
        let (_dir, path) = temp_dataset(4, 9)?;
        let raw = std::fs::read_to_string(&path)?;
        let value: serde_json::Value = serde_json::from_str(&raw)?;
        assert_eq!(value["header"].as_array().map(Vec::len), Some(3));
        assert_eq!(value["items"].as_array().map(Vec::len), Some(4));
        assert_eq!(value["header"][0]["key"], "company");
        Ok(())
    }
}
