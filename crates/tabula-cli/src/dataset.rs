// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tabula_app::{ColumnHeader, Row};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub header: Vec<ColumnHeader>,
    pub items: Vec<Row>,
}

#[derive(Debug, Deserialize)]
struct RawDataset {
    #[serde(default)]
    header: Option<Vec<ColumnHeader>>,
    items: Vec<serde_json::Map<String, Value>>,
}

impl Dataset {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read dataset {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("decode dataset {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let parsed: RawDataset = serde_json::from_str(raw)
            .context("expected an object with an \"items\" array and an optional \"header\" array")?;

        let items = parsed
            .items
            .into_iter()
            .enumerate()
            .map(|(index, item)| row_from_object(index, item))
            .collect::<Result<Vec<_>>>()?;

        let header = match parsed.header {
            Some(header) => header,
            None => derive_header(&items),
        };
        Ok(Self { header, items })
    }
}

fn row_from_object(index: usize, item: serde_json::Map<String, Value>) -> Result<Row> {
    let mut row = Row::new();
    for (key, value) in item {
        let text = match value {
            Value::Null => continue,
            Value::String(text) => text,
            Value::Bool(flag) => flag.to_string(),
            Value::Number(number) => number.to_string(),
            Value::Array(_) | Value::Object(_) => bail!(
                "item {index} field {key:?} is nested; cell values must be strings, numbers, or booleans"
            ),
        };
        row.insert(key, text);
    }
    Ok(row)
}

/// One column per distinct key, ordered by the first item that carries it.
/// Keys within a single item come out alphabetically.
fn derive_header(items: &[Row]) -> Vec<ColumnHeader> {
    let mut header: Vec<ColumnHeader> = Vec::new();
    for item in items {
        for key in item.keys() {
            if !header.iter().any(|column| column.key == key) {
                header.push(ColumnHeader::new(key, key));
            }
        }
    }
    header
}

#[cfg(test)]
mod tests {
    use super::Dataset;
    use anyhow::Result;
    use tabula_app::ColumnHeader;
    use tabula_testkit::{RowFaker, customer_header, write_dataset};

    #[test]
    fn parses_header_and_items() -> Result<()> {
        let dataset = Dataset::parse(
            r#"{
                "header": [{"heading": "Company", "key": "company"}],
                "items": [{"company": "Acme", "country": "NL"}]
            }"#,
        )?;
        assert_eq!(dataset.header, vec![ColumnHeader::new("Company", "company")]);
        assert_eq!(dataset.items.len(), 1);
        assert_eq!(dataset.items[0].cell("country"), "NL");
        Ok(())
    }

    #[test]
    fn missing_header_is_derived_from_item_keys() -> Result<()> {
        let dataset = Dataset::parse(
            r#"{"items": [{"company": "Acme"}, {"country": "NL", "company": "Beta"}]}"#,
        )?;
        let keys = dataset
            .header
            .iter()
            .map(|column| column.key.as_str())
            .collect::<Vec<_>>();
        assert_eq!(keys, vec!["company", "country"]);
        assert_eq!(dataset.header[1].heading, "country");
        Ok(())
    }

    #[test]
    fn scalar_values_become_text_and_null_is_missing() -> Result<()> {
        let dataset = Dataset::parse(
            r#"{"items": [{"count": 12, "ratio": 0.5, "active": true, "note": null}]}"#,
        )?;
        let row = &dataset.items[0];
        assert_eq!(row.cell("count"), "12");
        assert_eq!(row.cell("ratio"), "0.5");
        assert_eq!(row.cell("active"), "true");
        assert_eq!(row.get("note"), None);
        Ok(())
    }

    #[test]
    fn nested_values_are_rejected_with_item_index() {
        let error = Dataset::parse(r#"{"items": [{"a": "x"}, {"a": {"b": 1}}]}"#)
            .expect_err("nested value should fail");
        let message = error.to_string();
        assert!(message.contains("item 1"), "unexpected message: {message}");
        assert!(message.contains("\"a\""), "unexpected message: {message}");
    }

    #[test]
    fn wrong_shape_reports_expected_layout() {
        let error = Dataset::parse("[1, 2, 3]").expect_err("array root should fail");
        assert!(error.to_string().contains("\"items\" array"));
    }

    #[test]
    fn load_reads_testkit_dataset() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let items = RowFaker::new(5).rows(8);
        let path = write_dataset(temp.path(), &customer_header(), &items)?;

        let dataset = Dataset::load(&path)?;
        assert_eq!(dataset.header, customer_header());
        assert_eq!(dataset.items, items);
        Ok(())
    }

    #[test]
    fn load_missing_file_names_the_path() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("absent.json");
        let error = Dataset::load(&path).expect_err("missing file should fail");
        assert!(error.to_string().contains("absent.json"));
        Ok(())
    }
}
