// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use tabula_app::table::{page_slice, sort_rows, total_pages};
use tabula_app::{
    ColumnHeader, PageSize, Row, RowId, SortDirection, TableCommand, TableEvent, TableModel,
    TableOptions,
};

fn customers() -> Vec<Row> {
    [
        ("Alfreds Futterkiste", "Maria Anders", "Germany"),
        ("Centro comercial Moctezuma", "Francisco Chang", "Mexico"),
        ("Ernst Handel", "Roland Mendel", "Austria"),
        ("Island Trading", "Helen Bennett", "UK"),
        ("Laughing Bacchus Winecellars", "Yoshi Tannamuri", "Canada"),
        ("Magazzini Alimentari Riuniti", "Giovanni Rovelli", "Italy"),
        ("Berglunds snabbkop", "Christina Berglund", "Sweden"),
        ("Blauer See Delikatessen", "Hanna Moos", "Germany"),
        ("Blondel pere et fils", "Frederique Citeaux", "France"),
        ("Bolido Comidas preparadas", "Martin Sommer", "Spain"),
        ("Bon app", "Laurence Lebihans", "France"),
        ("Bottom-Dollar Markets", "Elizabeth Lincoln", "Canada"),
    ]
    .into_iter()
    .map(|(company, contact, country)| {
        Row::new()
            .with("company", company)
            .with("contact", contact)
            .with("country", country)
    })
    .collect()
}

fn header() -> Vec<ColumnHeader> {
    vec![
        ColumnHeader::new("Company", "company"),
        ColumnHeader::new("Contact", "contact"),
        ColumnHeader::new("Country", "country"),
    ]
}

fn companies(model: &TableModel) -> Vec<String> {
    model
        .rows()
        .iter()
        .map(|row| row.cell("company").to_owned())
        .collect()
}

#[test]
fn company_asc_then_desc_matches_direct_descending_sort() -> Result<()> {
    let mut model = TableModel::new(header(), customers(), TableOptions::default())?;
    model.dispatch(TableCommand::SortBy(0));
    model.dispatch(TableCommand::SortBy(0));

    let unsorted = TableModel::new(header(), customers(), TableOptions::default())?;
    let direct = sort_rows(unsorted.rows(), "company", SortDirection::Desc);
    let expected = direct
        .iter()
        .map(|row| row.cell("company").to_owned())
        .collect::<Vec<_>>();
    assert_eq!(companies(&model), expected);
    Ok(())
}

#[test]
fn walking_every_page_visits_every_row() -> Result<()> {
    let options = TableOptions {
        rows_per_page: PageSize::new(5)?,
        ..TableOptions::default()
    };
    let mut model = TableModel::new(header(), customers(), options)?;
    assert_eq!(model.page_info().total_pages, 3);

    let mut seen = Vec::new();
    loop {
        seen.extend(model.page_rows().iter().map(|row| row.id));
        let events = model.dispatch(TableCommand::NextPage);
        if !matches!(events.as_slice(), [TableEvent::PageChanged(_)]) {
            break;
        }
    }
    assert_eq!(seen, (0..12).map(RowId::new).collect::<Vec<_>>());
    assert_eq!(model.current_page(), 3);
    assert_eq!(model.page_rows().len(), 2);
    Ok(())
}

#[test]
fn page_slices_sum_to_row_count_for_sorted_rows() -> Result<()> {
    let model = TableModel::new(header(), customers(), TableOptions::default())?;
    let sorted = sort_rows(model.rows(), "country", SortDirection::Asc);
    for size in 1..=13 {
        let size = PageSize::new(size)?;
        let total = (1..=total_pages(size, sorted.len()))
            .map(|page| page_slice(&sorted, page, size).len())
            .sum::<usize>();
        assert_eq!(total, sorted.len());
    }
    Ok(())
}

#[test]
fn selection_survives_sort_by_row_identity() -> Result<()> {
    let options = TableOptions {
        rows_per_page: PageSize::new(5)?,
        ..TableOptions::default()
    };
    let mut model = TableModel::new(header(), customers(), options)?;
    model.dispatch(TableCommand::NextPage);
    model.dispatch(TableCommand::ToggleRow(3));

    let picked = model.selected_rows()[0].cell("company").to_owned();
    assert_eq!(picked, "Blondel pere et fils");

    model.dispatch(TableCommand::SortBy(2));
    model.dispatch(TableCommand::SortBy(1));
    let still = model
        .selected_rows()
        .iter()
        .map(|row| row.cell("company").to_owned())
        .collect::<Vec<_>>();
    assert_eq!(still, vec![picked]);
    assert_eq!(model.selected_ids(), vec![RowId::new(8)]);
    Ok(())
}
