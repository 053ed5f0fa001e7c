// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod dataset;
mod logging;

use anyhow::{Context, Result, anyhow, bail};
use config::Config;
use dataset::Dataset;
use std::env;
use std::path::PathBuf;
use tabula_app::TableModel;
use tabula_testkit::{RowFaker, customer_header};

const DEFAULT_DEMO_ROWS: usize = 42;
const DEMO_SEED: u64 = 42;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `tabula --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;
    logging::init(&config)?;

    let source = data_source(&options, &config)?;
    let (dataset, title) = load_dataset(&source)?;
    let table_options = config
        .table_options()
        .with_context(|| format!("invalid [table] config in {}", options.config_path.display()))?;
    tracing::info!(
        rows = dataset.items.len(),
        columns = dataset.header.len(),
        source = %title,
        "dataset loaded"
    );

    let mut model = TableModel::new(dataset.header, dataset.items, table_options)
        .with_context(|| format!("build table from {title}"))?;
    if options.check_only {
        return Ok(());
    }

    tabula_tui::run_app(&mut model, &title)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DataSource {
    File(PathBuf),
    Demo(usize),
}

fn data_source(options: &CliOptions, config: &Config) -> Result<DataSource> {
    if let Some(count) = options.demo_rows {
        return Ok(DataSource::Demo(count));
    }
    if let Some(path) = &options.data_path {
        return Ok(DataSource::File(path.clone()));
    }
    config.data_path().map(DataSource::File).ok_or_else(|| {
        anyhow!(
            "no dataset to show; pass --data <file>, set [data].path in {}, or try --demo",
            options.config_path.display()
        )
    })
}

fn load_dataset(source: &DataSource) -> Result<(Dataset, String)> {
    match source {
        DataSource::File(path) => {
            let dataset = Dataset::load(path)?;
            let title = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            Ok((dataset, title))
        }
        DataSource::Demo(count) => {
            let items = RowFaker::new(DEMO_SEED).rows(*count);
            let dataset = Dataset {
                header: customer_header(),
                items,
            };
            Ok((dataset, "demo".to_owned()))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    data_path: Option<PathBuf>,
    demo_rows: Option<usize>,
    print_config_path: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        data_path: None,
        demo_rows: None,
        print_config_path: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter().peekable();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--data" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--data requires a JSON file path"))?;
                options.data_path = Some(PathBuf::from(value.as_ref()));
            }
            "--demo" => {
                let count = match iter.peek().map(|next| next.as_ref().to_owned()) {
                    Some(raw) if !raw.starts_with('-') => {
                        iter.next();
                        parse_demo_rows(&raw)?
                    }
                    _ => DEFAULT_DEMO_ROWS,
                };
                options.demo_rows = Some(count);
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                bail!("unknown argument {unknown:?}; run with --help to see supported options");
            }
        }
    }

    if options.demo_rows.is_some() && options.data_path.is_some() {
        bail!("--demo and --data are mutually exclusive");
    }

    Ok(options)
}

fn parse_demo_rows(raw: &str) -> Result<usize> {
    raw.parse::<usize>()
        .map_err(|_| anyhow!("--demo expects a row count, got {raw:?}"))
}

fn print_help() {
    println!("tabula");
    println!("  --config <path>          Use a specific config path");
    println!("  --data <path>            Show a JSON dataset ({{\"header\": [...], \"items\": [...]}})");
    println!("  --demo [N]               Show N generated rows (default {DEFAULT_DEMO_ROWS})");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a config template");
    println!("  --check                  Validate config + dataset, then exit");
    println!("  --help                   Show this help");
}
