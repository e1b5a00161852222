//! CSV event scripts and the final state report.
//!
//! A script row is `event,a,b`: `coin,<cents>`, `electronic,<source>,<cents>`,
//! `press,<button>`, `out-of-order,<true|false>`, `configure,<name:cost;...>`,
//! `load-coins,<n;n;...>` and `load-products,<n;n;...>`.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use thiserror::Error;

use crate::{Cents, Event, ProductKind, VendingMachine};

/// Errors that can occur when parsing script rows
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("line {line}: failed to parse row: {source}")]
    Parse { line: usize, source: csv::Error },

    #[error("line {line}: unrecognized event '{event}'")]
    UnrecognizedEvent { line: usize, event: String },

    #[error("line {line}: {event} missing its argument")]
    MissingArgument { line: usize, event: String },

    #[error("line {line}: bad number '{value}'")]
    BadNumber { line: usize, value: String },

    #[error("line {line}: bad product entry '{entry}' (want name:cost)")]
    BadProduct { line: usize, entry: String },
}

#[derive(Debug, Deserialize)]
struct InputRow {
    event: String,
    a: Option<String>,
    b: Option<String>,
}

#[derive(Debug, Serialize)]
struct ReportRow {
    field: String,
    value: String,
}

fn require<'a>(
    line: usize,
    event: &str,
    field: &'a Option<String>,
) -> Result<&'a str, ScriptError> {
    field.as_deref().ok_or_else(|| ScriptError::MissingArgument {
        line,
        event: event.to_string(),
    })
}

fn parse_number(line: usize, value: &str) -> Result<u64, ScriptError> {
    value.parse().map_err(|_| ScriptError::BadNumber {
        line,
        value: value.to_string(),
    })
}

fn parse_counts(line: usize, value: &str) -> Result<Vec<usize>, ScriptError> {
    value
        .split(';')
        .map(|entry| {
            entry.parse().map_err(|_| ScriptError::BadNumber {
                line,
                value: entry.to_string(),
            })
        })
        .collect()
}

fn parse_products(line: usize, value: &str) -> Result<Vec<ProductKind>, ScriptError> {
    value
        .split(';')
        .map(|entry| {
            let (name, cost) = entry.split_once(':').ok_or_else(|| ScriptError::BadProduct {
                line,
                entry: entry.to_string(),
            })?;
            let cost = parse_number(line, cost)?;
            Ok(ProductKind::new(name, Cents::new(cost)))
        })
        .collect()
}

/// Read machine events from a csv script file
pub fn read_events(path: impl AsRef<Path>) -> impl Iterator<Item = Result<Event, ScriptError>> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .expect("failed to open script file");

    reader
        .into_deserialize::<InputRow>()
        .enumerate()
        .map(|(idx, result)| {
            let line = idx + 2; // 1-indexed, skip header
            let row = result.map_err(|source| ScriptError::Parse { line, source })?;
            match row.event.as_str() {
                "coin" => Ok(Event::CoinAccepted {
                    value: Cents::new(parse_number(line, require(line, "coin", &row.a)?)?),
                }),
                "electronic" => Ok(Event::ElectronicPayment {
                    source: require(line, "electronic", &row.a)?.to_string(),
                    amount: Cents::new(parse_number(
                        line,
                        require(line, "electronic", &row.b)?,
                    )?),
                }),
                "press" => Ok(Event::ButtonPressed {
                    button: parse_number(line, require(line, "press", &row.a)?)? as usize,
                }),
                "out-of-order" => match require(line, "out-of-order", &row.a)? {
                    "true" => Ok(Event::OutOfOrderChanged { out_of_order: true }),
                    "false" => Ok(Event::OutOfOrderChanged {
                        out_of_order: false,
                    }),
                    other => Err(ScriptError::BadNumber {
                        line,
                        value: other.to_string(),
                    }),
                },
                "configure" => Ok(Event::Configure {
                    products: parse_products(line, require(line, "configure", &row.a)?)?,
                }),
                "load-coins" => Ok(Event::LoadCoins {
                    counts: parse_counts(line, require(line, "load-coins", &row.a)?)?,
                }),
                "load-products" => Ok(Event::LoadProducts {
                    counts: parse_counts(line, require(line, "load-products", &row.a)?)?,
                }),
                other => Err(ScriptError::UnrecognizedEvent {
                    line,
                    event: other.to_string(),
                }),
            }
        })
}

/// Write the machine's observable state to stdout in csv format
pub fn write_report(machine: &VendingMachine) {
    let stdout = io::stdout();
    let mut writer = csv::Writer::from_writer(stdout.lock());

    let mut rows = vec![
        ("funds".to_string(), machine.funds_inserted().to_string()),
        (
            "out_of_order".to_string(),
            machine.is_out_of_order().to_string(),
        ),
    ];
    let (error, message) = machine.error_signal();
    rows.push(("error".to_string(), error.to_string()));
    rows.push(("error_message".to_string(), message.to_string()));
    for rack in 0..machine.coin_rack_count() {
        rows.push((
            format!("coins_in_rack_{rack}"),
            machine
                .coins_remaining_in_rack(rack)
                .unwrap_or(0)
                .to_string(),
        ));
    }
    for rack in 0..machine.button_count() {
        rows.push((
            format!("products_in_rack_{rack}"),
            machine
                .products_remaining_in_rack(rack)
                .unwrap_or(0)
                .to_string(),
        ));
    }

    for (field, value) in rows {
        writer
            .serialize(ReportRow { field, value })
            .expect("failed to write report row");
    }

    writer.flush().expect("failed to flush report writer");
}
