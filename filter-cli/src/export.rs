//! Writing filtered records as JSON, CSV or an aligned table.

use clap::ValueEnum;
use record_filter::{get_nested_value, FieldDefinition, Record};
use serde_json::Value;
use std::io::Write;
use tabular::{Row, Table};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
    Table,
}

/// CSV and table columns follow the schema: one column per field, headed by
/// its label.
pub fn write_records<W: Write>(
    records: &[Record],
    fields: &[FieldDefinition],
    format: OutputFormat,
    mut writer: W,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, records)?;
            writeln!(writer)?;
        }
        OutputFormat::Csv => write_csv(records, fields, writer)?,
        OutputFormat::Table => write!(writer, "{}", render_table(records, fields))?,
    }
    Ok(())
}

fn write_csv<W: Write>(
    records: &[Record],
    fields: &[FieldDefinition],
    writer: W,
) -> anyhow::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(fields.iter().map(|f| f.label.as_str()))?;
    for record in records {
        csv_writer.write_record(fields.iter().map(|f| cell_text(get_nested_value(record, &f.key))))?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn render_table(records: &[Record], fields: &[FieldDefinition]) -> String {
    if fields.is_empty() {
        return String::new();
    }
    let spec = vec!["{:<}"; fields.len()].join("  ");
    let mut table = Table::new(&spec).with_row(Row::from_cells(fields.iter().map(|f| f.label.clone())));
    for record in records {
        let mut row = Row::new();
        for field in fields {
            row.add_cell(cell_text(get_nested_value(record, &field.key)));
        }
        table.add_row(row);
    }
    table.to_string()
}

/// Flat text for one cell. Lists are joined with `"; "`, absent is empty.
pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| cell_text(Some(item)))
            .collect::<Vec<_>>()
            .join("; "),
        Some(other) => other.to_string(),
    }
}
