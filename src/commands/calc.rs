//! Calculation rows over spreadsheet data.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use serde_json::Value;
use tabled::Tabled;

use gridstudy_core::error::AppError;
use gridstudy_equipment::{CalculationType, ColumnDef, generate_calculation_rows};

use crate::output::{self, OutputFormat};

/// Arguments for the calc command
#[derive(Debug, Args)]
pub struct CalcArgs {
    /// JSON array of displayed rows
    #[arg(long)]
    pub rows: PathBuf,

    /// JSON array of column definitions (`colId`, `numeric`)
    #[arg(long)]
    pub columns: PathBuf,

    /// Calculations to compute
    #[arg(long, value_delimiter = ',', default_value = "sum,average,min,max")]
    pub types: Vec<CalculationType>,
}

/// One aggregate, flattened for display
#[derive(Debug, Serialize, Tabled)]
struct AggregateRow {
    calculation: String,
    column: String,
    value: String,
}

/// Execute the calc command
pub fn execute(args: &CalcArgs, format: OutputFormat) -> Result<(), AppError> {
    let rows: Vec<Value> = super::read_json(&args.rows)?;
    let columns: Vec<ColumnDef> = super::read_json(&args.columns)?;
    let calculation_rows = generate_calculation_rows(&args.types, &columns, &rows);

    if format == OutputFormat::Json {
        output::print_item(&calculation_rows, format);
        return Ok(());
    }

    let aggregates: Vec<AggregateRow> = calculation_rows
        .iter()
        .filter_map(|row| row.calculation_type.map(|ty| (ty, row)))
        .flat_map(|(ty, row)| {
            columns.iter().filter(|c| c.numeric).map(move |c| AggregateRow {
                calculation: ty.to_string(),
                column: c.col_id.clone(),
                value: match row.value(&c.col_id) {
                    Some(Value::Number(n)) => n.to_string(),
                    _ => "-".to_string(),
                },
            })
        })
        .collect();
    output::print_list(&aggregates, format);
    Ok(())
}
