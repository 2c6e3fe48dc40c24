//! Aggregate rows pinned under a spreadsheet view.
//!
//! Rows are recomputed by the caller whenever the displayed (filtered) rows or
//! the selected calculations change; there is no incremental update.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use gridstudy_core::error::AppError;

/// An aggregate computed over a numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CalculationType {
    Sum,
    Average,
    Min,
    Max,
}

impl CalculationType {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Sum => "sum",
            Self::Average => "average",
            Self::Min => "min",
            Self::Max => "max",
        }
    }

    /// Reduces `values`; `None` when there is nothing to reduce.
    fn apply(&self, values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        let sum = || values.iter().sum::<f64>();
        Some(match self {
            Self::Sum => sum(),
            Self::Average => sum() / values.len() as f64,
            Self::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            Self::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        })
    }
}

impl fmt::Display for CalculationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CalculationType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sum" => Ok(Self::Sum),
            "average" | "avg" => Ok(Self::Average),
            "min" => Ok(Self::Min),
            "max" => Ok(Self::Max),
            other => Err(AppError::validation(format!(
                "Unknown calculation type '{other}'"
            ))),
        }
    }
}

/// Column of a spreadsheet view, as far as calculations are concerned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDef {
    /// Field path in the row, dot-separated for nested fields.
    pub col_id: String,
    /// Whether the column holds numbers.
    #[serde(default)]
    pub numeric: bool,
}

impl ColumnDef {
    pub fn numeric(col_id: impl Into<String>) -> Self {
        Self {
            col_id: col_id.into(),
            numeric: true,
        }
    }
}

/// Kind of a pinned row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CalculationRowType {
    /// A row holding one aggregate per numeric column.
    Calculation,
    /// The placeholder row hosting the calculation selector.
    CalculationButton,
}

/// A pinned row: the button placeholder, or one aggregate per numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationRow {
    pub row_type: CalculationRowType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculation_type: Option<CalculationType>,
    /// Aggregates, shaped like the source rows.
    #[serde(flatten)]
    pub values: Map<String, Value>,
}

impl CalculationRow {
    /// The placeholder row.
    pub fn button() -> Self {
        Self {
            row_type: CalculationRowType::CalculationButton,
            calculation_type: None,
            values: Map::new(),
        }
    }

    /// Value of a column, following dotted paths.
    pub fn value(&self, col_id: &str) -> Option<&Value> {
        let mut segments = col_id.split('.');
        let first = segments.next()?;
        segments.try_fold(self.values.get(first)?, |v, seg| v.get(seg))
    }
}

/// Builds the pinned rows for a view.
///
/// Returns the button row, followed by one row per selected calculation when
/// there is something to compute.
pub fn generate_calculation_rows(
    selected: &[CalculationType],
    column_defs: &[ColumnDef],
    displayed_rows: &[Value],
) -> Vec<CalculationRow> {
    let mut rows = vec![CalculationRow::button()];
    if selected.is_empty() || displayed_rows.is_empty() {
        return rows;
    }

    let columns: Vec<(&str, Vec<f64>)> = column_defs
        .iter()
        .filter(|c| c.numeric)
        .map(|c| {
            let values = displayed_rows
                .iter()
                .filter_map(|row| lookup(row, &c.col_id).and_then(as_number))
                .collect();
            (c.col_id.as_str(), values)
        })
        .collect();

    for calculation in selected {
        let mut values = Map::new();
        for (col_id, column) in &columns {
            let result = calculation.apply(column).map(number_value).unwrap_or(Value::Null);
            insert_path(&mut values, col_id, result);
        }
        rows.push(CalculationRow {
            row_type: CalculationRowType::Calculation,
            calculation_type: Some(*calculation),
            values,
        });
    }
    rows
}

fn lookup<'a>(row: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(row, |v, seg| v.get(seg))
}

/// Numbers as is, numeric strings parsed; anything else is skipped.
fn as_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

/// Whole results are emitted as integers.
fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        Value::from(n)
    }
}

/// Writes `value` at a dotted path, creating intermediate objects.
fn insert_path(target: &mut Map<String, Value>, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            target.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let entry = target
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(inner) = entry {
                insert_path(inner, rest, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_sum_skips_non_numeric() {
        let rows = generate_calculation_rows(
            &[CalculationType::Sum],
            &[ColumnDef::numeric("p")],
            &[json!({ "p": "10" }), json!({ "p": 5 }), json!({ "p": "bad" })],
        );

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], CalculationRow::button());
        assert_eq!(rows[1].calculation_type, Some(CalculationType::Sum));
        assert_eq!(rows[1].value("p").and_then(Value::as_f64), Some(15.0));
        assert_eq!(
            serde_json::to_value(&rows[1]).unwrap(),
            json!({ "rowType": "calculation", "calculationType": "sum", "p": 15 })
        );
    }

    #[test]
    fn test_fractional_average_stays_float() {
        let rows = generate_calculation_rows(
            &[CalculationType::Average],
            &[ColumnDef::numeric("p")],
            &[json!({ "p": 1 }), json!({ "p": 2 })],
        );
        assert_eq!(rows[1].value("p"), Some(&json!(1.5)));
    }

    #[test]
    fn test_no_displayed_rows_gives_button_only() {
        let rows = generate_calculation_rows(&[CalculationType::Min], &[ColumnDef::numeric("p")], &[]);
        assert_eq!(rows, vec![CalculationRow::button()]);
        assert_eq!(
            serde_json::to_value(&rows).unwrap(),
            json!([{ "rowType": "calculationButton" }])
        );
    }

    #[test]
    fn test_no_selection_gives_button_only() {
        let rows = generate_calculation_rows(&[], &[ColumnDef::numeric("p")], &[json!({ "p": 1 })]);
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_all_aggregates() {
        let data = [json!({ "p": 4 }), json!({ "p": -2 }), json!({ "p": 1 })];
        let rows = generate_calculation_rows(
            &[CalculationType::Sum, CalculationType::Average, CalculationType::Min, CalculationType::Max],
            &[ColumnDef::numeric("p")],
            &data,
        );
        let results: Vec<_> = rows[1..].iter().map(|r| r.value("p").and_then(Value::as_f64)).collect();
        assert_eq!(results, vec![Some(3.0), Some(1.0), Some(-2.0), Some(4.0)]);
    }

    #[test]
    fn test_empty_column_yields_null() {
        let rows = generate_calculation_rows(
            &[CalculationType::Min, CalculationType::Max],
            &[ColumnDef::numeric("p")],
            &[json!({ "p": null }), json!({ "q": 1 })],
        );
        assert_eq!(rows[1].value("p"), Some(&Value::Null));
        assert_eq!(rows[2].value("p"), Some(&Value::Null));
    }

    #[test]
    fn test_nested_columns_are_written_back_nested() {
        let rows = generate_calculation_rows(
            &[CalculationType::Max],
            &[
                ColumnDef::numeric("ratioTapChanger.tapPosition"),
                ColumnDef::numeric("ratioTapChanger.highTapPosition"),
                ColumnDef { col_id: "name".into(), numeric: false },
            ],
            &[
                json!({ "name": "T1", "ratioTapChanger": { "tapPosition": 3, "highTapPosition": 10 } }),
                json!({ "name": "T2", "ratioTapChanger": { "tapPosition": 7, "highTapPosition": 12 } }),
            ],
        );

        let json = serde_json::to_value(&rows[1]).unwrap();
        assert_eq!(json["rowType"], "calculation");
        assert_eq!(json["calculationType"], "max");
        assert_eq!(json["ratioTapChanger"]["tapPosition"], 7);
        assert_eq!(json["ratioTapChanger"]["highTapPosition"], 12);
        assert!(json.get("name").is_none());
        assert!(json.get("ratioTapChanger.tapPosition").is_none());
    }

    #[test]
    fn test_parse_calculation_type() {
        assert_eq!("Average".parse::<CalculationType>().unwrap(), CalculationType::Average);
        assert!("median".parse::<CalculationType>().is_err());
    }
}
