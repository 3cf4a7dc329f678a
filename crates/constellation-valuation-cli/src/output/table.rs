use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{flatten_fields, format_scalar};

/// Format output as tables using the tabled crate.
///
/// Projection results (arrays) print one row per year, sensitivity results
/// print their grid, everything else prints as flattened field/value rows.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(result) => {
                print_result(result);
                print_envelope_notes(map);
            }
            None => print_fields(value),
        },
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

fn print_result(result: &Value) {
    match result {
        Value::Array(rows) => print_array_table(rows),
        Value::Object(map) if map.contains_key("matrix") => print_sensitivity_grid(map),
        _ => print_fields(result),
    }
}

fn print_envelope_notes(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_fields(value: &Value) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in flatten_fields(value) {
        builder.push_record([key, format_value(&val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

/// Rows are variable_1 values, columns variable_2 values (or the metric
/// name for a one-way sweep).
fn print_sensitivity_grid(result: &Map<String, Value>) {
    let text = |key: &str| result.get(key).map(format_scalar).unwrap_or_default();
    let values = |key: &str| match result.get(key) {
        Some(Value::Array(vs)) => vs.iter().map(format_scalar).collect::<Vec<_>>(),
        _ => Vec::new(),
    };

    let row_labels = values("variable_1_values");
    let mut col_labels = values("variable_2_values");
    let corner = match result.get("variable_2") {
        Some(Value::String(v2)) => format!("{} \\ {}", text("variable_1"), v2),
        _ => text("variable_1"),
    };
    if col_labels.is_empty() {
        col_labels.push(text("metric"));
    }

    let mut builder = Builder::default();
    let mut header = vec![corner];
    header.extend(col_labels);
    builder.push_record(header);

    if let Some(Value::Array(matrix)) = result.get("matrix") {
        for (label, row) in row_labels.iter().zip(matrix) {
            let mut record = vec![label.clone()];
            if let Value::Array(cells) = row {
                record.extend(cells.iter().map(|cell| match cell {
                    Value::Null => "n/a".to_string(),
                    other => format_scalar(other),
                }));
            }
            builder.push_record(record);
        }
    }
    println!("{}", Table::from(builder));
    println!("\nBase case {}: {}", text("metric"), text("base_case_value"));
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        _ => format_scalar(value),
    }
}
