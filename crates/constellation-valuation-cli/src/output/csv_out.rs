use serde_json::Value;
use std::io;

use super::{flatten_fields, format_scalar};

/// Write output as CSV to stdout.
///
/// Array results (the projection) become one record per element; object
/// results become flattened `field,value` pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let body = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match body {
        Value::Array(arr) => write_array_csv(&mut wtr, arr),
        Value::Object(map) if map.contains_key("points") => {
            if let Some(Value::Array(points)) = map.get("points") {
                write_array_csv(&mut wtr, points);
            }
        }
        Value::Object(_) => {
            let _ = wtr.write_record(["field", "value"]);
            for (key, val) in flatten_fields(body) {
                let _ = wtr.write_record([key, format_scalar(&val)]);
            }
        }
        _ => {
            let _ = wtr.write_record([&format_scalar(body)]);
        }
    }

    let _ = wtr.flush();
}

fn write_array_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            let _ = wtr.write_record([&format_scalar(item)]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);

    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(format_scalar).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    }
}
