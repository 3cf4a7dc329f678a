use serde_json::Value;

use super::format_scalar;

/// Where the answer lives in each command's result, in priority order.
const PRIORITY_PATHS: [&[&str]; 5] = [
    &["valuation", "active", "price_per_share"],
    &["valuation", "price_per_share"],
    &["base_case_value"],
    &["blended_price"],
    &["written"],
];

/// Print just the key answer value from the output.
///
/// A projection prints its terminal-year blended price; a snapshot export
/// falls through to the first field.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let target = match result {
        Value::Array(arr) => arr.last().unwrap_or(result),
        _ => result,
    };

    if let Some(answer) = PRIORITY_PATHS
        .iter()
        .find_map(|path| lookup(target, path).filter(|v| !v.is_null()))
    {
        println!("{}", format_scalar(answer));
        return;
    }

    if let Some((key, val)) = target.as_object().and_then(|m| m.iter().next()) {
        println!("{}: {}", key, format_scalar(val));
        return;
    }

    println!("{}", format_scalar(target));
}

fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |v, key| v.get(*key))
}
