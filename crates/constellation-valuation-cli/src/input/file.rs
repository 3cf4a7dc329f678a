use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Read a JSON file as a generic value, leaving typed decoding to the caller
/// so the engine can report missing fields by name.
pub fn read_json_value(path: &str) -> Result<Value, Box<dyn std::error::Error>> {
    let canonical = resolve_existing(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    let value: Value = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?;
    Ok(value)
}

/// Write text to `path`, creating or truncating it. Returns the absolute path.
pub fn write_text(path: &str, contents: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let target = absolute(path)?;
    if target.is_dir() {
        return Err(format!("Is a directory: {}", target.display()).into());
    }
    fs::write(&target, contents)
        .map_err(|e| format!("Failed to write '{}': {}", target.display(), e))?;
    Ok(target)
}

fn absolute(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    Ok(if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    })
}

fn resolve_existing(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let canonical = absolute(path)?;

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }

    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}
