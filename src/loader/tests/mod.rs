//! Shared fixtures for loader tests

use std::fs;
use std::path::{Path, PathBuf};


/// Standard header row of an inspection export
pub const HEADER: &str = "farmName,Image URL,json data,activity_record,Date";

/// Quote a JSON payload for embedding in a CSV cell
pub fn csv_payload(json: &str) -> String {
    format!("\"{}\"", json.replace('"', "\"\""))
}

/// Payload carrying a single severity attribute
pub fn severity_payload(level: &str) -> String {
    csv_payload(&format!(
        r#"[{{"name": "Severity", "value": "{}"}}, {{"name": "Crop", "value": "Wheat"}}]"#,
        level
    ))
}

/// One CSV data line with the standard column order
pub fn row(farm: &str, image: &str, payload: &str, activity: &str, date: &str) -> String {
    format!("{},{},{},{},{}", farm, image, payload, activity, date)
}

/// Join a header and data lines into CSV text
pub fn csv_text(header: &str, rows: &[String]) -> String {
    let mut text = String::from(header);
    for line in rows {
        text.push('\n');
        text.push_str(line);
    }
    text.push('\n');
    text
}

/// Write CSV text to `dir/name` and return its path
pub fn write_csv(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}
