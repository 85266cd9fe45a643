use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;

use datatree::v1::Value;

/// Read a JSON document from `input`, or stdin when absent.
pub fn read_value(input: Option<&PathBuf>) -> Result<Value> {
    let value = match input {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {:?}", path))?;
            Value::from_json_str(&content).with_context(|| format!("Failed to parse {:?}", path))?
        }
        None => Value::from_json_reader(std::io::stdin().lock())
            .context("Failed to parse JSON from stdin")?,
    };
    tracing::debug!(source = ?input, "loaded document");
    Ok(value)
}

pub fn print_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::test_support::write_temp_json;
    use super::*;

    #[test]
    fn test_read_value_from_file() {
        let f = write_temp_json(r#"{"a": [1, 2]}"#);
        let value = read_value(Some(&f.path().to_path_buf())).unwrap();
        assert_eq!(value.to_json(), serde_json::json!({"a": [1, 2]}));
    }

    #[test]
    fn test_read_value_invalid_json() {
        let f = write_temp_json("{broken");
        let err = read_value(Some(&f.path().to_path_buf())).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_read_value_missing_file() {
        let err = read_value(Some(&PathBuf::from("/nonexistent/file.json"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn test_print_json_pretty_and_compact() {
        assert!(print_json(&serde_json::json!({"k": 1}), true).is_ok());
        assert!(print_json(&[1, 2, 3], false).is_ok());
    }
}
