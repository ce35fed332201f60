use anyhow::{Context, Result};
use comfy_table::Table;
use jpx_core::Runtime;
use serde::Serialize;
use serde_json::Value;
use std::sync::OnceLock;

static JMESPATH_RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// JMESPath runtime with the extended function set
pub fn get_jmespath_runtime() -> &'static Runtime {
    JMESPATH_RUNTIME.get_or_init(|| Runtime::builder().with_all_extensions().build())
}

pub fn compile_jmespath(
    query: &str,
) -> Result<jpx_core::Expression<'static>, jpx_core::JmespathError> {
    get_jmespath_runtime().compile(query)
}

/// Concrete rendering once `auto` has been decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Table,
}

/// Serialize `data`, apply `query` if any
pub fn to_queried_value<T: Serialize>(data: T, query: Option<&str>) -> Result<Value> {
    let json_value = serde_json::to_value(data)?;

    match query {
        Some(query_str) => {
            let expr = compile_jmespath(query_str)
                .with_context(|| format!("Invalid JMESPath expression: {}", query_str))?;
            expr.search(&json_value).context("JMESPath query failed")
        }
        None => Ok(json_value),
    }
}

pub fn print_output<T: Serialize>(
    data: T,
    format: OutputFormat,
    query: Option<&str>,
) -> Result<()> {
    let json_value = to_queried_value(data, query)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json_value)?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(&json_value)?);
        }
        OutputFormat::Table => {
            print_as_table(&json_value);
        }
    }

    Ok(())
}

/// Print a fixed set of columns, one row per item
pub fn print_rows(headers: &[&str], rows: Vec<Vec<String>>) {
    if rows.is_empty() {
        println!("No results");
        return;
    }

    let mut table = Table::new();
    table.set_header(headers.to_vec());
    for row in rows {
        table.add_row(row);
    }
    println!("{table}");
}

fn print_as_table(value: &Value) {
    match value {
        Value::Array(arr) if !arr.is_empty() => {
            let mut table = Table::new();

            if let Value::Object(first) = &arr[0] {
                let headers: Vec<String> = first.keys().cloned().collect();
                table.set_header(&headers);

                for item in arr {
                    if let Value::Object(obj) = item {
                        let row: Vec<String> = headers
                            .iter()
                            .map(|h| format_value(obj.get(h).unwrap_or(&Value::Null)))
                            .collect();
                        table.add_row(row);
                    }
                }
            } else {
                table.set_header(vec!["Value"]);
                for item in arr {
                    table.add_row(vec![format_value(item)]);
                }
            }

            println!("{table}");
        }
        Value::Array(_) => println!("No results"),
        Value::Object(obj) => {
            let mut table = Table::new();
            table.set_header(vec!["Key", "Value"]);

            for (key, val) in obj {
                table.add_row(vec![key.clone(), format_value(val)]);
            }

            println!("{table}");
        }
        _ => {
            println!("{}", format_value(value));
        }
    }
}

/// Render one JSON value as a table cell
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}

/// Render an optional field as a table cell
pub fn cell<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_selects_fields() {
        let data = json!([
            {"id": 1, "label": "a", "status": "complete"},
            {"id": 2, "label": "b", "status": "pending"}
        ]);

        let value = to_queried_value(&data, Some("[?status=='pending'].id")).unwrap();
        assert_eq!(value, json!([2]));
    }

    #[test]
    fn test_no_query_is_identity() {
        let data = json!({"id": 7});
        assert_eq!(to_queried_value(&data, None).unwrap(), data);
    }

    #[test]
    fn test_invalid_query_is_reported() {
        let err = to_queried_value(json!({}), Some("[?")).unwrap_err();
        assert!(err.to_string().contains("Invalid JMESPath expression"));
    }

    #[test]
    fn test_extended_functions_available() {
        assert!(compile_jmespath("upper(label)").is_ok());
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&Value::Null), "-");
        assert_eq!(format_value(&json!(true)), "true");
        assert_eq!(format_value(&json!([1, 2])), "[2 items]");
        assert_eq!(format_value(&json!({"a": 1})), "{1 fields}");
        assert_eq!(cell(Some(5)), "5");
        assert_eq!(cell::<i64>(None), "-");
    }
}
