//! Reading JSON records from a file or stdin

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::io::AsyncReadExt;
use tracing::debug;

use crate::domain::DomainError;

/// Records parsed from the input, remembering whether it was a JSON array
#[derive(Debug)]
pub struct Records<T> {
    pub items: Vec<T>,
    pub is_batch: bool,
}

/// Read the whole input; `-` means stdin
pub async fn read_input(path: &str) -> Result<String, DomainError> {
    let text = if path == "-" {
        let mut buf = String::new();
        tokio::io::stdin().read_to_string(&mut buf).await?;
        buf
    } else {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| DomainError::io(format!("{}: {}", path, e)))?
    };

    debug!(path, bytes = text.len(), "Read input");
    Ok(text)
}

/// Parse a single JSON object or an array of objects
pub fn parse_records<T: DeserializeOwned>(text: &str) -> Result<Records<T>, DomainError> {
    match serde_json::from_str::<Value>(text)? {
        Value::Array(values) => {
            let items = values
                .into_iter()
                .enumerate()
                .map(|(index, value)| {
                    serde_json::from_value(value).map_err(|e| {
                        DomainError::malformed_input(format!("record #{}: {}", index, e))
                    })
                })
                .collect::<Result<Vec<T>, _>>()?;
            Ok(Records {
                items,
                is_batch: true,
            })
        }
        value @ Value::Object(_) => Ok(Records {
            items: vec![serde_json::from_value(value)?],
            is_batch: false,
        }),
        _ => Err(DomainError::malformed_input(
            "expected a JSON object or an array of objects",
        )),
    }
}
