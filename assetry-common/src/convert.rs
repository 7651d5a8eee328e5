//! 模型与 DTO 之间的字段拷贝

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("expected a json object, got {0}")]
    NotObject(&'static str),
}

/// Copies every field of `source` into a fresh `D`.
///
/// Field names are matched as written, in camelCase and in snake_case, so a
/// camelCase command can be copied into a snake_case entity model and back.
/// Fields missing in the source (or `null`) keep the value of `D::default()`.
pub fn copy<S, D>(source: &S) -> Result<D, ConvertError>
where
    S: Serialize,
    D: DeserializeOwned + Serialize + Default,
{
    merge(source, &D::default())
}

/// Like [`copy`] but fields missing in the source keep the value of `base`,
/// so a partial command can be laid over a stored row.
pub fn merge<S, D>(source: &S, base: &D) -> Result<D, ConvertError>
where
    S: Serialize,
    D: DeserializeOwned + Serialize,
{
    let Value::Object(src) = serde_json::to_value(source)? else {
        return Err(ConvertError::NotObject("source"));
    };
    let Value::Object(defaults) = serde_json::to_value(base)? else {
        return Err(ConvertError::NotObject("destination"));
    };

    let mut out = Map::with_capacity(defaults.len());
    for (key, default) in defaults {
        let value = lookup(&src, &key)
            .map(|v| coerce(v, &default))
            .unwrap_or_else(|| default.clone());
        out.insert(key, value);
    }
    Ok(serde_json::from_value(Value::Object(out))?)
}

fn lookup<'a>(src: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    src.get(key)
        .or_else(|| src.get(&snake_to_camel(key)))
        .or_else(|| src.get(&camel_to_snake(key)))
}

// null 保留目标默认值，其余按目标字段类型做宽松转换
fn coerce(value: &Value, target: &Value) -> Value {
    if value.is_null() {
        return target.clone();
    }
    match (target, value) {
        (Value::String(_), Value::String(_)) => value.clone(),
        (Value::String(_), Value::Number(n)) => Value::String(n.to_string()),
        (Value::String(_), Value::Bool(b)) => Value::String(b.to_string()),
        (Value::String(_), _) => target.clone(),
        (Value::Number(_), Value::Number(_)) => value.clone(),
        (Value::Number(_), Value::String(s)) => Number::from_str(s.trim())
            .map(Value::Number)
            .unwrap_or_else(|_| target.clone()),
        (Value::Number(_), _) => target.clone(),
        (Value::Bool(_), Value::Bool(_)) => value.clone(),
        (Value::Bool(_), Value::String(s)) => Value::Bool(matches!(s.as_str(), "true" | "1")),
        (Value::Bool(_), Value::Number(n)) => Value::Bool(n.as_i64() == Some(1)),
        (Value::Bool(_), _) => Value::Bool(false),
        _ => value.clone(),
    }
}

pub fn camel_to_snake(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    for (i, c) in input.chars().enumerate() {
        if c.is_uppercase() {
            if i != 0 {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

pub fn snake_to_camel(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut upper_next = false;
    for c in input.chars() {
        if c == '_' {
            upper_next = !out.is_empty();
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct WarehouseCmd {
        id: Option<String>,
        name: String,
        rack_count: String,
        is_remote: String,
    }

    #[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
    struct WarehouseRow {
        id: String,
        name: String,
        rack_count: i32,
        is_remote: bool,
        remark: String,
    }

    #[test]
    fn copy_matches_camel_case_and_coerces() {
        let cmd = WarehouseCmd {
            id: None,
            name: "Warsaw".to_string(),
            rack_count: "12".to_string(),
            is_remote: "1".to_string(),
        };
        let row: WarehouseRow = copy(&cmd).unwrap();
        assert_eq!(
            row,
            WarehouseRow {
                id: String::new(),
                name: "Warsaw".to_string(),
                rack_count: 12,
                is_remote: true,
                remark: String::new(),
            }
        );
    }

    #[test]
    fn copy_keeps_default_on_bad_number() {
        let cmd = WarehouseCmd {
            id: Some("w-1".to_string()),
            name: "Gdansk".to_string(),
            rack_count: "twelve".to_string(),
            is_remote: "no".to_string(),
        };
        let row: WarehouseRow = copy(&cmd).unwrap();
        assert_eq!(row.id, "w-1");
        assert_eq!(row.rack_count, 0);
        assert!(!row.is_remote);
    }

    #[test]
    fn merge_keeps_base_fields() {
        let base = WarehouseRow {
            id: "w-2".to_string(),
            name: "Old".to_string(),
            rack_count: 3,
            is_remote: false,
            remark: "keep me".to_string(),
        };
        let cmd = WarehouseCmd {
            id: None,
            name: "New".to_string(),
            rack_count: "4".to_string(),
            is_remote: "true".to_string(),
        };
        let row: WarehouseRow = merge(&cmd, &base).unwrap();
        assert_eq!(row.id, "w-2");
        assert_eq!(row.name, "New");
        assert_eq!(row.rack_count, 4);
        assert_eq!(row.remark, "keep me");
    }

    #[test]
    fn case_conversion() {
        assert_eq!(camel_to_snake("deprecationEndDate"), "deprecation_end_date");
        assert_eq!(snake_to_camel("deprecation_end_date"), "deprecationEndDate");
        assert_eq!(snake_to_camel("_private"), "private");
    }
}
