use std::collections::HashMap;

use serde_json::Value;

use crate::data_models::{RelatedQueryEntry, RelatedQueryResult, TrendsResponse};

/// Both tables for one keyword, as they came off the wire.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawKeywordTables {
    pub top: Option<Value>,
    pub rising: Option<Value>,
}

/// Upstream output keyed by keyword. A keyword may map to `None` when the
/// provider had nothing for it.
pub type RawRelatedQueries = HashMap<String, Option<RawKeywordTables>>;

#[derive(Debug, Clone, PartialEq)]
pub enum NormalizeOutcome {
    Results(TrendsResponse),
    /// Every requested keyword came back with both lists empty.
    AllEmpty,
}

/// Reshape raw upstream tables into one `{top, rising}` pair per requested keyword.
///
/// Keywords the provider did not mention still get an (empty) entry; keywords
/// the provider returned but that were not requested are dropped.
pub fn normalize(requested: &[String], raw: &RawRelatedQueries) -> NormalizeOutcome {
    let results: TrendsResponse = requested
        .iter()
        .map(|keyword| {
            let result = match raw.get(keyword) {
                Some(Some(tables)) => RelatedQueryResult {
                    top: to_records(keyword, "top", tables.top.as_ref()),
                    rising: to_records(keyword, "rising", tables.rising.as_ref()),
                },
                _ => RelatedQueryResult::default(),
            };
            (keyword.clone(), result)
        })
        .collect();

    if results.values().all(RelatedQueryResult::is_empty) {
        return NormalizeOutcome::AllEmpty;
    }
    NormalizeOutcome::Results(results)
}

fn to_records(keyword: &str, table: &str, value: Option<&Value>) -> Vec<RelatedQueryEntry> {
    let rows = match value {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Array(rows)) => rows,
        Some(other) => {
            tracing::warn!(
                keyword,
                table,
                kind = json_kind(other),
                "upstream table is not tabular, treating as empty"
            );
            return Vec::new();
        }
    };

    rows.iter()
        .filter_map(|row| {
            let record = to_record(row);
            if record.is_none() {
                tracing::debug!(keyword, table, ?row, "skipping malformed related-query row");
            }
            record
        })
        .collect()
}

fn to_record(row: &Value) -> Option<RelatedQueryEntry> {
    let query = row.get("query")?.as_str()?;
    let value = row.get("value")?;
    let value = match value.as_i64() {
        Some(v) => v,
        None => {
            let f = value.as_f64()?;
            if f.fract() != 0.0 {
                return None;
            }
            f as i64
        }
    };
    Some(RelatedQueryEntry::new(query, value))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
