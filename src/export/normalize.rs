use std::io::Read;

use serde_json::{Number, Value};

use super::{BadNumberPolicy, ExportError, ExportSummary, KeyStyle};
use crate::dataset::Entity;

/// Header renames applied under [`KeyStyle::Normalized`] (after lower-casing).
const KEY_RENAMES: &[(&str, &str)] = &[("centre", "name"), ("latitude", "lat"), ("longitude", "lng")];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberKind {
    Integer,
    Float,
}

/// Numeric columns, matched on the lower-cased header before any rename.
fn number_kind(lower_key: &str) -> Option<NumberKind> {
    match lower_key {
        "cost" | "education" | "staff" | "facilities" | "reputation" | "nqs" => {
            Some(NumberKind::Integer)
        }
        "latitude" | "longitude" | "fee_per_day" => Some(NumberKind::Float),
        _ => None,
    }
}

/// A resolved output column.
#[derive(Debug, Clone)]
struct Column {
    index: usize,
    source: String,
    key: String,
    kind: Option<NumberKind>,
}

fn resolve_columns(header: &csv::StringRecord, style: KeyStyle) -> Vec<Column> {
    header
        .iter()
        .enumerate()
        .filter_map(|(index, raw)| {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return None;
            }
            let lower = trimmed.to_lowercase();
            let key = match style {
                KeyStyle::Normalized => KEY_RENAMES
                    .iter()
                    .find(|(from, _)| *from == lower)
                    .map(|(_, to)| to.to_string())
                    .unwrap_or_else(|| lower.clone()),
                KeyStyle::Preserve => trimmed.to_string(),
            };
            Some(Column {
                index,
                source: trimmed.to_string(),
                key,
                kind: number_kind(&lower),
            })
        })
        .collect()
}

/// Keys that must be present and non-empty for a row to be exported.
fn identity_keys(style: KeyStyle) -> [&'static str; 2] {
    match style {
        KeyStyle::Normalized => ["name", "address"],
        KeyStyle::Preserve => ["Centre", "Address"],
    }
}

fn convert_number(raw: &str, kind: NumberKind) -> Option<Value> {
    match kind {
        NumberKind::Integer => raw.parse::<i64>().ok().map(Value::from),
        NumberKind::Float => raw
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number),
    }
}

fn has_identity(record: &Entity, style: KeyStyle) -> bool {
    identity_keys(style).iter().all(|key| match record.get(key) {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    })
}

/// Normalized records plus counts of what was dropped along the way.
#[derive(Debug, Clone, Default)]
pub struct NormalizedRows {
    pub records: Vec<Entity>,
    pub summary: ExportSummary,
}

/// Convert raw CSV rows into front-end records.
///
/// Cells are trimmed and empty cells become null. Numeric columns are
/// converted to integers or floats; a failure is handled per `policy`.
/// Rows without a name and address are dropped. Rows the CSV reader
/// cannot decode are logged and skipped.
pub fn normalize_csv<R: Read>(
    reader: R,
    style: KeyStyle,
    policy: BadNumberPolicy,
) -> Result<NormalizedRows, ExportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);
    let columns = resolve_columns(csv_reader.headers()?, style);

    let mut out = NormalizedRows::default();

    for (i, result) in csv_reader.records().enumerate() {
        // Line number as seen in the file, header on line 1
        let line = i + 2;
        tracing::debug!(line, "processing CSV row");

        let record = match result {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(line, error = %e, "skipping unreadable row");
                out.summary.skipped_malformed += 1;
                continue;
            }
        };

        let mut entity = Entity::new();
        let mut bad_number = false;

        for column in &columns {
            let raw = record.get(column.index).map(str::trim).unwrap_or("");
            let value = if raw.is_empty() {
                Value::Null
            } else if let Some(kind) = column.kind {
                match convert_number(raw, kind) {
                    Some(v) => v,
                    None => {
                        tracing::warn!(
                            line,
                            column = %column.source,
                            value = raw,
                            "could not convert value to {}",
                            match kind {
                                NumberKind::Integer => "integer",
                                NumberKind::Float => "float",
                            }
                        );
                        bad_number = true;
                        if policy == BadNumberPolicy::SkipRow {
                            break;
                        }
                        out.summary.nulled_fields += 1;
                        Value::Null
                    }
                }
            } else {
                Value::String(raw.to_string())
            };
            entity.insert(column.key.clone(), value);
        }

        if bad_number && policy == BadNumberPolicy::SkipRow {
            tracing::warn!(line, "skipping row with unconvertible numeric field");
            out.summary.skipped_bad_number += 1;
            continue;
        }

        if !has_identity(&entity, style) {
            tracing::warn!(line, "skipping row with missing name or address");
            out.summary.skipped_missing_identity += 1;
            continue;
        }

        tracing::debug!(
            line,
            name = %entity.text(identity_keys(style)[0]).unwrap_or_default(),
            "row accepted"
        );
        out.records.push(entity);
    }

    out.summary.written = out.records.len();
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ENRICHED: &str = "\
Centre,Cost,Education,Staff,Facilities,Reputation,NQS,Address,Latitude,Longitude
Sunrise Early Learning,7,8,9,8,8,9,1 Main St,-33.86,151.21
Bright Futures,6,7,8,7,7,8,2 High St,-33.90,151.10
";

    fn normalize(csv: &str, style: KeyStyle, policy: BadNumberPolicy) -> NormalizedRows {
        normalize_csv(csv.as_bytes(), style, policy).unwrap()
    }

    #[test]
    fn test_normalized_keys_and_types() {
        let rows = normalize(ENRICHED, KeyStyle::Normalized, BadNumberPolicy::NullField);
        assert_eq!(rows.summary.written, 2);

        let first = &rows.records[0];
        let keys: Vec<&str> = first.fields().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec![
                "name",
                "cost",
                "education",
                "staff",
                "facilities",
                "reputation",
                "nqs",
                "address",
                "lat",
                "lng"
            ]
        );
        assert_eq!(first.get("name"), Some(&json!("Sunrise Early Learning")));
        assert_eq!(first.get("cost"), Some(&json!(7)));
        assert_eq!(first.get("lat"), Some(&json!(-33.86)));
        assert_eq!(first.get("lng"), Some(&json!(151.21)));
    }

    #[test]
    fn test_preserve_keys() {
        let rows = normalize(ENRICHED, KeyStyle::Preserve, BadNumberPolicy::NullField);
        let first = &rows.records[0];
        assert_eq!(first.get("Centre"), Some(&json!("Sunrise Early Learning")));
        assert_eq!(first.get("NQS"), Some(&json!(9)));
        assert_eq!(first.get("Latitude"), Some(&json!(-33.86)));
        assert!(first.get("name").is_none());
    }

    #[test]
    fn test_headers_trimmed_and_lowercased() {
        let csv = " Centre , COST ,Address\nA, 3 ,Somewhere\n";
        let rows = normalize(csv, KeyStyle::Normalized, BadNumberPolicy::NullField);
        assert_eq!(rows.records[0].get("name"), Some(&json!("A")));
        assert_eq!(rows.records[0].get("cost"), Some(&json!(3)));
    }

    #[test]
    fn test_integer_column_rejects_decimal() {
        let csv = "centre,cost,address\nA,7.5,Somewhere\n";
        let rows = normalize(csv, KeyStyle::Normalized, BadNumberPolicy::NullField);
        assert_eq!(rows.records[0].get("cost"), Some(&Value::Null));
        assert_eq!(rows.summary.nulled_fields, 1);
    }

    #[test]
    fn test_null_field_policy_keeps_row() {
        let csv = "centre,cost,staff,address\nA,cheap,5,Somewhere\n";
        let rows = normalize(csv, KeyStyle::Normalized, BadNumberPolicy::NullField);
        assert_eq!(rows.summary.written, 1);
        assert_eq!(rows.records[0].get("cost"), Some(&Value::Null));
        assert_eq!(rows.records[0].get("staff"), Some(&json!(5)));
    }

    #[test]
    fn test_skip_row_policy_drops_row() {
        let csv = "centre,cost,address\nA,cheap,Somewhere\nB,4,Elsewhere\n";
        let rows = normalize(csv, KeyStyle::Normalized, BadNumberPolicy::SkipRow);
        assert_eq!(rows.summary.written, 1);
        assert_eq!(rows.summary.skipped_bad_number, 1);
        assert_eq!(rows.summary.nulled_fields, 0);
        assert_eq!(rows.records[0].get("name"), Some(&json!("B")));
    }

    #[test]
    fn test_non_finite_float_is_bad_number() {
        let csv = "centre,address,latitude\nA,Somewhere,nan\n";
        let rows = normalize(csv, KeyStyle::Normalized, BadNumberPolicy::NullField);
        assert_eq!(rows.records[0].get("lat"), Some(&Value::Null));
    }

    #[test]
    fn test_fee_per_day_is_float() {
        let csv = "centre,address,fee_per_day\nA,Somewhere,112.50\n";
        let rows = normalize(csv, KeyStyle::Normalized, BadNumberPolicy::NullField);
        assert_eq!(rows.records[0].get("fee_per_day"), Some(&json!(112.5)));
    }

    #[test]
    fn test_empty_cells_become_null() {
        let csv = "centre,phone,cost,address\nA,,,Somewhere\n";
        let rows = normalize(csv, KeyStyle::Normalized, BadNumberPolicy::SkipRow);
        assert_eq!(rows.summary.written, 1);
        assert_eq!(rows.records[0].get("phone"), Some(&Value::Null));
        assert_eq!(rows.records[0].get("cost"), Some(&Value::Null));
    }

    #[test]
    fn test_missing_identity_dropped() {
        let csv = "centre,address\n,1 Main St\nB,\nC,3 Low St\n";
        let rows = normalize(csv, KeyStyle::Normalized, BadNumberPolicy::NullField);
        assert_eq!(rows.summary.written, 1);
        assert_eq!(rows.summary.skipped_missing_identity, 2);
        assert_eq!(rows.records[0].get("name"), Some(&json!("C")));
    }

    #[test]
    fn test_missing_identity_columns_drop_everything() {
        let csv = "title,cost\nA,1\n";
        let rows = normalize(csv, KeyStyle::Normalized, BadNumberPolicy::NullField);
        assert!(rows.records.is_empty());
        assert_eq!(rows.summary.skipped_missing_identity, 1);
    }

    #[test]
    fn test_preserve_identity_uses_original_names() {
        let csv = "Centre,Address\nA,Somewhere\n";
        let rows = normalize(csv, KeyStyle::Preserve, BadNumberPolicy::NullField);
        assert_eq!(rows.summary.written, 1);

        let csv = "centre,address\nA,Somewhere\n";
        let rows = normalize(csv, KeyStyle::Preserve, BadNumberPolicy::NullField);
        assert_eq!(rows.summary.written, 0);
    }

    #[test]
    fn test_empty_header_columns_skipped() {
        let csv = "centre,,address\nA,junk,Somewhere\n";
        let rows = normalize(csv, KeyStyle::Normalized, BadNumberPolicy::NullField);
        assert_eq!(rows.records[0].len(), 2);
    }

    #[test]
    fn test_short_row_fields_are_null() {
        let csv = "centre,address,cost\nA,Somewhere\n";
        let rows = normalize(csv, KeyStyle::Normalized, BadNumberPolicy::NullField);
        assert_eq!(rows.records[0].get("cost"), Some(&Value::Null));
    }

    #[test]
    fn test_duplicate_keys_later_column_wins() {
        let csv = "Centre,centre,address\nFirst,Second,Somewhere\n";
        let rows = normalize(csv, KeyStyle::Normalized, BadNumberPolicy::NullField);
        let record = &rows.records[0];
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("name"), Some(&json!("Second")));
        assert_eq!(record.fields().next().map(|(k, _)| k), Some("name"));
    }

    #[test]
    fn test_header_only() {
        let rows = normalize("centre,address\n", KeyStyle::Normalized, BadNumberPolicy::NullField);
        assert!(rows.records.is_empty());
        assert_eq!(rows.summary, ExportSummary::default());
    }
}
