use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

use super::card::{CardAttribute, PredicateInfo};
use super::field::Field;
use super::overlay::AttributeFormat;

/// Short date rendering used for `date`/`datetime` formatted values.
const SHORT_DATE: &str = "%-m/%-d/%Y";

/// Converts one raw field into a uniform [`CardAttribute`].
///
/// This function is total: every input member may be missing and resolves to
/// a documented default (empty key, raw label, `None` value). Overlay label
/// overrides are looked up by the field's *raw* label, and PII flags likewise
/// — so a relabeled attribute keeps the PII status of its original label.
///
/// Predicates compose their display text from operator and threshold; a
/// satisfied comparison does not disclose the underlying datum, so predicates
/// are never flagged as PII.
///
/// Format hints are passed through unmodified. Value coercion (such as date
/// rendering) is left to the mapper that owns the value's provenance; see
/// [`coerce_value`].
pub fn normalize_field(
    field: &Field,
    labels: &HashMap<String, String>,
    formats: &HashMap<String, AttributeFormat>,
    flagged_pii: &[String],
) -> CardAttribute {
    let key = field.name().unwrap_or_default().to_string();
    let raw_label = field.label().unwrap_or(&key).to_string();
    let label = labels.get(&raw_label).cloned().unwrap_or_else(|| raw_label.clone());
    let format = formats.get(&key).copied();

    match field {
        Field::Attribute(attr) => CardAttribute {
            key,
            label,
            value: attr.value.clone(),
            format,
            is_pii: flagged_pii.iter().any(|flagged| *flagged == raw_label),
            has_error: attr.has_error,
            predicate: None,
        },
        Field::Predicate(pred) => {
            let text = predicate_text(pred.p_type.as_deref(), pred.p_value.as_ref());
            // Prefer an explicit disclosed value (rare), else the composed text.
            let value = pred
                .value
                .clone()
                .unwrap_or_else(|| Value::String(text.clone()));

            CardAttribute {
                key,
                label,
                value: Some(value),
                format,
                is_pii: false,
                has_error: false,
                predicate: Some(PredicateInfo {
                    satisfied: pred.satisfied,
                    text,
                }),
            }
        }
    }
}

/// Composes `"{operator} {threshold}"`, dropping whichever parts are absent.
fn predicate_text(p_type: Option<&str>, p_value: Option<&Value>) -> String {
    let mut parts = Vec::new();
    if let Some(op) = p_type {
        if !op.is_empty() {
            parts.push(op.to_string());
        }
    }
    if let Some(threshold) = p_value {
        let text = value_text(threshold);
        if !text.is_empty() {
            parts.push(text);
        }
    }
    parts.join(" ").trim().to_string()
}

/// Renders a JSON value as bare text: strings unquoted, everything else in
/// its JSON form.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Applies a format hint to a value: `date`/`datetime` values are re-rendered
/// as a short date, everything else (including values that do not parse as a
/// finite date) passes through unchanged.
pub fn coerce_value(format: Option<AttributeFormat>, value: Value) -> Value {
    match format {
        Some(AttributeFormat::Date) | Some(AttributeFormat::DateTime) => {
            match parse_date(&value) {
                Some(date) => Value::String(date.format(SHORT_DATE).to_string()),
                None => value,
            }
        }
        _ => value,
    }
}

fn parse_date(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.naive_local())
            .ok()
            .or_else(|| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").ok())
            .or_else(|| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            }),
        // Bare numbers are treated as millisecond timestamps.
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .map(|dt| dt.naive_utc()),
        _ => None,
    }
}
