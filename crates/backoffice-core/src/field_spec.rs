// ── Field-spec encoding ──
//
// One visual form field may stand for several data keys. The key
// `"[start,end:number]"` binds a two-slot array in the form model to the
// flat record keys `start` and `end`, with `end` coerced to a number on
// the way in and the way out. Coercion happens only at these two
// boundaries; the form model always stores the raw positional slots.

use serde_json::{Number, Value};
use tracing::warn;

use crate::source::Record;

/// A form model: field key (possibly bracketed) to raw value.
pub type FormModel = serde_json::Map<String, Value>;

/// Primitive coercion requested by a `:number` / `:boolean` suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Coercion {
    Number,
    Boolean,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubKey {
    pub name: String,
    pub coercion: Option<Coercion>,
}

impl SubKey {
    fn parse(token: &str) -> Self {
        let suffixed = token
            .rsplit_once(':')
            .filter(|(name, _)| !name.is_empty())
            .and_then(|(name, suffix)| Some((name, suffix.parse::<Coercion>().ok()?)));
        match suffixed {
            Some((name, coercion)) => Self {
                name: name.to_owned(),
                coercion: Some(coercion),
            },
            None => Self {
                name: token.to_owned(),
                coercion: None,
            },
        }
    }
}

/// Parsed form of a model key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSpec {
    /// A plain key, copied verbatim.
    Single(String),
    /// A bracketed key with one slot per subkey.
    Multi(Vec<SubKey>),
}

impl FieldSpec {
    /// Parse a model key. Whitespace is ignored inside brackets; anything
    /// that is not `[...]` with a non-empty body is a single key.
    pub fn parse(key: &str) -> Self {
        let stripped: String = key.chars().filter(|c| !c.is_whitespace()).collect();
        let Some(body) = stripped
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
        else {
            return Self::Single(key.to_owned());
        };
        if body.is_empty() {
            warn!(key, "bracketed field key has no subkeys, using it literally");
            return Self::Single(key.to_owned());
        }
        Self::Multi(body.split(',').map(SubKey::parse).collect())
    }

    pub fn is_multi(&self) -> bool {
        matches!(self, Self::Multi(_))
    }

    /// The flat record keys this field reads and writes.
    pub fn keys(&self) -> Vec<&str> {
        match self {
            Self::Single(key) => vec![key.as_str()],
            Self::Multi(subkeys) => subkeys.iter().map(|s| s.name.as_str()).collect(),
        }
    }
}

/// Falsy in the loose sense used by form data: `null`, `false`, `0`, `""`.
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f == 0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn coerce_number(value: &Value) -> Value {
    match value {
        Value::Number(_) => value.clone(),
        Value::Bool(b) => Value::from(u8::from(*b)),
        Value::String(s) => {
            let trimmed = s.trim();
            if let Ok(int) = trimmed.parse::<i64>() {
                Value::from(int)
            } else {
                trimmed
                    .parse::<f64>()
                    .ok()
                    .and_then(Number::from_f64)
                    .map_or(Value::Null, Value::Number)
            }
        }
        Value::Null | Value::Array(_) | Value::Object(_) => Value::Null,
    }
}

/// Apply a slot's coercion. Falsy sources are never coerced and become
/// `null`, so "absent" stays distinguishable from `0` or `false`.
fn coerce(value: Option<&Value>, coercion: Option<Coercion>) -> Value {
    let value = value.unwrap_or(&Value::Null);
    match coercion {
        None => value.clone(),
        Some(_) if is_falsy(value) => Value::Null,
        Some(Coercion::Number) => coerce_number(value),
        Some(Coercion::Boolean) => Value::Bool(true),
    }
}

/// Fill `model` from a flat record (setModel).
///
/// Every key already present in `model` is rewritten from `raw`; keys not
/// in `model` are ignored.
pub fn decode(model: &FormModel, raw: &Record) -> FormModel {
    model
        .keys()
        .map(|key| {
            let value = match FieldSpec::parse(key) {
                FieldSpec::Single(_) => raw.get(key).cloned().unwrap_or(Value::Null),
                FieldSpec::Multi(subkeys) => Value::Array(
                    subkeys
                        .iter()
                        .map(|sub| coerce(raw.get(&sub.name), sub.coercion))
                        .collect(),
                ),
            };
            (key.clone(), value)
        })
        .collect()
}

/// Flatten a form model into a record (getModel).
pub fn encode(model: &FormModel) -> Record {
    let mut out = Record::new();
    for (key, value) in model {
        match FieldSpec::parse(key) {
            FieldSpec::Single(_) => {
                out.insert(key.clone(), value.clone());
            }
            FieldSpec::Multi(subkeys) => {
                let slots = value.as_array();
                for (index, sub) in subkeys.iter().enumerate() {
                    let slot = slots.and_then(|s| s.get(index));
                    out.insert(sub.name.clone(), coerce(slot, sub.coercion));
                }
            }
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn bracketed_keys_parse_with_coercions() {
        let spec = FieldSpec::parse("[ a, b:number ,c:boolean ]");
        assert_eq!(
            spec,
            FieldSpec::Multi(vec![
                SubKey { name: "a".into(), coercion: None },
                SubKey { name: "b".into(), coercion: Some(Coercion::Number) },
                SubKey { name: "c".into(), coercion: Some(Coercion::Boolean) },
            ])
        );
        assert_eq!(spec.keys(), vec!["a", "b", "c"]);
    }

    #[test]
    fn plain_and_degenerate_keys_are_single() {
        assert_eq!(FieldSpec::parse("name"), FieldSpec::Single("name".into()));
        assert_eq!(FieldSpec::parse("[a"), FieldSpec::Single("[a".into()));
        assert_eq!(FieldSpec::parse("[ ]"), FieldSpec::Single("[ ]".into()));
    }

    #[test]
    fn unknown_suffix_stays_part_of_the_name() {
        let FieldSpec::Multi(subkeys) = FieldSpec::parse("[at:date]") else {
            panic!("expected multi");
        };
        assert_eq!(subkeys[0].name, "at:date");
        assert_eq!(subkeys[0].coercion, None);
    }

    #[test]
    fn decode_builds_one_slot_per_subkey() {
        let model = record(json!({ "[a,b:number,c:boolean]": null, "name": "old" }));
        let raw = record(json!({ "a": "x", "b": "42", "c": 1, "name": "Alice" }));

        let decoded = decode(&model, &raw);
        assert_eq!(
            Value::Object(decoded),
            json!({ "[a,b:number,c:boolean]": ["x", 42, true], "name": "Alice" })
        );
    }

    #[test]
    fn falsy_sources_decode_to_null() {
        let model = record(json!({ "[a,b:number,c:boolean]": [] }));
        let raw = record(json!({ "a": 0, "b": 0, "c": false }));

        let decoded = decode(&model, &raw);
        // Unsuffixed slots keep the raw value; coerced slots skip coercion.
        assert_eq!(decoded["[a,b:number,c:boolean]"], json!([0, null, null]));
    }

    #[test]
    fn multi_key_round_trips_truthy_values() {
        let model = record(json!({ "[a,b:number,c:boolean]": null }));
        let raw = record(json!({ "a": "x", "b": 7, "c": true }));

        let encoded = encode(&decode(&model, &raw));
        assert_eq!(Value::Object(encoded), json!({ "a": "x", "b": 7, "c": true }));
    }

    #[test]
    fn multi_key_round_trip_drops_falsy_coerced_values() {
        let model = record(json!({ "[a,b:number,c:boolean]": null }));
        let raw = record(json!({ "a": "", "c": false }));

        let encoded = encode(&decode(&model, &raw));
        assert_eq!(Value::Object(encoded), json!({ "a": "", "b": null, "c": null }));
    }

    #[test]
    fn encode_handles_short_or_missing_arrays() {
        let model = record(json!({ "[from,to]": ["2024-01-01"], "[x,y]": null }));
        let encoded = encode(&model);
        assert_eq!(
            Value::Object(encoded),
            json!({ "from": "2024-01-01", "to": null, "x": null, "y": null })
        );
    }

    #[test]
    fn number_coercion_rejects_garbage() {
        let model = record(json!({ "[n:number]": ["abc"] }));
        assert_eq!(encode(&model)["n"], Value::Null);
        let model = record(json!({ "[n:number]": ["1.5"] }));
        assert_eq!(encode(&model)["n"], json!(1.5));
    }
}
