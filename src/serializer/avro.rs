use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use apache_avro::{to_value, types::Value as AvroValue, Schema};
use serde_json::{self, Map, Number, Value as JsonValue};

use super::serializer::{MetricRepr, Serializer, RECORD_FIELDS};
use crate::error::{Error, ErrorKind, Result};
use crate::model::MetricRecord;

/// JSON records checked against an Avro schema.
///
/// Every record is resolved against the schema before being rendered, so a
/// schema that doesn't describe the record shape makes encoding fail instead
/// of silently producing off-schema messages. Fields come out in schema
/// order; with the bundled schema the bytes are the plain serializer's.
#[derive(Debug)]
pub struct AvroJsonSerializer {
    schema: Schema,
}

impl AvroJsonSerializer {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            Error::from((
                ErrorKind::SchemaLoad,
                format!("couldn't read schema file {}", path.display()).as_str(),
                e,
            ))
        })?;
        Self::parse(&text)
    }

    pub fn parse(schema: &str) -> Result<Self> {
        let schema = Schema::parse_str(schema).map_err(|e| {
            Error::with_kind(
                ErrorKind::SchemaLoad,
                &format!("malformed Avro schema: {}", e),
            )
        })?;
        Ok(Self { schema })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

impl Serializer for AvroJsonSerializer {
    fn encode(&self, record: &MetricRecord) -> Result<Vec<u8>> {
        let value = to_value(MetricRepr::new(record))
            .and_then(|v| v.resolve(&self.schema))
            .map_err(|e| {
                Error::with_kind(
                    ErrorKind::Encode,
                    &format!("record doesn't match the Avro schema: {}", e),
                )
            })?;
        check_fields(&value)?;

        Ok(serde_json::to_vec(&to_json(value)?)
            .map_err(|e| (ErrorKind::Encode, "JSON serialization failed", e))?)
    }
}

// Resolution drops record fields the schema lacks and fills in defaulted
// fields the record lacks. Either way the message would no longer be a metric
// record.
fn check_fields(value: &AvroValue) -> Result<()> {
    let fields = match value {
        AvroValue::Record(fields) => fields,
        _ => {
            return Err(Error::with_kind(
                ErrorKind::Encode,
                "Avro schema must describe a record",
            ))
        }
    };

    let mut actual: Vec<&str> = fields.iter().map(|(name, _)| name.as_str()).collect();
    actual.sort_unstable();
    let mut expected = RECORD_FIELDS;
    expected.sort_unstable();

    if actual != expected {
        return Err(Error::with_kind(
            ErrorKind::Encode,
            &format!(
                "Avro schema fields {:?} don't match the record fields {:?}",
                actual, expected
            ),
        ));
    }
    Ok(())
}

// Avro JSON encoding of a resolved value. Map keys are sorted so the output
// doesn't depend on hash map iteration order.
fn to_json(value: AvroValue) -> Result<JsonValue> {
    Ok(match value {
        AvroValue::Null => JsonValue::Null,
        AvroValue::Boolean(b) => JsonValue::Bool(b),
        AvroValue::Int(n) => JsonValue::from(n),
        AvroValue::Long(n) => JsonValue::from(n),
        AvroValue::Float(n) => float(n as f64)?,
        AvroValue::Double(n) => float(n)?,
        AvroValue::String(s) => JsonValue::String(s),
        AvroValue::Enum(_, symbol) => JsonValue::String(symbol),
        AvroValue::Union(_, inner) => to_json(*inner)?,
        AvroValue::Array(items) => JsonValue::Array(
            items
                .into_iter()
                .map(to_json)
                .collect::<Result<Vec<_>>>()?,
        ),
        AvroValue::Map(items) => {
            let sorted: BTreeMap<String, AvroValue> = items.into_iter().collect();
            let mut map = Map::new();
            for (k, v) in sorted {
                map.insert(k, to_json(v)?);
            }
            JsonValue::Object(map)
        }
        AvroValue::Record(fields) => {
            let mut map = Map::new();
            for (k, v) in fields {
                map.insert(k, to_json(v)?);
            }
            JsonValue::Object(map)
        }
        other => {
            return Err(Error::with_kind(
                ErrorKind::Encode,
                &format!("unsupported Avro value in metric record: {:?}", other),
            ))
        }
    })
}

fn float(n: f64) -> Result<JsonValue> {
    Number::from_f64(n).map(JsonValue::Number).ok_or_else(|| {
        Error::with_kind(
            ErrorKind::Encode,
            &format!("{} can't be represented in JSON", n),
        )
    })
}
