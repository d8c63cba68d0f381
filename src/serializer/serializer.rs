use std::collections::BTreeMap;
use std::convert::TryFrom;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Serialize;

use super::avro::AvroJsonSerializer;
use super::json::JsonSerializer;
use crate::error::{Error, Result};
use crate::model::{format_rfc3339, format_sample_value, MetricRecord};

/// Encodes one sample into the bytes of one message.
///
/// Implementations are built once and shared, read-only, by every caller.
pub trait Serializer: Send + Sync {
    fn encode(&self, record: &MetricRecord) -> Result<Vec<u8>>;
}

/// Field names of every encoded record, in output order.
pub(super) const RECORD_FIELDS: [&str; 4] = ["value", "timestamp", "name", "labels"];

// {
//   "value": "456",
//   "timestamp": "1970-01-01T00:00:00Z",
//   "name": "foo",
//   "labels": {"__name__": "foo", "labelfoo": "label-bar"}
// }
#[derive(Serialize)]
pub(super) struct MetricRepr<'a> {
    value: String,
    timestamp: String,
    name: &'a str,
    labels: BTreeMap<&'a str, &'a str>,
}

impl<'a> MetricRepr<'a> {
    pub(super) fn new(record: &MetricRecord<'a>) -> Self {
        Self {
            value: format_sample_value(record.value()),
            timestamp: format_rfc3339(record.timestamp()),
            name: record.name(),
            labels: record
                .labels()
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect(),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SerializationFormat {
    Json,
    AvroJson,
}

impl SerializationFormat {
    /// Builds the serializer for this format. The schema is only read
    /// by the formats that need one.
    pub fn serializer<P: AsRef<Path>>(&self, schema: P) -> Result<Box<dyn Serializer>> {
        Ok(match self {
            SerializationFormat::Json => Box::new(JsonSerializer::new()),
            SerializationFormat::AvroJson => Box::new(AvroJsonSerializer::new(schema)?),
        })
    }
}

impl TryFrom<&str> for SerializationFormat {
    type Error = Error;

    fn try_from(format: &str) -> Result<Self> {
        match format {
            "json" => Ok(SerializationFormat::Json),
            "avro-json" => Ok(SerializationFormat::AvroJson),
            _ => Err(Error::new(&format!(
                "unknown serialization format \"{}\", expected one of \"json\", \"avro-json\"",
                format
            ))),
        }
    }
}

impl FromStr for SerializationFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::try_from(s)
    }
}

impl fmt::Display for SerializationFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SerializationFormat::Json => write!(f, "json"),
            SerializationFormat::AvroJson => write!(f, "avro-json"),
        }
    }
}
