use super::serializer::{MetricRepr, Serializer};
use crate::error::{ErrorKind, Result};
use crate::model::MetricRecord;

/// Plain JSON records, no schema involved.
#[derive(Debug, Default)]
pub struct JsonSerializer {}

impl JsonSerializer {
    pub fn new() -> Self {
        Self {}
    }
}

impl Serializer for JsonSerializer {
    fn encode(&self, record: &MetricRecord) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&MetricRepr::new(record))
            .map_err(|e| (ErrorKind::Encode, "JSON serialization failed", e))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Labels, SampleValue, Timestamp};

    fn labels() -> Labels {
        vec![("__name__", "foo"), ("labelfoo", "label-bar")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_encode() -> Result<()> {
        #[rustfmt::skip]
        let tests: &[(Timestamp, SampleValue, &str)] = &[
            (0, 456.0, r#"{"value":"456","timestamp":"1970-01-01T00:00:00Z","name":"foo","labels":{"__name__":"foo","labelfoo":"label-bar"}}"#),
            (10000, SampleValue::INFINITY, r#"{"value":"+Inf","timestamp":"1970-01-01T00:00:10Z","name":"foo","labels":{"__name__":"foo","labelfoo":"label-bar"}}"#),
            (10000, SampleValue::NEG_INFINITY, r#"{"value":"-Inf","timestamp":"1970-01-01T00:00:10Z","name":"foo","labels":{"__name__":"foo","labelfoo":"label-bar"}}"#),
            (1500, SampleValue::NAN, r#"{"value":"NaN","timestamp":"1970-01-01T00:00:01Z","name":"foo","labels":{"__name__":"foo","labelfoo":"label-bar"}}"#),
        ];

        let labels = labels();
        let serializer = JsonSerializer::new();
        for &(timestamp, value, expected) in tests {
            let record = MetricRecord::new("foo", &labels, timestamp, value)?;
            let actual = serializer.encode(&record)?;
            assert_eq!(expected, String::from_utf8_lossy(&actual));
        }
        Ok(())
    }

    #[test]
    fn test_encode_is_deterministic() -> Result<()> {
        let labels: Labels = (0..32)
            .map(|i| (format!("label{}", i), format!("value{}", i)))
            .collect();
        let record = MetricRecord::new("foo", &labels, 42, 1.5)?;

        let serializer = JsonSerializer::new();
        assert_eq!(serializer.encode(&record)?, serializer.encode(&record)?);
        Ok(())
    }
}
