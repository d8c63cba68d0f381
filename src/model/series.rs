use serde::{Deserialize, Deserializer};

use super::labels::{LabelName, LabelValue, Labels, LABEL_NAME};
use super::sample::{parse_sample_value, SampleValue};
use super::timestamp::Timestamp;

// Mirrors the Prometheus remote-write protobuf messages. Decoding the wire
// format happens elsewhere, these types only carry the decoded data.

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct WriteRequest {
    #[serde(default)]
    pub timeseries: Vec<TimeSeries>,
}

impl WriteRequest {
    pub fn new(timeseries: Vec<TimeSeries>) -> Self {
        Self { timeseries }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct TimeSeries {
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub samples: Vec<Sample>,
}

impl TimeSeries {
    pub fn new(labels: Vec<Label>, samples: Vec<Sample>) -> Self {
        Self { labels, samples }
    }

    /// Metric name, i.e. the value of the reserved name label. With
    /// duplicates the last one wins, as in `label_map()`.
    pub fn name(&self) -> Option<&str> {
        self.labels
            .iter()
            .rev()
            .find(|l| l.name == LABEL_NAME)
            .map(|l| l.value.as_str())
    }

    /// Later duplicates of a label override earlier ones.
    pub fn label_map(&self) -> Labels {
        self.labels
            .iter()
            .map(|l| (l.name.clone(), l.value.clone()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Label {
    pub name: LabelName,
    pub value: LabelValue,
}

impl Label {
    pub fn new<N, V>(name: N, value: V) -> Self
    where
        N: Into<LabelName>,
        V: Into<LabelValue>,
    {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Sample {
    #[serde(deserialize_with = "deserialize_sample_value")]
    pub value: SampleValue,
    pub timestamp: Timestamp,
}

impl Sample {
    pub fn new(timestamp: Timestamp, value: SampleValue) -> Self {
        Self { value, timestamp }
    }
}

// JSON has no literals for the special float values.
fn deserialize_sample_value<'de, D>(deserializer: D) -> Result<SampleValue, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(SampleValue),
        Text(String),
    }

    match Repr::deserialize(deserializer)? {
        Repr::Number(n) => Ok(n),
        Repr::Text(s) => parse_sample_value(&s).map_err(serde::de::Error::custom),
    }
}
