use chrono::{DateTime, Utc};

use super::labels::Labels;
use super::sample::SampleValue;
use super::timestamp::{to_utc, Timestamp};
use crate::error::Result;

/// One sample of one series, the unit every serializer encodes.
#[derive(Debug, Clone)]
pub struct MetricRecord<'a> {
    name: &'a str,
    labels: &'a Labels,
    timestamp: DateTime<Utc>,
    value: SampleValue,
}

impl<'a> MetricRecord<'a> {
    pub fn new(
        name: &'a str,
        labels: &'a Labels,
        timestamp: Timestamp,
        value: SampleValue,
    ) -> Result<Self> {
        Ok(Self {
            name,
            labels,
            timestamp: to_utc(timestamp)?,
            value,
        })
    }

    #[inline]
    pub fn name(&self) -> &'a str {
        self.name
    }

    #[inline]
    pub fn labels(&self) -> &'a Labels {
        self.labels
    }

    #[inline]
    pub fn timestamp(&self) -> &DateTime<Utc> {
        &self.timestamp
    }

    #[inline]
    pub fn value(&self) -> SampleValue {
        self.value
    }
}
