use std::collections::BTreeMap;
use std::{error, fmt};

use log::debug;

use super::config::Config;
use crate::error::Error;
use crate::model::{MetricRecord, WriteRequest, LABEL_NAME};
use crate::serializer::Serializer;

/// Encoded records keyed by topic, in production order within a topic.
pub type TopicRecords = BTreeMap<String, Vec<Vec<u8>>>;

/// A failed serialize call: the error plus whatever was produced
/// before it happened.
pub struct Incomplete {
    error: Error,
    partial: TopicRecords,
}

impl Incomplete {
    pub fn new(error: Error, partial: TopicRecords) -> Self {
        Self { error, partial }
    }

    pub fn error(&self) -> &Error {
        &self.error
    }

    pub fn partial(&self) -> &TopicRecords {
        &self.partial
    }

    pub fn into_parts(self) -> (Error, TopicRecords) {
        (self.error, self.partial)
    }
}

impl fmt::Debug for Incomplete {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Incomplete serialization ({} record(s) produced): {:?}",
            self.partial.values().map(Vec::len).sum::<usize>(),
            self.error
        )
    }
}

impl fmt::Display for Incomplete {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl error::Error for Incomplete {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        Some(&self.error)
    }
}

impl From<Incomplete> for Error {
    fn from(incomplete: Incomplete) -> Self {
        incomplete.error
    }
}

/// Turns a write request into per-topic records.
///
/// Series rejected by the rules are skipped as a whole. Every sample of an
/// admitted series goes to the topic its labels resolve to. The first error
/// stops processing; records produced up to that point come back with it.
pub fn serialize(
    serializer: &dyn Serializer,
    config: &Config,
    request: &WriteRequest,
) -> Result<TopicRecords, Incomplete> {
    let mut result = TopicRecords::new();

    for series in &request.timeseries {
        let labels = series.label_map();
        let name = labels.get(LABEL_NAME).map(String::as_str).unwrap_or_default();

        if !config.admits(name, &labels) {
            debug!("Dropping series {:?}: no matching rule", name);
            continue;
        }

        let topic = match config.topic_for(&labels) {
            Ok(topic) => topic,
            Err(e) => return Err(Incomplete::new(e, result)),
        };

        for sample in &series.samples {
            let encoded = MetricRecord::new(name, &labels, sample.timestamp, sample.value)
                .and_then(|record| serializer.encode(&record));

            match encoded {
                Ok(bytes) => result.entry(topic.clone()).or_insert_with(Vec::new).push(bytes),
                Err(e) => return Err(Incomplete::new(e, result)),
            }
        }
    }

    Ok(result)
}
