use std::collections::HashSet;

use super::labels::{LabelMatcher, Labels};
use super::MetricName;
use crate::error::{Error, ErrorKind, Result};

/// One admission rule: `metric_name{label="value",...}`.
///
/// All matchers have to be satisfied for the selector to match. Matchers
/// never reference the reserved name label, the metric name is kept apart.
#[derive(Debug, PartialEq)]
pub struct MetricSelector {
    name: MetricName,
    matchers: Vec<LabelMatcher>,
}

impl MetricSelector {
    pub fn new<S>(name: S, matchers: Vec<LabelMatcher>) -> Result<Self>
    where
        S: Into<MetricName>,
    {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::with_kind(
                ErrorKind::MalformedRule,
                "metric selector must have a metric name",
            ));
        }

        let mut seen = HashSet::new();
        for m in matchers.iter() {
            if m.is_name_matcher() {
                return Err(Error::with_kind(
                    ErrorKind::MalformedRule,
                    "potentially ambiguous metric name match",
                ));
            }
            if !seen.insert(m.label()) {
                return Err(Error::with_kind(
                    ErrorKind::MalformedRule,
                    &format!("duplicate matcher for label \"{}\"", m.label()),
                ));
            }
        }

        Ok(Self { name, matchers })
    }

    pub fn name(&self) -> &MetricName {
        &self.name
    }

    pub fn matchers(&self) -> &[LabelMatcher] {
        &self.matchers
    }

    pub fn matches(&self, labels: &Labels) -> bool {
        self.matchers.iter().all(|m| m.matches_labels(labels))
    }
}
