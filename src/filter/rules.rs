use std::collections::HashMap;
use std::iter::FromIterator;

use super::parser::parse_rules;
use crate::error::Result;
use crate::model::{Labels, MetricName, MetricSelector};

/// Admission rules grouped by metric name.
///
/// Every selector registered for a name stays in effect: a metric passes
/// if any of them matches (OR across selectors, AND within one selector).
/// An empty set means filtering is off and everything passes.
#[derive(Debug, Default)]
pub struct MatchRuleSet {
    rules: HashMap<MetricName, Vec<MetricSelector>>,
}

impl MatchRuleSet {
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(parse_rules(text)?.into_iter().collect())
    }

    pub fn insert(&mut self, selector: MetricSelector) {
        self.rules
            .entry(selector.name().clone())
            .or_insert_with(Vec::new)
            .push(selector);
    }

    #[inline]
    pub fn is_disabled(&self) -> bool {
        self.rules.is_empty()
    }

    /// Number of distinct metric names with at least one rule.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn alternatives(&self, name: &str) -> &[MetricSelector] {
        self.rules.get(name).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn filter(&self, name: &str, labels: &Labels) -> bool {
        if self.is_disabled() {
            return true;
        }

        match self.rules.get(name) {
            Some(selectors) => selectors.iter().any(|s| s.matches(labels)),
            None => false,
        }
    }
}

impl FromIterator<MetricSelector> for MatchRuleSet {
    fn from_iter<I: IntoIterator<Item = MetricSelector>>(iter: I) -> Self {
        let mut set = Self::default();
        for selector in iter {
            set.insert(selector);
        }
        set
    }
}
