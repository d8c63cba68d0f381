use std::collections::HashMap;
use std::convert::TryFrom;

use regex::Regex;

use crate::error::{Error, ErrorKind, Result};

/// The reserved label holding the metric name.
pub const LABEL_NAME: &str = "__name__";

pub type LabelName = String;

pub type LabelValue = String;

pub type Labels = HashMap<LabelName, LabelValue>;

/// A single `label op "value"` constraint.
#[derive(Debug)]
pub struct LabelMatcher {
    label: LabelName,
    match_op: MatchOp,
    value: LabelValue,
    re: Option<Regex>,
}

impl LabelMatcher {
    pub fn new<N, V>(label: N, match_op: MatchOp, value: V) -> Result<Self>
    where
        N: Into<LabelName>,
        V: Into<LabelValue>,
    {
        let label = label.into();
        let value = value.into();

        if label.is_empty() {
            return Err(Error::with_kind(
                ErrorKind::MalformedRule,
                "label matcher must have a non-empty label name",
            ));
        }

        let re = match match_op {
            MatchOp::EqlRe | MatchOp::NeqRe => Some(
                Regex::new(&format!("^(?:{})$", value))
                    .map_err(|e| Error::with_kind(ErrorKind::MalformedRule, &e.to_string()))?,
            ),
            _ => None,
        };

        Ok(Self {
            label,
            match_op,
            value,
            re,
        })
    }

    pub fn label(&self) -> &LabelName {
        &self.label
    }

    pub fn match_op(&self) -> &MatchOp {
        &self.match_op
    }

    pub fn value(&self) -> &LabelValue {
        &self.value
    }

    pub fn is_name_matcher(&self) -> bool {
        self.label == LABEL_NAME
    }

    pub fn matches(&self, v: &str) -> bool {
        match self.match_op {
            MatchOp::Eql => self.value == v,
            MatchOp::Neq => self.value != v,
            MatchOp::EqlRe => self.re.as_ref().map_or(false, |re| re.is_match(v)),
            MatchOp::NeqRe => self.re.as_ref().map_or(false, |re| !re.is_match(v)),
        }
    }

    /// Positive matchers require the label to be present. Negative ones
    /// treat a missing label as an empty value, like Prometheus does.
    pub fn matches_labels(&self, labels: &Labels) -> bool {
        match (labels.get(&self.label), self.match_op) {
            (Some(v), _) => self.matches(v),
            (None, MatchOp::Eql) | (None, MatchOp::EqlRe) => false,
            (None, _) => self.matches(""),
        }
    }
}

impl PartialEq for LabelMatcher {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label && self.match_op == other.match_op && self.value == other.value
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MatchOp {
    Eql,
    Neq,
    EqlRe,
    NeqRe,
}

impl TryFrom<&str> for MatchOp {
    type Error = Error;

    fn try_from(op: &str) -> Result<Self> {
        match op {
            "=" => Ok(MatchOp::Eql),
            "!=" => Ok(MatchOp::Neq),
            "=~" => Ok(MatchOp::EqlRe),
            "!~" => Ok(MatchOp::NeqRe),
            _ => Err(Error::new("Unexpected match op literal")),
        }
    }
}
