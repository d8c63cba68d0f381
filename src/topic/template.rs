use std::fmt;
use std::str::FromStr;

use super::function::Stage;
use super::parser::{parse_pipeline, parse_template};
use crate::error::{Error, ErrorKind, Result};
use crate::model::Labels;

/// A chain of commands, each one fed with the output of the previous one.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub(super) fn new(stages: Vec<Stage>) -> Self {
        Self { stages }
    }

    /// Compiles a bare pipeline, i.e. the inside of a `{{ }}` action.
    pub fn parse(text: &str) -> Result<Self> {
        parse_pipeline(text)
    }

    pub fn evaluate(&self, labels: &Labels) -> Result<String> {
        let mut value = None;
        for stage in self.stages.iter() {
            value = Some(stage.apply(labels, value)?);
        }
        value.ok_or_else(|| Error::with_kind(ErrorKind::TemplateEval, "empty pipeline"))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(super) enum Segment {
    Text(String),
    Action(Pipeline),
}

/// Compiled topic name template, e.g. `prom-{{ index . "job" | replace "." "-" }}`.
///
/// Compiled once, then evaluated against the label map of every series.
/// Evaluation doesn't mutate anything, so one instance can be shared
/// between threads.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl TopicTemplate {
    pub fn compile(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Err(Error::with_kind(
                ErrorKind::TemplateCompile,
                "topic template must not be empty",
            ));
        }

        Ok(Self {
            source: text.to_string(),
            segments: parse_template(text)?,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// True if the template has no actions and always renders the same topic.
    pub fn is_constant(&self) -> bool {
        self.segments
            .iter()
            .all(|s| matches!(s, Segment::Text(_)))
    }

    pub fn evaluate(&self, labels: &Labels) -> Result<String> {
        let mut topic = String::new();
        for segment in self.segments.iter() {
            match segment {
                Segment::Text(text) => topic.push_str(text),
                Segment::Action(pipeline) => topic.push_str(&pipeline.evaluate(labels)?),
            }
        }

        if topic.is_empty() {
            return Err(Error::with_kind(
                ErrorKind::TemplateEval,
                &format!("template {:?} produced an empty topic name", self.source),
            ));
        }
        Ok(topic)
    }
}

impl FromStr for TopicTemplate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::compile(s)
    }
}

impl fmt::Display for TopicTemplate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> Labels {
        vec![
            ("__name__", "foo"),
            ("labelfoo", "label-bar"),
            ("job", "node.exporter"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn test_pipeline_evaluate() -> Result<()> {
        let pipeline = Pipeline::parse(r#"index . "labelfoo" | replace "bar" "foo" | substring 6 -1"#)?;
        assert_eq!("foo", pipeline.evaluate(&labels())?);
        Ok(())
    }

    #[test]
    fn test_template_evaluate() -> Result<()> {
        #[rustfmt::skip]
        let tests = [
            (r#"{{ index . "labelfoo" | replace "bar" "foo" | substring 6 -1 }}"#, "foo"),
            ("metrics", "metrics"),
            (r#"prom-{{ index . "job" | replace "." "-" }}"#, "prom-node-exporter"),
            (r#"{{ index . "__name__" }}_{{ index . "labelfoo" | substring 0 5 }}"#, "foo_label"),
            (r#"{{ "static" }}"#, "static"),
            (r#"{{ replace "-" "_" "a-b" }}"#, "a_b"),
        ];

        let labels = labels();
        for &(input, expected) in &tests {
            let template = TopicTemplate::compile(input)?;
            assert_eq!(expected, template.evaluate(&labels)?, "while evaluating {}", input);
            // Compiled templates are reusable.
            assert_eq!(expected, template.evaluate(&labels)?, "while evaluating {}", input);
        }
        Ok(())
    }

    #[test]
    fn test_template_evaluate_errors() -> Result<()> {
        #[rustfmt::skip]
        let tests = [
            (r#"{{ index . "missing" }}"#, ErrorKind::MissingLabel),
            (r#"x-{{ index . "missing" | replace "a" "b" }}"#, ErrorKind::MissingLabel),
            (r#"{{ index . "labelfoo" | substring 20 -1 }}"#, ErrorKind::TemplateEval),
            (r#"{{ "" }}"#, ErrorKind::TemplateEval),
        ];

        let labels = labels();
        for &(input, kind) in &tests {
            let err = TopicTemplate::compile(input)?.evaluate(&labels).unwrap_err();
            assert_eq!(kind, err.kind(), "while evaluating {}", input);
        }
        Ok(())
    }

    #[test]
    fn test_compile_errors() {
        for input in &["", "   ", "{{ index . }}", "{{ nope }}", "{{ index . \"a\""] {
            let err = TopicTemplate::compile(input).unwrap_err();
            assert_eq!(ErrorKind::TemplateCompile, err.kind(), "while compiling {}", input);
        }
    }

    #[test]
    fn test_is_constant() -> Result<()> {
        assert!(TopicTemplate::compile("metrics")?.is_constant());
        assert!(!"t-{{ index . \"job\" }}".parse::<TopicTemplate>()?.is_constant());
        Ok(())
    }
}
