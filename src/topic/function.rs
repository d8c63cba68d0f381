use std::collections::HashMap;
use std::convert::TryFrom;

use lazy_static::lazy_static;

use crate::error::{Error, ErrorKind, Result};
use crate::model::{LabelName, Labels};

#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// `.`, the label map of the series being evaluated.
    Dot,
    Str(String),
    Int(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionName {
    Index,
    Replace,
    Substring,
}

lazy_static! {
    static ref FUNCTIONS: HashMap<&'static str, FunctionName> = {
        let mut m = HashMap::new();
        m.insert("index", FunctionName::Index);
        m.insert("replace", FunctionName::Replace);
        m.insert("substring", FunctionName::Substring);
        m
    };
}

impl FunctionName {
    fn as_str(&self) -> &'static str {
        match self {
            FunctionName::Index => "index",
            FunctionName::Replace => "replace",
            FunctionName::Substring => "substring",
        }
    }

    fn arity(&self) -> usize {
        match self {
            FunctionName::Index => 2,
            FunctionName::Replace | FunctionName::Substring => 3,
        }
    }
}

impl TryFrom<&str> for FunctionName {
    type Error = Error;

    fn try_from(name: &str) -> Result<Self> {
        FUNCTIONS
            .get(name)
            .copied()
            .ok_or_else(|| compile_error(format!("function \"{}\" not defined", name)))
    }
}

/// One compiled pipeline command. When a stage is not the first one in its
/// pipeline, the previous stage's output is its last argument and the
/// corresponding `src` field is `None`.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Literal(String),
    Index(LabelName),
    Replace {
        old: String,
        new: String,
        src: Option<String>,
    },
    Substring {
        start: i64,
        end: i64,
        src: Option<String>,
    },
}

impl Stage {
    pub fn literal(value: String, piped: bool) -> Result<Self> {
        if piped {
            return Err(compile_error(String::from(
                "can't give argument to non-function string literal",
            )));
        }
        Ok(Stage::Literal(value))
    }

    pub fn call(name: &str, args: Vec<Arg>, piped: bool) -> Result<Self> {
        let func = FunctionName::try_from(name)?;

        let got = args.len() + piped as usize;
        if got != func.arity() {
            return Err(compile_error(format!(
                "wrong number of args for {}: want {} got {}",
                func.as_str(),
                func.arity(),
                got
            )));
        }

        let mut args = args.into_iter();
        match func {
            FunctionName::Index => {
                if piped {
                    return Err(compile_error(String::from(
                        "index can't take a piped value, use index . \"label\"",
                    )));
                }
                match (args.next(), args.next()) {
                    (Some(Arg::Dot), Some(Arg::Str(label))) => Ok(Stage::Index(label)),
                    _ => Err(compile_error(String::from(
                        "index expects . and a label name: index . \"label\"",
                    ))),
                }
            }
            FunctionName::Replace => Ok(Stage::Replace {
                old: expect_str(func, args.next())?,
                new: expect_str(func, args.next())?,
                src: args.next().map(|a| expect_str(func, Some(a))).transpose()?,
            }),
            FunctionName::Substring => Ok(Stage::Substring {
                start: expect_int(func, args.next())?,
                end: expect_int(func, args.next())?,
                src: args.next().map(|a| expect_str(func, Some(a))).transpose()?,
            }),
        }
    }

    pub fn apply(&self, labels: &Labels, piped: Option<String>) -> Result<String> {
        match self {
            Stage::Literal(value) => Ok(value.clone()),
            Stage::Index(label) => labels.get(label).cloned().ok_or_else(|| {
                Error::with_kind(
                    ErrorKind::MissingLabel,
                    &format!("label \"{}\" not found", label),
                )
            }),
            Stage::Replace { old, new, src } => {
                let src = source(src, piped)?;
                Ok(src.replace(old.as_str(), new))
            }
            Stage::Substring { start, end, src } => substring(*start, *end, &source(src, piped)?),
        }
    }
}

fn source(own: &Option<String>, piped: Option<String>) -> Result<String> {
    match (own, piped) {
        (Some(s), _) => Ok(s.clone()),
        (None, Some(s)) => Ok(s),
        (None, None) => Err(Error::with_kind(
            ErrorKind::TemplateEval,
            "missing value for command",
        )),
    }
}

/// Character based `s[start:end]`. A negative start is clamped to zero, a
/// negative end or one past the string means "up to the end".
fn substring(start: i64, end: i64, s: &str) -> Result<String> {
    let len = s.chars().count() as i64;
    let start = start.max(0);
    let end = if end < 0 || end > len { len } else { end };

    if start >= end {
        return Err(Error::with_kind(
            ErrorKind::TemplateEval,
            &format!(
                "substring: start {} is out of range for \"{}\" (end {})",
                start, s, end
            ),
        ));
    }

    Ok(s.chars()
        .skip(start as usize)
        .take((end - start) as usize)
        .collect())
}

fn expect_str(func: FunctionName, arg: Option<Arg>) -> Result<String> {
    match arg {
        Some(Arg::Str(s)) => Ok(s),
        other => Err(wrong_type(func, "string", other)),
    }
}

fn expect_int(func: FunctionName, arg: Option<Arg>) -> Result<i64> {
    match arg {
        Some(Arg::Int(n)) => Ok(n),
        other => Err(wrong_type(func, "integer", other)),
    }
}

fn wrong_type(func: FunctionName, want: &str, got: Option<Arg>) -> Error {
    let got = match got {
        Some(Arg::Dot) => String::from("the label map (.)"),
        Some(Arg::Str(s)) => format!("string {:?}", s),
        Some(Arg::Int(n)) => format!("integer {}", n),
        None => String::from("nothing"),
    };
    compile_error(format!(
        "wrong type of argument for {}: want {}, got {}",
        func.as_str(),
        want,
        got
    ))
}

fn compile_error(message: String) -> Error {
    Error::with_kind(ErrorKind::TemplateCompile, &message)
}
