use nom;

use nom_locate::LocatedSpan;

use crate::error::{Error, ErrorKind};

pub type Span<'a> = LocatedSpan<&'a str>;

pub type IResult<'a, O> = nom::IResult<Span<'a>, O, ParseError<'a>>;

#[derive(Debug, PartialEq)]
pub struct ParseError<'a> {
    message: String,
    span: Span<'a>,
}

impl<'a> ParseError<'a> {
    pub fn new(message: String, span: Span<'a>) -> Self {
        Self { message, span }
    }

    /// An error for input that started well but then went off the rails,
    /// e.g. `foo{bar="baz"` with the closing brace missing.
    pub fn partial(wherein: &str, expected: &str, span: Span<'a>) -> Self {
        Self::new(
            format!(
                "unexpected {} in {}, expected {}",
                unexpected(*span.fragment()),
                wherein,
                expected
            ),
            span,
        )
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn line(&self) -> u32 {
        self.span.location_line()
    }

    pub fn offset(&self) -> usize {
        self.span.location_offset()
    }

    pub fn into_error(self, kind: ErrorKind) -> Error {
        Error::with_kind(kind, &String::from(self))
    }
}

fn unexpected(found: &str) -> String {
    match found.chars().next() {
        None => String::from("EOF"),
        Some(c) if c.is_whitespace() => String::from("whitespace"),
        Some(_) => format!("\"{}\"", found.chars().take(16).collect::<String>()),
    }
}

impl<'a> nom::error::ParseError<Span<'a>> for ParseError<'a> {
    fn from_error_kind(input: Span<'a>, kind: nom::error::ErrorKind) -> Self {
        Self::new(format!("parse error {:?}", kind), input)
    }

    fn append(_input: Span<'a>, _kind: nom::error::ErrorKind, other: Self) -> Self {
        other
    }

    fn from_char(input: Span<'a>, c: char) -> Self {
        Self::new(format!("expected character '{}'", c), input)
    }
}

impl<'a> From<nom::Err<ParseError<'a>>> for ParseError<'a> {
    fn from(err: nom::Err<ParseError<'a>>) -> Self {
        match err {
            nom::Err::Error(e) | nom::Err::Failure(e) => e,
            nom::Err::Incomplete(_) => unreachable!(),
        }
    }
}

impl<'a> From<ParseError<'a>> for String {
    fn from(err: ParseError) -> Self {
        format!("{}:{}: parse error: {}", err.line(), err.offset(), err.message)
    }
}
