use nom::{
    branch::alt,
    character::complete::{char as nom_char, digit1},
    combinator::{opt, recognize},
    sequence::pair,
};

use super::result::{IResult, ParseError, Span};

pub fn integer_literal(input: Span) -> IResult<i64> {
    // [+-]?[0-9]+
    let (rest, m) = recognize(pair(opt(alt((nom_char('+'), nom_char('-')))), digit1))(input)?;
    let n = m
        .fragment()
        .parse::<i64>()
        .map_err(|e| nom::Err::Failure(ParseError::new(e.to_string(), input)))?;
    Ok((rest, n))
}
