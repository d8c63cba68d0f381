use nom::{
    branch::alt,
    bytes::complete::{tag, take_until},
    character::complete::{char as nom_char, multispace0, multispace1},
    combinator::{map, rest as remaining},
    multi::many0,
    sequence::preceded,
};

use super::function::{Arg, Stage};
use super::template::{Pipeline, Segment};
use crate::common::parser::{
    integer_literal, label_identifier, maybe_lpadded, or_fail, string_literal, IResult,
    ParseError, Span,
};
use crate::error::{ErrorKind, Result};

pub(super) fn parse_template(input: &str) -> Result<Vec<Segment>> {
    let (_, segments) = template(Span::new(input))
        .map_err(|e| ParseError::from(e).into_error(ErrorKind::TemplateCompile))?;
    Ok(segments)
}

pub(super) fn parse_pipeline(input: &str) -> Result<Pipeline> {
    let (_, pipeline) = bare_pipeline(Span::new(input))
        .map_err(|e| ParseError::from(e).into_error(ErrorKind::TemplateCompile))?;
    Ok(pipeline)
}

fn bare_pipeline(input: Span) -> IResult<Pipeline> {
    let (rest, _) = multispace0(input)?;
    let (rest, pipeline) = or_fail(
        pipeline(rest),
        "pipeline",
        "function name or string literal",
        rest,
    )?;

    let (rest, _) = multispace0(rest)?;
    if !rest.fragment().is_empty() {
        return Err(nom::Err::Failure(ParseError::partial(
            "pipeline",
            r#""|" or end of input"#,
            rest,
        )));
    }

    Ok((rest, pipeline))
}

fn template(input: Span) -> IResult<Vec<Segment>> {
    // (TEXT | action)*

    let mut segments = vec![];
    let mut rest = input;

    while !rest.fragment().is_empty() {
        match take_until::<_, _, ParseError>("{{")(rest) {
            Ok((r, text)) => {
                if !text.fragment().is_empty() {
                    segments.push(Segment::Text(text.fragment().to_string()));
                }
                let (r, pipeline) = action(r)?;
                segments.push(Segment::Action(pipeline));
                rest = r;
            }
            Err(_) => {
                let (r, text) = remaining(rest)?;
                segments.push(Segment::Text(text.fragment().to_string()));
                rest = r;
            }
        }
    }

    Ok((rest, segments))
}

fn action(input: Span) -> IResult<Pipeline> {
    // LEFT_DELIM pipeline RIGHT_DELIM

    let (rest, _) = tag("{{")(input)?;
    let (rest, _) = multispace0(rest)?;

    let (rest, pipeline) = or_fail(
        pipeline(rest),
        "template action",
        "function name or string literal",
        rest,
    )?;

    let (rest, _) = multispace0(rest)?;
    let (rest, _) = or_fail(tag("}}")(rest), "template action", r#""|" or "}}""#, rest)?;

    Ok((rest, pipeline))
}

fn pipeline(input: Span) -> IResult<Pipeline> {
    // command (PIPE command)*

    let (mut rest, first) = command(input, false)?;
    let mut stages = vec![first];

    while let Ok((r, _)) = maybe_lpadded(nom_char('|'))(rest) {
        let (r, _) = multispace0(r)?;
        let (r, stage) = or_fail(command(r, true), "pipeline", "function name", r)?;
        stages.push(stage);
        rest = r;
    }

    Ok((rest, Pipeline::new(stages)))
}

fn command(input: Span, piped: bool) -> IResult<Stage> {
    //   STRING
    // | IDENTIFIER argument*

    let stage = match string_literal(input) {
        Ok((rest, value)) => (rest, Stage::literal(value, piped)),
        Err(nom::Err::Error(_)) => {
            let (rest, name) = label_identifier(input)?;
            let (rest, args) = many0(preceded(multispace1, argument))(rest)?;
            (rest, Stage::call(&name, args, piped))
        }
        Err(e) => return Err(e),
    };

    match stage {
        (rest, Ok(stage)) => Ok((rest, stage)),
        (_, Err(e)) => Err(nom::Err::Failure(ParseError::new(
            e.message().to_string(),
            input,
        ))),
    }
}

fn argument(input: Span) -> IResult<Arg> {
    alt((
        map(nom_char('.'), |_| Arg::Dot),
        map(string_literal, Arg::Str),
        map(integer_literal, Arg::Int),
    ))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_valid() -> std::result::Result<(), ParseError<'static>> {
        #[rustfmt::skip]
        let tests = vec![
            (r#""metrics""#, vec![Stage::Literal("metrics".into())]),
            (r#"index . "labelfoo""#, vec![Stage::Index("labelfoo".into())]),
            (r#"index   .   "labelfoo"  "#, vec![Stage::Index("labelfoo".into())]),
            (
                r#"index . "labelfoo" | replace "bar" "foo" | substring 6 -1"#,
                vec![
                    Stage::Index("labelfoo".into()),
                    Stage::Replace { old: "bar".into(), new: "foo".into(), src: None },
                    Stage::Substring { start: 6, end: -1, src: None },
                ],
            ),
            (
                r#"index . "job"|replace "-" "_""#,
                vec![
                    Stage::Index("job".into()),
                    Stage::Replace { old: "-".into(), new: "_".into(), src: None },
                ],
            ),
            (
                r#"substring 0 3 "prometheus""#,
                vec![Stage::Substring { start: 0, end: 3, src: Some("prometheus".into()) }],
            ),
        ];

        for (input, expected) in tests {
            let (rest, actual) = pipeline(Span::new(input))?;
            assert_eq!(Pipeline::new(expected), actual, "while parsing {}", input);
            assert!(rest.fragment().trim().is_empty(), "while parsing {}", input);
        }
        Ok(())
    }

    #[test]
    fn test_template_valid() -> Result<()> {
        #[rustfmt::skip]
        let tests = vec![
            ("metrics", vec![Segment::Text("metrics".into())]),
            ("{{ index . \"job\" }}", vec![Segment::Action(Pipeline::new(vec![Stage::Index("job".into())]))]),
            ("{{index . \"job\"}}", vec![Segment::Action(Pipeline::new(vec![Stage::Index("job".into())]))]),
            (
                "prom-{{ index . \"job\" }}-{{ \"x\" }}",
                vec![
                    Segment::Text("prom-".into()),
                    Segment::Action(Pipeline::new(vec![Stage::Index("job".into())])),
                    Segment::Text("-".into()),
                    Segment::Action(Pipeline::new(vec![Stage::Literal("x".into())])),
                ],
            ),
            ("a}}b", vec![Segment::Text("a}}b".into())]),
        ];

        for (input, expected) in tests {
            assert_eq!(expected, parse_template(input)?, "while parsing {}", input);
        }
        Ok(())
    }

    #[test]
    fn test_template_invalid() {
        #[rustfmt::skip]
        let tests = [
            ("{{ index . \"job\"", r#"1:16: parse error: unexpected EOF in template action, expected "|" or "}}""#),
            ("{{ }}", r#"1:3: parse error: unexpected "}}" in template action, expected function name or string literal"#),
            ("{{", "1:2: parse error: unexpected EOF in template action, expected function name or string literal"),
            ("{{ lower . }}", "1:3: parse error: function \"lower\" not defined"),
            ("{{ index . \"a\" | }}", r#"1:17: parse error: unexpected "}}" in pipeline, expected function name"#),
            ("{{ index . \"a\" | replace \"a\" }}", "1:17: parse error: wrong number of args for replace: want 3 got 2"),
            ("{{ . }}", r#"1:3: parse error: unexpected ". }}" in template action, expected function name or string literal"#),
            ("{{ \"a\" | \"b\" }}", "1:9: parse error: can't give argument to non-function string literal"),
            ("{{ index . \"a }}", "1:11: parse error: unterminated quoted string"),
            ("{{ index . \"a\" extra }}", r#"1:15: parse error: unexpected "extra }}" in template action, expected "|" or "}}""#),
        ];

        for &(input, expected) in &tests {
            let err = match parse_template(input) {
                Err(e) => e,
                Ok(res) => panic!("error expected but found {:?} for {:?}", res, input),
            };
            assert_eq!(ErrorKind::TemplateCompile, err.kind(), "while parsing {:?}", input);
            assert_eq!(expected, err.message(), "while parsing {:?}", input);
        }
    }
}
