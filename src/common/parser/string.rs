use nom::character::complete::{anychar, char as nom_char};

use super::result::{IResult, ParseError, Span};

/// A double-quoted string with backslash escapes.
pub fn string_literal(input: Span) -> IResult<String> {
    quoted_string('"')(input)
}

pub fn quoted_string<'a>(quote: char) -> impl FnMut(Span<'a>) -> IResult<'a, String> {
    move |input: Span<'a>| {
        let (mut rest, _) = nom_char(quote)(input)?;
        let mut value = String::new();

        loop {
            let (r, c) = match anychar::<Span, ParseError>(rest) {
                Ok(v) => v,
                Err(_) => return Err(unterminated(input)),
            };

            if c == quote {
                return Ok((r, value));
            }

            rest = match c {
                '\\' => {
                    let (r, escaped) = match anychar::<Span, ParseError>(r) {
                        Ok(v) => v,
                        Err(_) => return Err(unterminated(input)),
                    };
                    value.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        other => other,
                    });
                    r
                }
                c => {
                    value.push(c);
                    r
                }
            };
        }
    }
}

fn unterminated(start: Span) -> nom::Err<ParseError> {
    nom::Err::Failure(ParseError::new(
        String::from("unterminated quoted string"),
        start,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_literal_valid() -> std::result::Result<(), nom::Err<ParseError<'static>>> {
        #[rustfmt::skip]
        let tests = [
            (r#""""#, "", ""),
            (r#""foo""#, "foo", ""),
            (r#""foo bar" baz"#, "foo bar", " baz"),
            (r#""label-bar"}"#, "label-bar", "}"),
            (r#""say \"hi\"""#, r#"say "hi""#, ""),
            (r#""back\\slash""#, r#"back\slash"#, ""),
            (r#""a\nb\tc""#, "a\nb\tc", ""),
            (r#""\}""#, "}", ""),
            ("\"valu\ne1;value2\"", "valu\ne1;value2", ""),
        ];

        for &(input, expected, expected_rest) in &tests {
            let (rest, actual) = string_literal(Span::new(input))?;
            assert_eq!(expected, actual, "while parsing {}", input);
            assert_eq!(expected_rest, *rest.fragment(), "while parsing {}", input);
        }
        Ok(())
    }

    #[test]
    fn test_string_literal_unterminated() {
        let tests = [r#"""#, r#""foo"#, r#""foo\""#, r#""foo\"#];

        for input in &tests {
            match string_literal(Span::new(input)) {
                Err(nom::Err::Failure(e)) => {
                    assert_eq!("unterminated quoted string", e.message());
                    assert_eq!(0, e.offset());
                }
                res => panic!("failure expected but found {:?} for {}", res, input),
            }
        }
    }

    #[test]
    fn test_quoted_string_single_quotes() -> std::result::Result<(), nom::Err<ParseError<'static>>>
    {
        let (rest, actual) = quoted_string('\'')(Span::new(r#"'foo{y="2"}', bar"#))?;
        assert_eq!(r#"foo{y="2"}"#, actual);
        assert_eq!(", bar", *rest.fragment());
        Ok(())
    }

    #[test]
    fn test_string_literal_not_a_string() {
        match string_literal(Span::new("foo")) {
            Err(nom::Err::Error(_)) => (),
            res => panic!("recoverable error expected but found {:?}", res),
        }
    }
}
