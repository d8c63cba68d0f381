use std::convert::TryFrom;

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char as nom_char, multispace0},
};

use crate::common::parser::{
    label_identifier, maybe_lpadded, maybe_padded, metric_identifier, or_fail, separated_list,
    string_literal, IResult, ParseError, Span,
};
use crate::error::{ErrorKind, Result};
use crate::model::{LabelMatcher, MatchOp, MetricSelector};

/// Parses a comma-separated list of metric selectors, e.g.
/// `foo{y="2"}, bar, up{x="1",y="2"}`.
///
/// The list may also come in the bracketed form with single-quoted
/// elements: `['foo{y="2"}', 'bar']`. Selectors are returned in the order
/// they appear, nothing is merged or deduplicated.
pub fn parse_rules(input: &str) -> Result<Vec<MetricSelector>> {
    let (_, selectors) = rule_list(Span::new(input))
        .map_err(|e| ParseError::from(e).into_error(ErrorKind::MalformedRule))?;
    Ok(selectors)
}

fn rule_list(input: Span) -> IResult<Vec<MetricSelector>> {
    //   LEFT_BRACKET rule_elements RIGHT_BRACKET
    // | rule_elements

    let (rest, bracketed) = match maybe_lpadded(nom_char('['))(input) {
        Ok((r, _)) => (r, true),
        Err(_) => (input, false),
    };

    let (rest, selectors) = rule_elements(rest)?;

    let (rest, _) = multispace0(rest)?;
    let rest = match bracketed {
        true => {
            let (r, _) = or_fail(nom_char(']')(rest), "rule list", r#""," or "]""#, rest)?;
            multispace0(r)?.0
        }
        false => rest,
    };

    if !rest.fragment().is_empty() {
        return Err(nom::Err::Failure(ParseError::partial(
            "rule list",
            r#""," or end of input"#,
            rest,
        )));
    }

    Ok((rest, selectors))
}

fn rule_elements(input: Span) -> IResult<Vec<MetricSelector>> {
    // rule_element (COMMA rule_element)* COMMA?

    let mut selectors = vec![];
    let (mut rest, _) = multispace0(input)?;

    loop {
        if rest.fragment().is_empty() || rest.fragment().starts_with(']') {
            break;
        }

        let (r, selector) = rule_element(rest)?;
        selectors.push(selector);

        let (r, _) = multispace0(r)?;
        match nom_char::<Span, ParseError>(',')(r) {
            Ok((r, _)) => rest = multispace0(r)?.0,
            Err(_) => {
                rest = r;
                break;
            }
        }
    }

    Ok((rest, selectors))
}

fn rule_element(input: Span) -> IResult<MetricSelector> {
    //   QUOTE metric_selector QUOTE
    // | metric_selector

    match nom_char::<Span, ParseError>('\'')(input) {
        Ok((rest, _)) => {
            let (rest, selector) = maybe_padded(metric_selector)(rest)?;
            let (rest, _) = or_fail(nom_char('\'')(rest), "rule list", r#"closing "'""#, rest)?;
            Ok((rest, selector))
        }
        Err(_) => metric_selector(input),
    }
}

fn metric_selector(input: Span) -> IResult<MetricSelector> {
    //   metric_identifier label_matchers
    // | metric_identifier

    let (rest, name) = or_fail(metric_identifier(input), "rule", "metric name", input)?;

    let (rest, matchers) = match maybe_lpadded(label_matchers)(rest) {
        Ok((r, ms)) => (r, ms),
        Err(nom::Err::Error(_)) => (rest, vec![]),
        Err(e) => return Err(e),
    };

    let selector = MetricSelector::new(name, matchers)
        .map_err(|e| nom::Err::Failure(ParseError::new(e.to_string(), input)))?;
    Ok((rest, selector))
}

fn label_matchers(input: Span) -> IResult<Vec<LabelMatcher>> {
    //   LEFT_BRACE label_match_list RIGHT_BRACE
    // | LEFT_BRACE label_match_list COMMA RIGHT_BRACE
    // | LEFT_BRACE RIGHT_BRACE

    separated_list(
        '{',
        '}',
        ',',
        label_matcher,
        "label matching",
        r#"identifier or "}""#,
    )(input)
}

fn label_matcher(input: Span) -> IResult<LabelMatcher> {
    // IDENTIFIER match_op STRING

    let (rest, label) = label_identifier(input)?;

    let (rest, op) = or_fail(
        maybe_lpadded(match_op)(rest),
        "label matching",
        r#"one of "=", "!=", "=~", "!~""#,
        rest,
    )?;

    let (rest, value) = or_fail(
        maybe_lpadded(string_literal)(rest),
        "label matching",
        "label value as string literal",
        rest,
    )?;

    let matcher = LabelMatcher::new(label, op, value)
        .map_err(|e| nom::Err::Failure(ParseError::new(e.to_string(), input)))?;

    Ok((rest, matcher))
}

fn match_op(input: Span) -> IResult<MatchOp> {
    let (rest, m) = alt((tag("=~"), tag("!~"), tag("!="), tag("=")))(input)?;
    let op = MatchOp::try_from(*m.fragment())
        .map_err(|e| nom::Err::Failure(ParseError::new(e.to_string(), input)))?;
    Ok((rest, op))
}
