use crate::error::{Error, Result};

pub type SampleValue = f64;

/// Renders a sample value the way Prometheus does in its text formats:
/// shortest decimal form for finite values, `+Inf`, `-Inf` and `NaN` otherwise.
pub fn format_sample_value(value: SampleValue) -> String {
    if value.is_nan() {
        String::from("NaN")
    } else if value == SampleValue::INFINITY {
        String::from("+Inf")
    } else if value == SampleValue::NEG_INFINITY {
        String::from("-Inf")
    } else {
        value.to_string()
    }
}

pub fn parse_sample_value(s: &str) -> Result<SampleValue> {
    match s.trim() {
        "+Inf" | "Inf" => Ok(SampleValue::INFINITY),
        "-Inf" => Ok(SampleValue::NEG_INFINITY),
        "NaN" => Ok(SampleValue::NAN),
        other => other
            .parse::<SampleValue>()
            .map_err(|e| Error::from((format!("invalid sample value \"{}\"", other), e))),
    }
}
