use chrono::{DateTime, SecondsFormat, TimeZone, Utc};

use crate::error::{Error, ErrorKind, Result};

// Unix timestamp in milliseconds.
pub type Timestamp = i64;

pub fn to_utc(ts: Timestamp) -> Result<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ts).single().ok_or_else(|| {
        Error::with_kind(
            ErrorKind::Encode,
            &format!("timestamp {} is out of range", ts),
        )
    })
}

/// RFC 3339 with second precision, e.g. `1970-01-01T00:00:10Z`.
pub fn format_rfc3339(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rfc3339() -> Result<()> {
        #[rustfmt::skip]
        let tests = [
            (0, "1970-01-01T00:00:00Z"),
            (10000, "1970-01-01T00:00:10Z"),
            (10999, "1970-01-01T00:00:10Z"),
            (1609459200000, "2021-01-01T00:00:00Z"),
            (-1000, "1969-12-31T23:59:59Z"),
        ];

        for &(input, expected) in &tests {
            assert_eq!(expected, format_rfc3339(&to_utc(input)?));
        }
        Ok(())
    }

    #[test]
    fn test_out_of_range() {
        let err = to_utc(Timestamp::MAX).unwrap_err();
        assert_eq!(ErrorKind::Encode, err.kind());
    }
}
