//! Salesforce timestamp codec.
//!
//! Bulk API job payloads carry timestamps such as `2023-12-02T02:30:02.000+0000`:
//! millisecond precision and a numeric offset *without* a colon. That is not
//! RFC 3339. `Z` and `+00:00` are rejected; the platform never sends them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// `YYYY-MM-DDThh:mm:ss.sss±hhmm`
const EXPECTED_LEN: usize = 28;

#[derive(Debug, thiserror::Error)]
pub enum TimeParseError {
    #[error("timestamp {input:?} does not match YYYY-MM-DDThh:mm:ss.sss±hhmm: {reason}")]
    Format { input: String, reason: &'static str },
    #[error("timestamp {input:?}: {source}")]
    Chrono {
        input: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// A timestamp as Salesforce sends it, normalized to UTC.
///
/// JSON `null` decodes to the zero value rather than failing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SalesforceTime(Option<DateTime<Utc>>);

impl SalesforceTime {
    /// Parse the bare (unquoted) wire form.
    pub fn parse(input: &str) -> Result<Self, TimeParseError> {
        let bytes = input.as_bytes();
        let format_err = |reason| TimeParseError::Format {
            input: input.to_string(),
            reason,
        };

        if bytes.len() != EXPECTED_LEN {
            return Err(format_err("unexpected length"));
        }
        for (pos, &b) in bytes.iter().enumerate() {
            let ok = match pos {
                4 | 7 => b == b'-',
                10 => b == b'T',
                13 | 16 => b == b':',
                19 => b == b'.',
                23 => matches!(b, b'+' | b'-'),
                _ => b.is_ascii_digit(),
            };
            if !ok {
                return Err(format_err(match pos {
                    19 => "missing millisecond fraction",
                    23 => "offset must be numeric, e.g. +0000",
                    24.. => "offset must be four digits without a colon",
                    _ => "malformed date or time field",
                }));
            }
        }

        let parsed = DateTime::parse_from_str(input, FORMAT).map_err(|source| {
            TimeParseError::Chrono {
                input: input.to_string(),
                source,
            }
        })?;
        Ok(Self(Some(parsed.with_timezone(&Utc))))
    }

    /// True for the value decoded from `null`.
    pub fn is_zero(&self) -> bool {
        self.0.is_none()
    }

    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        self.0
    }
}

impl From<DateTime<Utc>> for SalesforceTime {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(Some(dt))
    }
}

impl FromStr for SalesforceTime {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SalesforceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(dt) => write!(f, "{}", dt.format(FORMAT)),
            None => f.write_str("null"),
        }
    }
}

impl<'de> Deserialize<'de> for SalesforceTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(Self::default()),
            Some(s) => Self::parse(&s).map_err(serde::de::Error::custom),
        }
    }
}

impl Serialize for SalesforceTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.0 {
            Some(_) => serializer.collect_str(self),
            None => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[derive(Debug, Deserialize, Serialize)]
    struct Holder {
        time: SalesforceTime,
    }

    #[test]
    fn test_decodes_numeric_offset() {
        let holder: Holder =
            serde_json::from_str(r#"{"time":"2023-12-02T02:30:02.000+0000"}"#).unwrap();
        assert_eq!(
            holder.time.as_datetime(),
            Some(Utc.with_ymd_and_hms(2023, 12, 2, 2, 30, 2).unwrap())
        );
    }

    #[test]
    fn test_non_utc_offset_is_normalized() {
        let t = SalesforceTime::parse("2023-12-02T04:30:02.250+0200").unwrap();
        let expected = Utc.with_ymd_and_hms(2023, 12, 2, 2, 30, 2).unwrap()
            + chrono::Duration::milliseconds(250);
        assert_eq!(t.as_datetime(), Some(expected));

        let t = SalesforceTime::parse("2023-12-01T21:30:02.000-0500").unwrap();
        assert_eq!(
            t.as_datetime(),
            Some(Utc.with_ymd_and_hms(2023, 12, 2, 2, 30, 2).unwrap())
        );
    }

    #[test]
    fn test_null_is_zero_value() {
        let holder: Holder = serde_json::from_str(r#"{"time":null}"#).unwrap();
        assert!(holder.time.is_zero());
        assert_eq!(holder.time, SalesforceTime::default());
    }

    #[test]
    fn test_rejects_rfc3339_offsets() {
        for input in [
            "2023-12-02T02:30:02.000Z",
            "2023-12-02T02:30:02.000+00:00",
            "2023-12-02T02:30:02Z",
        ] {
            assert!(
                SalesforceTime::parse(input).is_err(),
                "{input} should be rejected"
            );
            let json = format!(r#"{{"time":"{input}"}}"#);
            assert!(serde_json::from_str::<Holder>(&json).is_err());
        }
    }

    #[test]
    fn test_rejects_malformed_input() {
        let err = SalesforceTime::parse("2023-13-02T02:30:02.000+0000").unwrap_err();
        assert!(matches!(err, TimeParseError::Chrono { .. }));

        let err = SalesforceTime::parse("yesterday").unwrap_err();
        assert!(matches!(err, TimeParseError::Format { .. }));
        assert!(err.to_string().contains("yesterday"));

        assert!(SalesforceTime::parse("2023-12-02T02:30:02,000+0000").is_err());

        // Right length, but signed year and a one-digit seconds field.
        let err = SalesforceTime::parse("+2023-12-02T02:30:0.000+0000").unwrap_err();
        assert!(matches!(err, TimeParseError::Format { .. }));

        for input in [
            "2023/12/02T02:30:02.000+0000",
            "2023-12-02 02:30:02.000+0000",
            "2023-12-02T02-30-02.000+0000",
            "2023-12-02T02:30:02.0a0+0000",
            "2023-1x-02T02:30:02.000+0000",
        ] {
            assert!(
                matches!(
                    SalesforceTime::parse(input),
                    Err(TimeParseError::Format { .. })
                ),
                "{input} should be rejected before chrono parsing"
            );
        }
        assert!(serde_json::from_str::<Holder>(r#"{"time":12}"#).is_err());
    }

    #[test]
    fn test_serializes_wire_format() {
        let holder = Holder {
            time: Utc.with_ymd_and_hms(2023, 12, 2, 2, 30, 2).unwrap().into(),
        };
        assert_eq!(
            serde_json::to_string(&holder).unwrap(),
            r#"{"time":"2023-12-02T02:30:02.000+0000"}"#
        );

        let holder = Holder {
            time: SalesforceTime::default(),
        };
        assert_eq!(serde_json::to_string(&holder).unwrap(), r#"{"time":null}"#);
    }

    #[test]
    fn test_from_str() {
        let t: SalesforceTime = "2024-02-29T23:59:59.999+0000".parse().unwrap();
        assert_eq!(t.to_string(), "2024-02-29T23:59:59.999+0000");
    }
}
