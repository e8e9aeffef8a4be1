use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use snafu::{ensure, Snafu};

/// The only date-time layout accepted on the wire, e.g. `2024-03-09 14:05:00`.
pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Shape of [FORMAT]: `d` is a digit, anything else must match literally.
const SHAPE: &[u8; 19] = b"dddd-dd-dd dd:dd:dd";

pub fn now() -> Timestamp {
    Timestamp(Utc::now().naive_utc())
}

/// A point in time without a zone, as reported by the clients. Stored as UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    /// Parse `input` in exactly the `yyyy-MM-dd HH:mm:ss` layout.
    pub fn parse(input: &str) -> Result<Self, ParseTimestamp> {
        // chrono alone tolerates signs, unpadded fields and extra spaces
        ensure!(
            has_shape(input),
            ParseTimestampSnafu {
                input,
                reason: "expected zero-padded `yyyy-MM-dd HH:mm:ss`",
            }
        );

        NaiveDateTime::parse_from_str(input, FORMAT)
            .map(Self)
            .map_err(|err| {
                ParseTimestampSnafu {
                    input,
                    reason: err.to_string(),
                }
                .build()
            })
    }

    pub fn to_utc(self) -> DateTime<Utc> {
        self.0.and_utc()
    }

    /// RFC 3339 rendering understood by SurrealDB's `<datetime>` cast.
    pub fn to_rfc3339(self) -> String {
        self.to_utc().to_rfc3339()
    }
}

fn has_shape(input: &str) -> bool {
    let bytes = input.as_bytes();
    bytes.len() == SHAPE.len()
        && bytes.iter().zip(SHAPE).all(|(&byte, &expected)| match expected {
            b'd' => byte.is_ascii_digit(),
            _ => byte == expected,
        })
}

impl std::ops::Deref for Timestamp {
    type Target = NaiveDateTime;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value.naive_utc())
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(FORMAT))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Timestamp::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(display("`{input}` is not a `yyyy-MM-dd HH:mm:ss` timestamp: {reason}"))]
pub struct ParseTimestamp {
    pub input: String,
    pub reason: String,
}
