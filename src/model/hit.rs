use super::*;

/// Store-assigned identity of a hit. Starts at 1 and only grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HitId(pub u64);

impl std::fmt::Display for HitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "hits:{}", self.0)
    }
}

/// One observed call to an endpoint, as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct HitRecord {
    pub id: HitId,
    pub app: String,
    pub uri: String,
    pub ip: String,
    pub timestamp: Timestamp,
}

/// A hit that has passed ingestion checks but has no identity yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewHit {
    pub app: String,
    pub uri: String,
    pub ip: String,
    pub timestamp: Timestamp,
}

impl NewHit {
    pub fn new(
        app: impl Into<String>, uri: impl Into<String>, ip: impl Into<String>,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            app: app.into(),
            uri: uri.into(),
            ip: ip.into(),
            timestamp,
        }
    }

    pub fn with_id(self, id: HitId) -> HitRecord {
        HitRecord {
            id,
            app: self.app,
            uri: self.uri,
            ip: self.ip,
            timestamp: self.timestamp,
        }
    }
}

/// Ingestion payload as reported by other services. Every field is required
/// but may be absent on the wire; [NewHit::try_from] decides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointHit {
    pub app: Option<String>,
    pub uri: Option<String>,
    pub ip: Option<String>,
    pub timestamp: Option<String>,
}

impl EndpointHit {
    pub fn new(
        app: impl Into<String>, uri: impl Into<String>, ip: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            app: Some(app.into()),
            uri: Some(uri.into()),
            ip: Some(ip.into()),
            timestamp: Some(timestamp.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum InvalidHit {
    #[snafu(display("field `{field}` is required"))]
    MissingField { field: &'static str },

    #[snafu(display("field `timestamp` is malformed: {source}"))]
    MalformedTimestamp { source: ParseTimestamp },
}

impl TryFrom<EndpointHit> for NewHit {
    type Error = InvalidHit;

    fn try_from(hit: EndpointHit) -> Result<Self, Self::Error> {
        let app = hit.app.context(MissingFieldSnafu { field: "app" })?;
        let uri = hit.uri.context(MissingFieldSnafu { field: "uri" })?;
        let ip = hit.ip.context(MissingFieldSnafu { field: "ip" })?;
        let timestamp = hit
            .timestamp
            .context(MissingFieldSnafu { field: "timestamp" })?;
        let timestamp = Timestamp::parse(&timestamp).context(MalformedTimestampSnafu)?;

        Ok(NewHit {
            app,
            uri,
            ip,
            timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_strings_are_still_a_hit() {
        let hit = EndpointHit::new("", "", "", "2020-01-01 00:00:00");
        let hit = NewHit::try_from(hit).unwrap();

        assert_eq!(hit.app, "");
        assert_eq!(hit.uri, "");
        assert_eq!(hit.ip, "");
    }

    #[test]
    fn missing_fields_are_reported_by_name() {
        let full = EndpointHit::new("ewm-main-service", "/events/1", "192.163.0.1", "2022-09-06 11:00:23");

        let cases = [
            ("app", EndpointHit { app: None, ..full.clone() }),
            ("uri", EndpointHit { uri: None, ..full.clone() }),
            ("ip", EndpointHit { ip: None, ..full.clone() }),
            ("timestamp", EndpointHit { timestamp: None, ..full.clone() }),
        ];

        for (expected, hit) in cases {
            let err = NewHit::try_from(hit).unwrap_err();
            assert_eq!(err, InvalidHit::MissingField { field: expected });
        }
    }

    #[test]
    fn malformed_timestamp_is_not_a_missing_field() {
        let hit = EndpointHit::new("app", "/", "10.0.0.1", "2022-09-06T11:00:23");
        let err = NewHit::try_from(hit).unwrap_err();

        assert!(matches!(err, InvalidHit::MalformedTimestamp { .. }));
    }

    #[test]
    fn hit_records_compare_by_value() {
        let timestamp = Timestamp::parse("2022-09-06 11:00:23").unwrap();
        let a = NewHit::new("app", "/events", "10.0.0.1", timestamp).with_id(HitId(1));
        let b = NewHit::new("app", "/events", "10.0.0.1", timestamp).with_id(HitId(1));
        let c = NewHit::new("app", "/events", "10.0.0.1", timestamp).with_id(HitId(2));

        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
