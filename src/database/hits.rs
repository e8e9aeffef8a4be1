use std::future::Future;

use chrono::{DateTime, Utc};
use snafu::{ensure, ResultExt as _};

use super::*;
use crate::model::{HitId, HitRecord, NewHit, Timestamp};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum HitStoreError {
    #[snafu(display("range start {start} is after its end {end}"))]
    InvalidRange {
        start: Timestamp,
        end: Timestamp,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("hit storage is unavailable: {source}"))]
    StorageUnavailable {
        source: DatabaseError,
        #[snafu(implicit)]
        location: Location,
    },
}

/// Durable, append-only storage of [HitRecord]s.
///
/// Both range bounds are inclusive. Records come back in insertion order.
pub trait HitStore {
    /// Store one hit and return the identity assigned to it.
    fn insert(&self, hit: NewHit) -> impl Future<Output = Result<HitId, HitStoreError>> + Send;

    /// All hits with `start <= timestamp <= end`.
    fn query_range(
        &self, start: Timestamp, end: Timestamp,
    ) -> impl Future<Output = Result<Vec<HitRecord>, HitStoreError>> + Send;

    /// Like [HitStore::query_range], restricted to hits whose `uri` is one of `uris`.
    fn query_range_filtered(
        &self, start: Timestamp, end: Timestamp, uris: &[String],
    ) -> impl Future<Output = Result<Vec<HitRecord>, HitStoreError>> + Send;
}

/// Bumps the shared counter, then creates the hit under the new number.
/// The counter update is a single atomic statement so numbers are never handed out twice.
const INSERT_HIT: &str = "
LET $counter = (UPDATE ONLY counter:hits SET last += 1);
CREATE hits SET
    number = $counter.last,
    app = $app,
    uri = $uri,
    ip = $ip,
    timestamp = <datetime> $timestamp
RETURN number;
";

const SELECT_RANGE: &str = "
SELECT number, app, uri, ip, timestamp FROM hits
WHERE timestamp >= <datetime> $start AND timestamp <= <datetime> $end
ORDER BY number ASC;
";

const SELECT_RANGE_FILTERED: &str = "
SELECT number, app, uri, ip, timestamp FROM hits
WHERE timestamp >= <datetime> $start AND timestamp <= <datetime> $end AND uri INSIDE $uris
ORDER BY number ASC;
";

#[derive(Debug, Deserialize)]
struct HitRow {
    number: u64,
    app: String,
    uri: String,
    ip: String,
    timestamp: DateTime<Utc>,
}

impl From<HitRow> for HitRecord {
    fn from(row: HitRow) -> Self {
        HitRecord::new(
            HitId(row.number),
            row.app,
            row.uri,
            row.ip,
            row.timestamp.into(),
        )
    }
}

#[derive(Debug, Deserialize)]
struct Inserted {
    number: u64,
}

fn check_range(start: Timestamp, end: Timestamp) -> Result<(), HitStoreError> {
    ensure!(start <= end, InvalidRangeSnafu { start, end });
    Ok(())
}

impl HitStore for Database {
    #[tracing::instrument(skip(self))]
    async fn insert(&self, hit: NewHit) -> Result<HitId, HitStoreError> {
        let inserted: Inserted = self
            .sql(INSERT_HIT)
            .bind(("app", hit.app))
            .bind(("uri", hit.uri))
            .bind(("ip", hit.ip))
            .bind(("timestamp", hit.timestamp.to_rfc3339()))
            .fetch_one_at(1)
            .await
            .context(StorageUnavailableSnafu)?;

        let id = HitId(inserted.number);
        tracing::debug!(%id, "stored hit");
        Ok(id)
    }

    #[tracing::instrument(skip(self))]
    async fn query_range(
        &self, start: Timestamp, end: Timestamp,
    ) -> Result<Vec<HitRecord>, HitStoreError> {
        check_range(start, end)?;

        let rows: Vec<HitRow> = self
            .sql(SELECT_RANGE)
            .bind(("start", start.to_rfc3339()))
            .bind(("end", end.to_rfc3339()))
            .fetch_first()
            .await
            .context(StorageUnavailableSnafu)?;

        Ok(rows.into_iter().map(HitRecord::from).collect())
    }

    #[tracing::instrument(skip(self))]
    async fn query_range_filtered(
        &self, start: Timestamp, end: Timestamp, uris: &[String],
    ) -> Result<Vec<HitRecord>, HitStoreError> {
        check_range(start, end)?;

        if uris.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<HitRow> = self
            .sql(SELECT_RANGE_FILTERED)
            .bind(("start", start.to_rfc3339()))
            .bind(("end", end.to_rfc3339()))
            .bind(("uris", uris.to_vec()))
            .fetch_first()
            .await
            .context(StorageUnavailableSnafu)?;

        Ok(rows.into_iter().map(HitRecord::from).collect())
    }
}
