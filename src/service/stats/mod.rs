use derive_new::new;
use snafu::ResultExt as _;
use tracing::instrument;

use crate::database::HitStore;
use crate::model::{EndpointHit, HitId, NewHit, Timestamp, ViewStats};

pub use aggregate::{summarize, unique_by_ip};
pub use error::*;

mod aggregate;
mod error;

/// Records endpoint hits and answers traffic summaries over them.
#[derive(Debug, Clone, new)]
pub struct StatsService<S> {
    store: S,
}

impl<S: HitStore> StatsService<S> {
    /// Append one hit. Nothing is deduplicated here, every call stores exactly one record.
    #[instrument(skip(self))]
    pub async fn record(&self, hit: EndpointHit) -> Result<HitId> {
        let hit = NewHit::try_from(hit)?;
        let id = self.store.insert(hit).await?;

        tracing::info!(%id, "recorded hit");
        Ok(id)
    }

    /// Summarize hits between `start` and `end` (inclusive, `yyyy-MM-dd HH:mm:ss`).
    ///
    /// An empty `uris` means every endpoint. With `unique`, every client address counts once
    /// for the whole result, on the first hit the store returned for it.
    #[instrument(skip(self))]
    pub async fn stats(
        &self, start: &str, end: &str, uris: &[String], unique: bool,
    ) -> Result<Vec<ViewStats>> {
        let start = Timestamp::parse(start).context(InvalidTimeFormatSnafu)?;
        let end = Timestamp::parse(end).context(InvalidTimeFormatSnafu)?;

        let hits = if uris.is_empty() {
            self.store.query_range(start, end).await?
        } else {
            self.store.query_range_filtered(start, end, uris).await?
        };
        tracing::debug!(candidates = hits.len(), "fetched hits");

        let hits = if unique { unique_by_ip(hits) } else { hits };
        let stats = summarize(&hits);

        tracing::info!(endpoints = stats.len(), "collected stats");
        Ok(stats)
    }
}
