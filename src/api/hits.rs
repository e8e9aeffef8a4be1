use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::{Query, QueryRejection};
use serde::{Deserialize, Serialize};
use snafu::ResultExt as _;
use tracing::instrument;

use super::error::{MalformedBodySnafu, MalformedQuerySnafu};
use super::{App, Result};
use crate::model::{EndpointHit, ViewStats};

#[instrument(skip_all)]
pub async fn create(
    State(app): State<App>,
    payload: std::result::Result<Json<EndpointHit>, JsonRejection>,
) -> Result<StatusCode> {
    let Json(payload) = payload.context(MalformedBodySnafu)?;
    app.record(payload).await?;
    Ok(StatusCode::CREATED)
}

/// A missing `start` or `end` is left empty and fails as a malformed date-time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsParams {
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
    #[serde(default)]
    pub uris: Vec<String>,
    #[serde(default)]
    pub unique: bool,
}

impl StatsParams {
    /// `uris` may be repeated (`uris=/a&uris=/b`) or comma separated (`uris=/a,/b`).
    fn uris(&self) -> Vec<String> {
        self.uris
            .iter()
            .flat_map(|uris| uris.split(','))
            .filter(|uri| !uri.is_empty())
            .map(str::to_owned)
            .collect()
    }
}

#[instrument(skip_all)]
pub async fn stats(
    State(app): State<App>,
    params: std::result::Result<Query<StatsParams>, QueryRejection>,
) -> Result<Json<Vec<ViewStats>>> {
    let Query(params) = params.context(MalformedQuerySnafu)?;
    let uris = params.uris();
    let stats = app
        .stats(&params.start, &params.end, &uris, params.unique)
        .await?;

    Ok(Json(stats))
}
