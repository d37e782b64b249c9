//! Liveness, diagnostic and usage responses for `GET`.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::state::AppState;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Default, Deserialize)]
pub struct StatusQuery {
    pub ping: Option<String>,
    pub diagnose: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Status {
    pub status: &'static str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configs: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub menus: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub triggers: Option<i64>,
}

impl Status {
    fn ok() -> Self {
        Self {
            status: "ok",
            version: VERSION,
            message: None,
            usage: None,
            configs: None,
            menus: None,
            triggers: None,
        }
    }
}

/// `?ping=true` answers liveness, `?diagnose=true` counts configuration rows,
/// anything else returns a usage hint.
pub async fn status(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<Status>> {
    if query.ping.as_deref() == Some("true") {
        return Ok(Json(Status {
            message: Some("Chatbot is online"),
            ..Status::ok()
        }));
    }

    if query.diagnose.as_deref() == Some("true") {
        let counts = database::chatbot::count_configuration(state.db.pool()).await?;
        return Ok(Json(Status {
            status: "diagnostic",
            configs: Some(counts.configs),
            menus: Some(counts.menus),
            triggers: Some(counts.triggers),
            ..Status::ok()
        }));
    }

    Ok(Json(Status {
        usage: Some("POST webhook payload"),
        ..Status::ok()
    }))
}
