use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

use crate::error::{ExtractError, IcsError};
use crate::models::event::EventRecord;
use crate::service::extraction_service::EventExtractor;
use crate::service::ics_service::{self, ICS_CONTENT_TYPE};

const MAX_BODY_BYTES: u64 = 64 * 1024;

pub struct ApiState {
    pub extractor: EventExtractor,
    pub calendar_name: String,
}

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub text: Option<String>,
    #[serde(rename = "apiKey")]
    pub api_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: String,
    kind: &'a str,
}

pub async fn run_api(state: Arc<ApiState>, addr: SocketAddr) {
    info!(%addr, "starting API server");
    warp::serve(routes(state)).run(addr).await;
}

pub fn routes(
    state: Arc<ApiState>,
) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    let extract = warp::path!("api" / "extract-event")
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(with_state(state.clone()))
        .and_then(handle_extract);

    let ics = warp::path!("api" / "ics")
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(with_state(state))
        .and_then(handle_ics);

    extract.or(ics).unify()
}

fn with_state(
    state: Arc<ApiState>,
) -> impl Filter<Extract = (Arc<ApiState>,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

async fn handle_extract(
    request: ExtractRequest,
    state: Arc<ApiState>,
) -> Result<Response, Infallible> {
    let result = state
        .extractor
        .extract(request.text.as_deref(), request.api_key.as_deref())
        .await;
    Ok(match result {
        Ok(record) => warp::reply::json(&record).into_response(),
        Err(err) => {
            warn!(kind = err.label(), error = %err, "extraction failed");
            error_reply(extract_status(&err), err.to_string(), err.label())
        }
    })
}

async fn handle_ics(record: EventRecord, state: Arc<ApiState>) -> Result<Response, Infallible> {
    Ok(match ics_service::generate_ics(&record, &state.calendar_name) {
        Ok(content) => {
            let disposition = format!(
                "attachment; filename=\"{}\"",
                ics_service::download_filename(&record)
            );
            let reply = warp::reply::with_header(content, "Content-Type", ICS_CONTENT_TYPE);
            warp::reply::with_header(reply, "Content-Disposition", disposition).into_response()
        }
        Err(err) => {
            warn!(kind = err.label(), error = %err, "calendar generation failed");
            error_reply(ics_status(&err), err.to_string(), err.label())
        }
    })
}

fn error_reply(status: StatusCode, error: String, kind: &str) -> Response {
    warp::reply::with_status(warp::reply::json(&ErrorBody { error, kind }), status).into_response()
}

pub fn extract_status(err: &ExtractError) -> StatusCode {
    match err {
        ExtractError::MissingInput | ExtractError::MissingCredential => StatusCode::BAD_REQUEST,
        ExtractError::Backend(_) | ExtractError::ExtractionParse { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub fn ics_status(_err: &IcsError) -> StatusCode {
    StatusCode::BAD_REQUEST
}
