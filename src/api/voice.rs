//! Streaming voice relay endpoint
//!
//! `GET /api/voice?text=…` forwards the synthesis client's chunk stream
//! directly onto the response body with no server-side buffering. If
//! synthesis fails after the first chunk the body is truncated; the client
//! observes that as a decode failure downstream.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::ApiState;

/// Build voice router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/api/voice", get(relay))
        .with_state(state)
}

/// Relay query parameters
#[derive(Debug, Deserialize)]
pub struct RelayParams {
    text: Option<String>,
}

/// Relay synthesized speech for `text` as a streamed MP3 body
async fn relay(
    State(state): State<Arc<ApiState>>,
    Query(params): Query<RelayParams>,
) -> Result<Response, VoiceError> {
    let text = params
        .text
        .filter(|t| !t.is_empty())
        .ok_or(VoiceError::MissingText)?;

    tracing::debug!(chars = text.len(), "relaying synthesized speech");

    let stream = state
        .synth
        .stream(&text)
        .await
        .map_err(|e| VoiceError::SynthesisFailed(e.to_string()))?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "audio/mpeg")],
        Body::from_stream(stream),
    )
        .into_response())
}

/// Voice relay errors
#[derive(Debug)]
pub enum VoiceError {
    /// The `text` query parameter is missing or empty
    MissingText,
    /// Synthesis failed before the first chunk was produced
    SynthesisFailed(String),
}

impl IntoResponse for VoiceError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: ErrorBody,
        }

        #[derive(Serialize)]
        struct ErrorBody {
            code: &'static str,
            message: String,
        }

        match self {
            // Plain-text body kept stable for clients that match on it
            Self::MissingText => (StatusCode::BAD_REQUEST, "No data").into_response(),
            Self::SynthesisFailed(message) => (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: ErrorBody {
                        code: "synthesis_failed",
                        message,
                    },
                }),
            )
                .into_response(),
        }
    }
}
