use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{BookingArgs, ToolSchema};
use crate::services::session::DispatchGate;
use crate::state::AppState;

fn check_auth(headers: &HeaderMap, expected_token: &str) -> Result<(), AppError> {
    // Empty token = dev mode
    if expected_token.is_empty() {
        return Ok(());
    }

    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    if token != expected_token {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

// GET /api/tools
pub async fn list_tools(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<ToolSchema>>, AppError> {
    check_auth(&headers, &state.config.tool_api_token)?;
    Ok(Json(vec![state.booking.schema()]))
}

// POST /api/tools/book_appointment
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolCallRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    pub arguments: BookingArgs,
}

#[derive(Debug, Serialize)]
pub struct ToolCallResponse {
    pub success: bool,
    pub output: Option<String>,
    pub error: Option<String>,
    pub error_kind: Option<&'static str>,
}

pub async fn book_appointment(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<ToolCallRequest>, JsonRejection>,
) -> Result<Json<ToolCallResponse>, AppError> {
    check_auth(&headers, &state.config.tool_api_token)?;

    let Json(call) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let gate = DispatchGate::new(call.session_id);

    let outcome = state.booking.book_appointment(&gate, &call.arguments).await;

    let response = match outcome {
        Ok(body) => ToolCallResponse {
            success: true,
            output: Some(body),
            error: None,
            error_kind: None,
        },
        Err(e) => {
            let verbose = state.booking.settings().verbose_errors;
            ToolCallResponse {
                success: false,
                output: None,
                error: Some(e.narration(verbose)),
                error_kind: Some(e.kind()),
                }
        }
    };

    Ok(Json(response))
}
