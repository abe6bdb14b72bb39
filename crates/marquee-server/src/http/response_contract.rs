// SPDX-License-Identifier: Apache-2.0

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use marquee_api::error_mapping::map_error;
use marquee_api::{ApiError, ApiErrorCode};
use marquee_store::{StoreError, StoreErrorCode};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info, warn};

#[must_use]
pub(crate) fn api_error_status(err: &ApiError) -> StatusCode {
    StatusCode::from_u16(map_error(err).status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

#[must_use]
pub(crate) fn api_error_response(status: StatusCode, err: ApiError) -> Response {
    if status.is_server_error() {
        error!(code = err.code.as_str(), status = status.as_u16(), "{}", err.message);
    } else if status == StatusCode::NOT_FOUND {
        info!(code = err.code.as_str(), "{}", err.message);
    } else {
        warn!(code = err.code.as_str(), status = status.as_u16(), "{}", err.message);
    }
    (status, Json(err)).into_response()
}

/// Success body with `status`, or the mapped error.
#[must_use]
pub(crate) fn respond<T: Serialize>(result: Result<T, ApiError>, status: StatusCode) -> Response {
    match result {
        Ok(body) => (status, Json(body)).into_response(),
        Err(err) => {
            let status = api_error_status(&err);
            api_error_response(status, err)
        }
    }
}

/// The one place store failures become wire errors.
#[must_use]
pub(crate) fn api_error_from_store(err: StoreError) -> ApiError {
    match err.code {
        StoreErrorCode::NotFound => ApiError::movie_not_found(err.message),
        StoreErrorCode::Validation => match &err.validation {
            Some(validation) => ApiError::validation_failed(validation),
            None => ApiError::new(ApiErrorCode::ValidationFailed, err.message, json!({})),
        },
        StoreErrorCode::Unavailable => ApiError::store_unavailable(err.message),
        _ => ApiError::new(
            ApiErrorCode::Internal,
            err.message,
            json!({ "store_code": err.code.as_str() }),
        ),
    }
}
