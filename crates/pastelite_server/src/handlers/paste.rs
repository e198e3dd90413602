//! Paste HTTP handlers.

use crate::{
    clock::request_now_ms,
    error::HttpError,
    models::paste::{CreatePasteRequest, CreatePasteResponse, PasteView},
    render, AppError, AppState, Config,
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};

const FORWARDED_PROTO_HEADER: &str = "x-forwarded-proto";
const FORWARDED_SSL_HEADER: &str = "x-forwarded-ssl";

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn request_scheme(headers: &HeaderMap) -> &str {
    if let Some(proto) = header_str(headers, FORWARDED_PROTO_HEADER) {
        // Proxy chains append; the first hop is the client-facing scheme.
        return proto.split(',').next().map(str::trim).unwrap_or(proto);
    }
    match header_str(headers, FORWARDED_SSL_HEADER) {
        Some(value) if value.eq_ignore_ascii_case("on") => "https",
        _ => "http",
    }
}

/// Resolve the public origin used in share URLs.
///
/// `BASE_URL` wins over the `Host` header. A configured base that already
/// carries a scheme is used verbatim; otherwise the scheme comes from
/// `x-forwarded-proto`, then `x-forwarded-ssl`, then defaults to `http`.
///
/// # Returns
/// `<scheme>://<base>` without a trailing slash.
///
/// # Errors
/// Returns [`AppError::Internal`] when neither `BASE_URL` nor `Host` is available.
pub fn share_base(config: &Config, headers: &HeaderMap) -> Result<String, AppError> {
    let base = config
        .base_url
        .as_deref()
        .or_else(|| header_str(headers, axum::http::header::HOST.as_str()))
        .ok_or_else(|| AppError::Internal("Unable to determine base URL".to_string()))?;

    if base.contains("://") {
        return Ok(base.trim_end_matches('/').to_string());
    }
    Ok(format!("{}://{}", request_scheme(headers), base))
}

fn share_url(base: &str, id: &str) -> String {
    format!("{}/p/{}", base, id)
}

/// Create a new paste.
///
/// # Returns
/// `201` with the paste id and share URL.
///
/// # Errors
/// Returns `400` for malformed or invalid input, `413` for oversized bodies,
/// and `500` when persistence or URL construction fails.
pub async fn create_paste(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreatePasteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatePasteResponse>), HttpError> {
    let Json(req) = payload?;
    let paste = req.validate()?;
    // Resolve the base before storing so a failure cannot orphan a record.
    let base = share_base(&state.config, &headers)?;
    let id = state.pastes.create(paste)?;
    let url = share_url(&base, &id);
    Ok((StatusCode::CREATED, Json(CreatePasteResponse { id, url })))
}

/// Fetch a paste by id, counting one view.
///
/// # Returns
/// Content plus remaining views and expiry.
///
/// # Errors
/// Returns `404` when the paste is missing, expired, or out of views, and
/// `500` when the store fails.
pub async fn get_paste(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<PasteView>, HttpError> {
    let now_ms = request_now_ms(&headers, state.config.test_mode);
    state
        .pastes
        .retrieve(&id, now_ms)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound.into())
}

/// Render a paste as escaped plain text, counting one view.
///
/// Misses render an HTML 404 page rather than JSON.
pub async fn view_paste(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let now_ms = request_now_ms(&headers, state.config.test_mode);
    match state.pastes.retrieve_content(&id, now_ms) {
        Ok(Some(content)) => Html(render::paste_page(&id, &content)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Html(render::error_page(404, "Paste not found")),
        )
            .into_response(),
        Err(err) => {
            tracing::error!("Failed to render paste {}: {}", id, err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(render::error_page(500, "Internal server error")),
            )
                .into_response()
        }
    }
}

/// Landing page with the creation form.
pub async fn index() -> Html<String> {
    Html(render::index_page())
}
