//! Cookie-identified visitor endpoints and the admin stats view.

use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::{AppendHeaders, IntoResponse};
use axum::Json;
use chrono::Utc;

use crate::error::UnseiError;
use crate::{store_call, AppState};

/// GET /api/user/init — bootstrap the visitor and refresh the cookie.
pub async fn init(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, UnseiError> {
    let cookie_id = super::cookie_user_id(&headers);
    let now = Utc::now();

    let visitors = state.visitors.clone();
    let stats = state.stats.clone();
    let (record, is_new) = store_call(move || {
        let out = visitors.init(cookie_id.as_deref(), now)?;
        stats.record(None, out.1, now.date_naive())?;
        Ok(out)
    })
    .await?;

    let cookie = super::visitor_cookie(&record.user_id);
    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(serde_json::json!({
            "userId": record.user_id,
            "isNewUser": is_new,
        })),
    ))
}

/// POST /api/user/save-result — persist a fortune result for the cookie's
/// visitor; the result's `type` field feeds the stats counters.
pub async fn save_result(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(result): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, UnseiError> {
    let Some(visitor_id) = super::cookie_user_id(&headers) else {
        return Err(UnseiError::CookieMissing);
    };
    let now = Utc::now();
    let fortune_type = result
        .get("type")
        .and_then(|v| v.as_str())
        .map(str::to_string);

    let visitors = state.visitors.clone();
    let stats = state.stats.clone();
    let result_id = store_call(move || {
        let Some(result_id) = visitors.save_result(&visitor_id, result, now)? else {
            return Err(UnseiError::NotFound);
        };
        stats.record(fortune_type.as_deref(), false, now.date_naive())?;
        Ok(result_id)
    })
    .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "resultId": result_id,
    })))
}

/// GET /api/user/results
pub async fn results(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, UnseiError> {
    let Some(visitor_id) = super::cookie_user_id(&headers) else {
        return Err(UnseiError::CookieMissing);
    };
    let visitors = state.visitors.clone();
    let results = store_call(move || visitors.results(&visitor_id))
        .await?
        .ok_or(UnseiError::NotFound)?;
    Ok(Json(serde_json::json!({ "results": results })))
}

/// GET /api/admin/stats — behind the optional bearer key.
pub async fn admin_stats(
    State(state): State<AppState>,
) -> Result<Json<crate::store::Stats>, UnseiError> {
    let stats = state.stats.clone();
    let snapshot = store_call(move || stats.snapshot()).await?;
    Ok(Json(snapshot))
}
