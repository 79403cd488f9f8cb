//! `/api/users/*` — registered-user lifecycle and the login streak bonus.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;

use crate::error::UnseiError;
use crate::{store_call, AppState};

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub birthdate: Option<String>,
    pub gender: Option<String>,
}

/// POST /api/users/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), UnseiError> {
    let (Some(name), Some(birthdate), Some(gender)) = (req.name, req.birthdate, req.gender)
    else {
        return Err(UnseiError::Validation(
            "必須項目が不足しています".to_string(),
        ));
    };
    super::parse_date(&birthdate, "必須項目が不足しています")?;

    let now = Utc::now();
    let users = state.users.clone();
    let record =
        store_call(move || users.create(&name, &birthdate, &gender, now)).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "success": true,
            "userId": record.id,
            "message": "ユーザーが正常に作成されました",
        })),
    ))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub user_id: Option<String>,
}

/// POST /api/users/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>, UnseiError> {
    let Some(user_id) = req.user_id else {
        return Err(UnseiError::Validation("ユーザーIDが必要です".to_string()));
    };

    let now = Utc::now();
    let users = state.users.clone();
    let outcome = store_call(move || users.login(&user_id, now)).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "user": outcome.user,
        "dailyBonus": outcome.daily_bonus,
    })))
}

/// GET /api/users/{user_id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<serde_json::Value>, UnseiError> {
    let users = state.users.clone();
    let record = store_call(move || users.get(&user_id)).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "user": record.view(),
    })))
}

/// DELETE /api/users/{user_id}
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<serde_json::Value>, UnseiError> {
    let users = state.users.clone();
    store_call(move || users.delete(&user_id)).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "ユーザーデータが正常に削除されました",
    })))
}
