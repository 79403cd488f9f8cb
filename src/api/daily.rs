//! `/api/daily/*` — the daily fortune with its once-per-day point bonus,
//! and the points history view.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;

use crate::daily::daily_fortune;
use crate::error::UnseiError;
use crate::{store_call, AppState};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRequest {
    pub user_id: Option<String>,
    pub birthdate: Option<String>,
}

/// POST /api/daily/fortune
pub async fn fortune(
    State(state): State<AppState>,
    Json(req): Json<DailyRequest>,
) -> Result<Json<serde_json::Value>, UnseiError> {
    let Some(birthdate) = req.birthdate else {
        return Err(UnseiError::Validation("生年月日が必要です".to_string()));
    };
    let date = super::parse_date(&birthdate, "生年月日が必要です")?;

    let now = Utc::now();
    let mut reading = daily_fortune(date, now.date_naive());

    // known users get +5 points the first time each calendar day; an unknown
    // id is skipped silently and leaves bonusPoints absent
    if let Some(user_id) = req.user_id {
        let users = state.users.clone();
        let result = serde_json::to_value(&reading)?;
        let bonus = store_call(move || users.claim_daily(&user_id, result, now)).await?;
        reading.bonus_points = bonus;
    }

    Ok(Json(serde_json::json!({
        "success": true,
        "dailyFortune": reading,
    })))
}

/// GET /api/daily/points/{user_id}
pub async fn points(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<serde_json::Value>, UnseiError> {
    let users = state.users.clone();
    let record = store_call(move || users.get(&user_id)).await?;

    let history: Vec<serde_json::Value> = record
        .readings
        .iter()
        .filter(|r| r.bonus_points.is_some())
        .map(|r| {
            serde_json::json!({
                "date": r.date,
                "type": r.kind,
                "points": r.bonus_points.unwrap_or(0),
            })
        })
        .collect();

    Ok(Json(serde_json::json!({
        "success": true,
        "pointsInfo": {
            "totalPoints": record.points,
            "loginStreak": record.login_streak,
            "pointsHistory": history,
        },
    })))
}
