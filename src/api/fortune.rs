//! `/api/fortune` — the full chart reading — and `/api/fortune/time`.
//!
//! This family uses the solar ganzhi provider; the `/api/sanmei/*` family
//! keeps the legacy arithmetic, and the two intentionally disagree.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;

use crate::error::UnseiError;
use crate::ganzhi::SolarProvider;
use crate::meishiki::{analyze_fortune, analyze_personality, build_meishiki, BODY_STAR_GRID};
use crate::timefortune::{time_fortune as read_time_fortune, TimeSpan};
use crate::{store_call, AppState};

#[derive(Deserialize)]
pub struct FortuneRequest {
    pub birthday: Option<String>,
    pub gender: Option<String>,
    pub theme: Option<String>,
}

/// POST /api/fortune
pub async fn basic_fortune(
    Json(req): Json<FortuneRequest>,
) -> Result<Json<serde_json::Value>, UnseiError> {
    let (Some(birthday), Some(gender)) = (req.birthday, req.gender) else {
        return Err(UnseiError::Validation("生年月日と性別は必須です".to_string()));
    };
    let date = super::parse_date(&birthday, "生年月日と性別は必須です")?;

    let meishiki = build_meishiki(&SolarProvider, date, &gender);
    let chart = meishiki.chart;
    let personality = analyze_personality(&chart);
    let full = analyze_fortune(&chart);
    let fortune = match req.theme.as_deref() {
        Some("love") => serde_json::json!({ "love": full.love }),
        Some("work") => serde_json::json!({ "work": full.work }),
        Some("health") => serde_json::json!({ "health": full.health }),
        _ => serde_json::to_value(&full)
            .map_err(|e| UnseiError::FortuneCalc(e.to_string()))?,
    };

    Ok(Json(serde_json::json!({
        "birthday": birthday,
        "gender": gender,
        "ganzhi": {
            "year": chart.year.label(),
            "month": chart.month.label(),
            "day": chart.day.label(),
            "hour": chart.hour.label(),
        },
        "meishiki": meishiki,
        "personality": personality,
        "fortune": fortune,
        "bodyStars": BODY_STAR_GRID,
    })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeFortuneRequest {
    pub user_id: Option<String>,
    pub birthdate: Option<String>,
    pub time_type: Option<TimeSpan>,
}

/// POST /api/fortune/time
pub async fn time_fortune(
    State(state): State<AppState>,
    Json(req): Json<TimeFortuneRequest>,
) -> Result<Json<serde_json::Value>, UnseiError> {
    let Some(birthdate) = req.birthdate else {
        return Err(UnseiError::Validation("生年月日が必要です".to_string()));
    };
    let date = super::parse_date(&birthdate, "生年月日が必要です")?;
    let Some(span) = req.time_type else {
        return Err(UnseiError::Validation(
            "timeTypeが必要です (day/month/year)".to_string(),
        ));
    };

    let now = Utc::now();
    let reading = read_time_fortune(date, now.date_naive(), span);
    let payload = serde_json::json!({
        "timeType": span,
        "period": reading.period,
        "gogyoValues": reading.gogyo_values,
        "strongestElement": reading.strongest_element,
        "weakestElement": reading.weakest_element,
        "general": reading.fortune.general,
        "love": reading.fortune.love,
        "work": reading.fortune.work,
        "health": reading.fortune.health,
        "advice": reading.fortune.advice,
        "starEnergy": reading.star_energy,
    });

    if let Some(user_id) = req.user_id {
        let users = state.users.clone();
        let result = payload.clone();
        store_call(move || {
            users.append_reading(
                &user_id,
                crate::store::Reading {
                    kind: "time-fortune".to_string(),
                    date: now.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
                    partner_birthdate: None,
                    result,
                    bonus_points: None,
                },
            )
        })
        .await
        .map_err(|e| UnseiError::FortuneCalc(e.to_string()))?;
    }

    Ok(Json(serde_json::json!({
        "success": true,
        "timeFortune": payload,
    })))
}
