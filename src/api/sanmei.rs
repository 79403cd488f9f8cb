//! `/api/sanmei/*` — personality, yearly fortune, compatibility. This family
//! derives pillars with the legacy modular arithmetic.

use axum::extract::State;
use axum::Json;
use chrono::{Datelike, SecondsFormat, Utc};
use serde::Deserialize;

use crate::compat;
use crate::error::UnseiError;
use crate::ganzhi::{GanzhiProvider, LegacyProvider};
use crate::personality::personality_from_kanshi;
use crate::scoring::yearly_fortune;
use crate::store::Reading;
use crate::{store_call, AppState};

#[derive(Deserialize)]
pub struct PersonalityRequest {
    pub birthdate: Option<String>,
}

/// POST /api/sanmei/personality
pub async fn personality(
    Json(req): Json<PersonalityRequest>,
) -> Result<Json<serde_json::Value>, UnseiError> {
    let Some(birthdate) = req.birthdate else {
        return Err(UnseiError::Validation("生年月日が必要です".to_string()));
    };
    let date = super::parse_date(&birthdate, "生年月日が必要です")?;

    let chart = LegacyProvider.chart(date);
    let reading = personality_from_kanshi(chart.year.stem, chart.year.branch);

    Ok(Json(serde_json::json!({
        "success": true,
        "kanshi": {
            "year": chart.year.label(),
            "month": chart.month.label(),
            "day": chart.day.label(),
        },
        "personality": reading,
    })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FortuneRequest {
    pub user_id: Option<String>,
    pub birthdate: Option<String>,
    pub target_year: Option<i32>,
}

/// POST /api/sanmei/fortune
pub async fn fortune(
    State(state): State<AppState>,
    Json(req): Json<FortuneRequest>,
) -> Result<Json<serde_json::Value>, UnseiError> {
    let Some(birthdate) = req.birthdate else {
        return Err(UnseiError::Validation("生年月日が必要です".to_string()));
    };
    let date = super::parse_date(&birthdate, "生年月日が必要です")?;

    let now = Utc::now();
    let today = now.date_naive();
    let target_year = req.target_year.unwrap_or(today.year());
    let reading = yearly_fortune(date, target_year, today);
    let result = serde_json::to_value(&reading)?;

    if let Some(user_id) = req.user_id {
        let users = state.users.clone();
        let stored = result.clone();
        store_call(move || {
            users.append_reading(
                &user_id,
                Reading {
                    kind: "fortune".to_string(),
                    date: now.to_rfc3339_opts(SecondsFormat::Millis, true),
                    partner_birthdate: None,
                    result: stored,
                    bonus_points: None,
                },
            )
        })
        .await?;
    }

    Ok(Json(serde_json::json!({
        "success": true,
        "fortune": result,
    })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityRequest {
    pub user_id: Option<String>,
    pub birthdate: Option<String>,
    pub partner_birthdate: Option<String>,
}

/// POST /api/sanmei/compatibility
pub async fn compatibility(
    State(state): State<AppState>,
    Json(req): Json<CompatibilityRequest>,
) -> Result<Json<serde_json::Value>, UnseiError> {
    let (Some(birthdate), Some(partner_birthdate)) = (req.birthdate, req.partner_birthdate)
    else {
        return Err(UnseiError::Validation(
            "両者の生年月日が必要です".to_string(),
        ));
    };
    let person = super::parse_date(&birthdate, "両者の生年月日が必要です")?;
    let partner = super::parse_date(&partner_birthdate, "両者の生年月日が必要です")?;

    let reading = compat::analyze(person, partner);

    if let Some(user_id) = req.user_id {
        let now = Utc::now();
        let users = state.users.clone();
        let stored = serde_json::to_value(&reading)?;
        store_call(move || {
            users.append_reading(
                &user_id,
                Reading {
                    kind: "compatibility".to_string(),
                    date: now.to_rfc3339_opts(SecondsFormat::Millis, true),
                    partner_birthdate: Some(partner_birthdate),
                    result: stored,
                    bonus_points: None,
                },
            )
        })
        .await?;
    }

    Ok(Json(serde_json::json!({
        "success": true,
        "personKanshi": reading.person_kanshi,
        "partnerKanshi": reading.partner_kanshi,
        "compatibility": reading.compatibility,
    })))
}
