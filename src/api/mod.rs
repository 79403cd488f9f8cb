use axum::extract::State;
use axum::http::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use subtle::ConstantTimeEq;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;

use crate::error::UnseiError;
use crate::{store_call, AppState};

mod daily;
mod fortune;
mod sanmei;
mod users;
mod visitor;

/// Thirty days.
const COOKIE_MAX_AGE_SECS: u64 = 30 * 24 * 60 * 60;

/// Pull the visitor id out of the Cookie header.
fn cookie_user_id(headers: &axum::http::HeaderMap) -> Option<String> {
    headers
        .get("cookie")
        .and_then(|v| v.to_str().ok())?
        .split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix("userId="))
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

fn visitor_cookie(id: &str) -> String {
    format!("userId={id}; Max-Age={COOKIE_MAX_AGE_SECS}; Path=/; HttpOnly; SameSite=Strict")
}

fn parse_date(raw: &str, message: &str) -> Result<NaiveDate, UnseiError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| UnseiError::Validation(message.to_string()))
}

/// Admin auth middleware: checks Bearer token if UNSEI_ADMIN_KEY is configured.
async fn require_admin(
    State(state): State<AppState>,
    req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, UnseiError> {
    let Some(ref expected) = state.admin_key else {
        return Ok(next.run(req).await);
    };

    let unauthorized = || UnseiError::Unauthorized;

    let header = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(unauthorized)?;

    let token = header.strip_prefix("Bearer ").ok_or_else(unauthorized)?;

    // constant-time comparison to prevent timing attacks
    if token.as_bytes().ct_eq(expected.as_bytes()).into() {
        Ok(next.run(req).await)
    } else {
        Err(unauthorized())
    }
}

pub fn router(state: AppState) -> Router {
    let admin = Router::new()
        .route("/api/admin/stats", get(visitor::admin_stats))
        .layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .route("/health", get(health))
        .route("/api/fortune", post(fortune::basic_fortune))
        .route("/api/fortune/time", post(fortune::time_fortune))
        .route("/api/sanmei/personality", post(sanmei::personality))
        .route("/api/sanmei/fortune", post(sanmei::fortune))
        .route("/api/sanmei/compatibility", post(sanmei::compatibility))
        .route("/api/daily/fortune", post(daily::fortune))
        .route("/api/daily/points/{user_id}", get(daily::points))
        .route("/api/users/register", post(users::register))
        .route("/api/users/login", post(users::login))
        .route(
            "/api/users/{user_id}",
            get(users::get_user).delete(users::delete_user),
        )
        .route("/api/user/init", get(visitor::init))
        .route("/api/user/save-result", post(visitor::save_result))
        .route("/api/user/results", get(visitor::results))
        .merge(admin)
        .layer(RequestBodyLimitLayer::new(64 * 1024))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// GET /health — uptime and store counts.
async fn health(State(state): State<AppState>) -> Result<Json<serde_json::Value>, UnseiError> {
    let users = state.users.clone();
    let visitors = state.visitors.clone();
    let (user_count, visitor_count) =
        store_call(move || Ok((users.count(), visitors.count()))).await?;
    Ok(Json(serde_json::json!({
        "name": "unsei",
        "version": env!("CARGO_PKG_VERSION"),
        "uptimeSecs": state.started_at.elapsed().as_secs(),
        "users": user_count,
        "visitors": visitor_count,
    })))
}
