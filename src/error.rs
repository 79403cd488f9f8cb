use axum::http::StatusCode;
use axum::Json;
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum UnseiError {
    #[error("{0}")]
    Validation(String),

    #[error("ユーザーが見つかりません")]
    NotFound,

    #[error("User ID not found")]
    CookieMissing,

    #[error("unauthorized")]
    Unauthorized,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("fortune calculation failed: {0}")]
    FortuneCalc(String),

    #[error("record decryption failed: {0}")]
    Crypto(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl UnseiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::CookieMissing | Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Io(_) | Self::Json(_) | Self::FortuneCalc(_) | Self::Crypto(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message exposed on the wire. 5xx details stay in the server log,
    /// except the fortune calculation path, which also echoes them.
    fn public_message(&self) -> String {
        match self {
            Self::FortuneCalc(_) => "運勢の計算中にエラーが発生しました".to_string(),
            _ if self.status_code().is_server_error() => {
                "サーバーエラーが発生しました".to_string()
            }
            _ => self.to_string(),
        }
    }
}

impl axum::response::IntoResponse for UnseiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        let mut body = serde_json::json!({
            "success": false,
            "error": self.public_message(),
        });
        if let Self::FortuneCalc(details) = &self {
            body["details"] = serde_json::Value::String(details.clone());
        }
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;
    use http_body_util::BodyExt;

    async fn response_json(err: UnseiError) -> (StatusCode, serde_json::Value) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn fortune_calc_failure_echoes_details() {
        let (status, body) =
            response_json(UnseiError::FortuneCalc("disk full".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "運勢の計算中にエラーが発生しました");
        assert_eq!(body["details"], "disk full");
    }

    #[tokio::test]
    async fn other_server_errors_mask_the_cause() {
        let (status, body) = response_json(UnseiError::Internal("boom".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "サーバーエラーが発生しました");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn validation_errors_pass_their_message_through() {
        let (status, body) =
            response_json(UnseiError::Validation("生年月日が必要です".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "生年月日が必要です");
        assert!(body.get("details").is_none());
    }
}
