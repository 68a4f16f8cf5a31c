//! # エラーレスポンス（RFC 9457 Problem Details）
//!
//! 両サービスが返すエラーボディ。axum の `IntoResponse` 変換は各サービス側で行う。
//!
//! `type` は `https://sonamesolutions.example.com/errors/<suffix>` の形式。
//! 両サービスで共通の種別は [`ProblemKind`] にまとめ、
//! サービス固有の種別は [`ErrorResponse::new`] で作る。

use serde::{Deserialize, Serialize};

/// `type` URI のベース
const ERROR_TYPE_BASE: &str = "https://sonamesolutions.example.com/errors";

/// 共通の問題種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    BadGateway,
    ServiceUnavailable,
}

impl ProblemKind {
    /// `type` のサフィックス
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::BadRequest => "bad-request",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::BadGateway => "bad-gateway",
            Self::ServiceUnavailable => "service-unavailable",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::BadRequest => "Bad Request",
            Self::Unauthorized => "Unauthorized",
            Self::Forbidden => "Forbidden",
            Self::BadGateway => "Bad Gateway",
            Self::ServiceUnavailable => "Service Unavailable",
        }
    }

    pub const fn status(self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::BadGateway => 502,
            Self::ServiceUnavailable => 503,
        }
    }
}

/// Problem Details ボディ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "type")]
    pub error_type: String,
    pub title:      String,
    pub status:     u16,
    pub detail:     String,
}

impl ErrorResponse {
    /// サービス固有の種別で作成する
    pub fn new(
        error_type_suffix: &str,
        title: impl Into<String>,
        status: u16,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            error_type: format!("{ERROR_TYPE_BASE}/{error_type_suffix}"),
            title: title.into(),
            status,
            detail: detail.into(),
        }
    }

    pub fn of(kind: ProblemKind, detail: impl Into<String>) -> Self {
        Self::new(kind.suffix(), kind.title(), kind.status(), detail)
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::of(ProblemKind::BadRequest, detail)
    }

    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::of(ProblemKind::Unauthorized, detail)
    }

    pub fn forbidden(detail: impl Into<String>) -> Self {
        Self::of(ProblemKind::Forbidden, detail)
    }

    /// 下流サービスがエラーを返した
    pub fn bad_gateway(detail: impl Into<String>) -> Self {
        Self::of(ProblemKind::BadGateway, detail)
    }

    /// 下流サービスに接続できない
    pub fn service_unavailable(detail: impl Into<String>) -> Self {
        Self::of(ProblemKind::ServiceUnavailable, detail)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_サービス固有の種別をベースuriに付加する() {
        let sut = ErrorResponse::new(
            "token-acquisition-failed",
            "Token Acquisition Failed",
            502,
            "アクセストークンを取得できませんでした",
        );

        assert_eq!(
            sut.error_type,
            "https://sonamesolutions.example.com/errors/token-acquisition-failed"
        );
        assert_eq!(sut.status, 502);
    }

    #[rstest]
    #[case(ErrorResponse::bad_request("x"), "bad-request", 400)]
    #[case(ErrorResponse::unauthorized("x"), "unauthorized", 401)]
    #[case(ErrorResponse::forbidden("x"), "forbidden", 403)]
    #[case(ErrorResponse::bad_gateway("x"), "bad-gateway", 502)]
    #[case(ErrorResponse::service_unavailable("x"), "service-unavailable", 503)]
    fn test_共通種別のtypeとstatus(
        #[case] sut: ErrorResponse,
        #[case] suffix: &str,
        #[case] status: u16,
    ) {
        assert_eq!(sut.error_type, format!("{ERROR_TYPE_BASE}/{suffix}"));
        assert_eq!(sut.status, status);
        assert_eq!(sut.detail, "x");
    }

    #[test]
    fn test_jsonではtypeフィールドとして出力する() {
        let sut = ErrorResponse::unauthorized("アクセストークンが必要です");

        let json = serde_json::to_value(&sut).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "type": "https://sonamesolutions.example.com/errors/unauthorized",
                "title": "Unauthorized",
                "status": 401,
                "detail": "アクセストークンが必要です",
            })
        );
    }
}
