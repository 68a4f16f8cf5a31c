//! # サービス共通ユーティリティ
//!
//! Articles Service と User Schedule Service の両方で使用される
//! 共通ユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - axum には依存しない（`IntoResponse` 変換は各サービスの責務）
//! - HTTP / tracing 関連の依存は feature でオプトインする
//!
//! ## feature
//!
//! | feature | 内容 |
//! |---------|------|
//! | `observability` | トレーシング初期化、Request ID、Canonical Log Line |
//! | `access-rule` | メソッド + パスによるアクセスルールチェーン |

#[cfg(feature = "access-rule")]
pub mod access_rule;
#[cfg(feature = "observability")]
pub mod canonical_log;
pub mod clock;
pub mod config;
pub mod error_response;
pub mod health;
pub mod observability;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::ConfigError;
pub use error_response::ErrorResponse;
pub use health::{CheckStatus, HealthResponse, ReadinessResponse, ReadinessStatus};
