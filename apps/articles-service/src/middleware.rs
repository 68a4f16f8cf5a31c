//! # ミドルウェア
//!
//! - `request_id`: 受信した Request ID を下流サービス呼び出しに引き継ぐ
//! - `security`: アクセスルールチェーンによる Basic 認証

pub mod request_id;
pub mod security;

pub use security::{ArticlesAccess, BasicCredentials, SecurityState, access_rules, authorize};
