//! # ミドルウェア
//!
//! - `bearer_auth`: アクセスルールチェーンによる Bearer トークン認可

pub mod bearer_auth;

pub use bearer_auth::{BearerAuthState, authorize};
