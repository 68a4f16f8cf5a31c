//! # HTTP ハンドラ
//!
//! - `article`: 記事の投稿、ユーザーの空き状況確認
//! - `health`: Liveness / Readiness Check

pub mod article;
pub mod health;

pub use article::{Article, ArticleState, get_user_availability, post_article};
pub use health::{ReadinessState, health_check, readiness_check};
