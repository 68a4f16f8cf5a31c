//! # 記事ハンドラ
//!
//! 記事の投稿とユーザーの空き状況確認を受け付け、User Schedule Service に委譲する。
//! 記事の永続化は行わない。

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};

use crate::{client::UserScheduleClient, error::ArticlesError};

/// 記事ハンドラの State
pub struct ArticleState {
    pub user_schedule_client: Arc<dyn UserScheduleClient>,
}

/// 応答メッセージで `userId` がない場合の表記
const MISSING_USER_ID: &str = "null";

/// 記事の投稿リクエスト
///
/// `body` と `userId` は省略できる。`scheduleId` は更新先の特定に使うため必須。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(default)]
    pub body:        String,
    pub schedule_id: String,
    #[serde(default)]
    pub user_id:     Option<String>,
}

impl Article {
    /// 応答メッセージに載せる投稿者
    pub fn author(&self) -> &str {
        self.user_id.as_deref().unwrap_or(MISSING_USER_ID)
    }
}

/// GET /articles/user-availability/{name}
///
/// User Schedule Service のスケジュール取得結果をそのまま返す。
#[tracing::instrument(skip_all, fields(user_name = %name))]
pub async fn get_user_availability(
    State(state): State<Arc<ArticleState>>,
    Path(name): Path<String>,
) -> Result<String, ArticlesError> {
    let availability = state.user_schedule_client.get_user_schedule(&name).await?;

    tracing::debug!("空き状況を取得しました");
    Ok(availability)
}

/// POST /articles
///
/// 記事に紐づくスケジュールを更新し、その結果を含むメッセージを返す。
/// 解釈できないボディは Problem Details で拒否する。
pub async fn post_article(
    State(state): State<Arc<ArticleState>>,
    payload: Result<Json<Article>, JsonRejection>,
) -> Result<String, ArticlesError> {
    let Json(article) = payload?;
    publish_article(&state, article).await
}

#[tracing::instrument(skip_all, fields(user_id = article.author(), schedule_id = %article.schedule_id))]
async fn publish_article(state: &ArticleState, article: Article) -> Result<String, ArticlesError> {
    let schedule_update = state
        .user_schedule_client
        .update_user_schedule(&article.schedule_id)
        .await?;

    tracing::info!("記事を受け付けました");
    Ok(format!(
        "Article from userId:{} has been posted! Schedule update: {}",
        article.author(),
        schedule_update
    ))
}
