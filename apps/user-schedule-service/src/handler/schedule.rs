//! # スケジュールハンドラ
//!
//! - `GET /user-schedule/schedule?userName=X` — ユーザーの空き状況
//! - `PUT /user-schedule/schedule/{id}` — スケジュールの更新
//!
//! 永続化は行わず、固定の文言を返す。

use axum::extract::{Path, Query, rejection::QueryRejection};

use crate::error::ScheduleError;

/// 空き状況を問い合わせるユーザー名のパラメータ
const USER_NAME_PARAM: &str = "userName";

/// スケジュール取得のクエリパラメータ
///
/// `userName` が複数指定された場合はカンマで連結する（`?userName=a&userName=b` → `"a,b"`）。
#[derive(Debug, PartialEq, Eq)]
pub struct ScheduleQuery {
    pub user_name: Option<String>,
}

impl ScheduleQuery {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let values: Vec<String> = pairs
            .into_iter()
            .filter(|(key, _)| key == USER_NAME_PARAM)
            .map(|(_, value)| value)
            .collect();

        Self {
            user_name: (!values.is_empty()).then(|| values.join(",")),
        }
    }
}

/// ユーザーの空き状況を返す
///
/// `userName` が空文字の場合もそのまま受け付ける。
pub async fn get_user_schedule(
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<String, ScheduleError> {
    let Query(pairs) = query.map_err(|e| ScheduleError::InvalidQuery(e.body_text()))?;
    let user_name = ScheduleQuery::from_pairs(pairs)
        .user_name
        .ok_or(ScheduleError::MissingParameter(USER_NAME_PARAM))?;

    Ok(format!("{user_name} is available!"))
}

/// スケジュールを更新する
pub async fn update_schedule(Path(id): Path<String>) -> String {
    tracing::info!(schedule_id = %id, "スケジュールを更新しました");
    format!("{id} has been updated!")
}
