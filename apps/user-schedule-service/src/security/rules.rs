//! アクセスルール
//!
//! | ルール | 条件 |
//! |--------|------|
//! | `/health/**` | 認証不要 |
//! | `GET /user-schedule/schedule/**` | `SCOPE_<resourceServerId>/schedule.read` |
//! | `PUT /user-schedule/schedule/**` | `SCOPE_<resourceServerId>/schedule.update` |
//! | それ以外 | 有効なトークン |

use axum::http::Method;
use service_common::access_rule::AccessRules;

use super::scope::SecurityScope;

/// User Schedule Service のアクセス条件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleAccess {
    /// 認証不要
    PermitAll,
    /// 有効なトークンが必要
    Authenticated,
    /// 指定の権限を持つトークンが必要
    Authority(String),
}

/// User Schedule Service のアクセスルール
pub fn access_rules(resource_server_id: &str) -> AccessRules<ScheduleAccess> {
    AccessRules::new(ScheduleAccess::Authenticated)
        .any_method("/health/**", ScheduleAccess::PermitAll)
        .route(
            Method::GET,
            "/user-schedule/schedule/**",
            ScheduleAccess::Authority(SecurityScope::ScheduleRead.authority(resource_server_id)),
        )
        .route(
            Method::PUT,
            "/user-schedule/schedule/**",
            ScheduleAccess::Authority(SecurityScope::ScheduleUpdate.authority(resource_server_id)),
        )
}
