//! 点击事件与计数的持久化
//!
//! 一次点击 = 一条事件记录 + 计数器 upsert，两步在同一个事务里完成，
//! 计数永远等于事件条数。

use chrono::{DateTime, Utc};
use sea_orm::sea_query::{CaseStatement, Expr, OnConflict};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, ExprTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use tracing::debug;

use crate::errors::{HandbookError, Result};
use crate::utils::clip;
use migration::entities::{
    PolicyCardClickCountEntity, PolicyCardClickEntity, policy_card_click, policy_card_click_count,
};

pub const TITLE_MAX_CHARS: usize = 255;
pub const IP_MAX_CHARS: usize = 45;
pub const USER_AGENT_MAX_CHARS: usize = 500;

/// 没有标题时写入的占位
pub const UNKNOWN_TITLE: &str = "Unknown";

/// 待写入的一次点击
#[derive(Debug, Clone)]
pub struct NewClick {
    pub policy_id: i32,
    pub policy_title: Option<String>,
    pub clicked_at: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

pub type ClickCounter = policy_card_click_count::Model;
pub type ClickEvent = policy_card_click::Model;

#[derive(Clone)]
pub struct ClickStore {
    db: Option<DatabaseConnection>,
}

impl ClickStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db: Some(db) }
    }

    /// 数据库不可用时使用，所有操作返回 `TrackingUnavailable`
    pub fn unavailable() -> Self {
        Self { db: None }
    }

    pub fn is_available(&self) -> bool {
        self.db.is_some()
    }

    fn db(&self) -> Result<&DatabaseConnection> {
        self.db
            .as_ref()
            .ok_or_else(|| HandbookError::tracking_unavailable("Click tracking database is not connected"))
    }

    /// 写入事件并更新计数器
    pub async fn record_click(&self, click: NewClick) -> Result<()> {
        let db = self.db()?;

        let title = click
            .policy_title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| clip(t, TITLE_MAX_CHARS));
        let stored_title = title.clone().unwrap_or_else(|| UNKNOWN_TITLE.to_string());
        let now = click.clicked_at;

        let event = policy_card_click::ActiveModel {
            policy_id: Set(click.policy_id),
            policy_title: Set(stored_title.clone()),
            clicked_at: Set(now),
            ip_address: Set(click.ip_address.as_deref().map(|ip| clip(ip, IP_MAX_CHARS))),
            user_agent: Set(click
                .user_agent
                .as_deref()
                .map(|ua| clip(ua, USER_AGENT_MAX_CHARS))),
            ..Default::default()
        };

        let counter = policy_card_click_count::ActiveModel {
            policy_id: Set(click.policy_id),
            policy_title: Set(stored_title),
            click_count: Set(1),
            first_clicked: Set(now),
            last_clicked: Set(now),
        };

        let count_col = Expr::col((
            PolicyCardClickCountEntity,
            policy_card_click_count::Column::ClickCount,
        ));
        let last_col = Expr::col((
            PolicyCardClickCountEntity,
            policy_card_click_count::Column::LastClicked,
        ));

        // last_clicked 只前进不后退
        let last_clicked = CaseStatement::new()
            .case(last_col.clone().lt(Expr::val(now)), Expr::val(now))
            .finally(last_col);

        let mut on_conflict = OnConflict::column(policy_card_click_count::Column::PolicyId);
        on_conflict
            .value(
                policy_card_click_count::Column::ClickCount,
                count_col.add(Expr::val(1)),
            )
            .value(policy_card_click_count::Column::LastClicked, last_clicked);
        if title.is_some() {
            on_conflict.update_column(policy_card_click_count::Column::PolicyTitle);
        }

        let txn = db.begin().await?;
        PolicyCardClickEntity::insert(event)
            .exec_without_returning(&txn)
            .await?;
        PolicyCardClickCountEntity::insert(counter)
            .on_conflict(on_conflict.to_owned())
            .exec_without_returning(&txn)
            .await?;
        txn.commit().await?;

        debug!("Recorded click for policy {}", click.policy_id);
        Ok(())
    }

    /// 全部计数器，按点击数降序，再按 policy_id 升序
    pub async fn click_counts(&self) -> Result<Vec<ClickCounter>> {
        let db = self.db()?;
        let counters = PolicyCardClickCountEntity::find()
            .order_by_desc(policy_card_click_count::Column::ClickCount)
            .order_by_asc(policy_card_click_count::Column::PolicyId)
            .all(db)
            .await?;
        Ok(counters)
    }

    /// 单个 policy 的点击记录，按写入顺序
    pub async fn events_for(&self, policy_id: i32) -> Result<Vec<ClickEvent>> {
        let db = self.db()?;
        let events = PolicyCardClickEntity::find()
            .filter(policy_card_click::Column::PolicyId.eq(policy_id))
            .order_by_asc(policy_card_click::Column::Id)
            .all(db)
            .await?;
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn click(policy_id: i32) -> NewClick {
        NewClick {
            policy_id,
            policy_title: None,
            clicked_at: Utc::now(),
            ip_address: None,
            user_agent: None,
        }
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_every_operation() {
        let store = ClickStore::unavailable();
        assert!(!store.is_available());
        assert!(matches!(
            store.record_click(click(1)).await,
            Err(HandbookError::TrackingUnavailable(_))
        ));
        assert!(matches!(
            store.click_counts().await,
            Err(HandbookError::TrackingUnavailable(_))
        ));
        assert!(matches!(
            store.events_for(1).await,
            Err(HandbookError::TrackingUnavailable(_))
        ));
    }
}
