//! 点击追踪表迁移
//!
//! 与启动时的 schema bootstrap 共用 `schema` 中的定义，
//! 已存在的表会被跳过。

use sea_orm_migration::prelude::*;

use crate::schema::{CLICK_COUNTS_TABLE, CLICKS_TABLE, ensure_tracking_tables};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        ensure_tracking_tables(manager).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new(CLICK_COUNTS_TABLE)).if_exists().to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Alias::new(CLICKS_TABLE)).if_exists().to_owned())
            .await
    }
}
