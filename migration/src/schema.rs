//! 点击追踪表结构定义
//!
//! 表与索引的定义集中在这里，启动时的 schema bootstrap 和
//! `Migrator` 共用同一套定义：
//! - `policy_card_clicks`：逐条点击记录
//! - `policy_card_click_counts`：按 policy_id 聚合的点击计数

use sea_orm_migration::prelude::*;

/// 一张追踪表及其配套索引
pub struct TrackingTable {
    pub name: &'static str,
    pub create: TableCreateStatement,
    pub indexes: Vec<TrackingIndex>,
}

pub struct TrackingIndex {
    pub name: &'static str,
    pub create: IndexCreateStatement,
}

fn index(name: &'static str, create: &mut IndexCreateStatement) -> TrackingIndex {
    TrackingIndex {
        name,
        create: create.name(name).to_owned(),
    }
}

pub const CLICKS_TABLE: &str = "policy_card_clicks";
pub const CLICK_COUNTS_TABLE: &str = "policy_card_click_counts";

/// 按创建顺序返回全部追踪表
pub fn tracking_tables() -> Vec<TrackingTable> {
    vec![clicks_table(), click_counts_table()]
}

fn clicks_table() -> TrackingTable {
    let create = Table::create()
        .table(PolicyCardClicks::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(PolicyCardClicks::Id)
                .big_integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(
            ColumnDef::new(PolicyCardClicks::PolicyId)
                .integer()
                .not_null(),
        )
        .col(
            ColumnDef::new(PolicyCardClicks::PolicyTitle)
                .string_len(255)
                .not_null(),
        )
        .col(
            ColumnDef::new(PolicyCardClicks::ClickedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(PolicyCardClicks::IpAddress)
                .string_len(45)
                .null(),
        )
        .col(
            ColumnDef::new(PolicyCardClicks::UserAgent)
                .string_len(500)
                .null(),
        )
        .to_owned();

    let indexes = vec![
        // 单个 policy 的点击查询
        index(
            "idx_policy_card_clicks_policy_id",
            Index::create()
                .table(PolicyCardClicks::Table)
                .col(PolicyCardClicks::PolicyId),
        ),
        // 时间范围查询
        index(
            "idx_policy_card_clicks_clicked_at",
            Index::create()
                .table(PolicyCardClicks::Table)
                .col(PolicyCardClicks::ClickedAt),
        ),
    ];

    TrackingTable {
        name: CLICKS_TABLE,
        create,
        indexes,
    }
}

fn click_counts_table() -> TrackingTable {
    let create = Table::create()
        .table(PolicyCardClickCounts::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(PolicyCardClickCounts::PolicyId)
                .integer()
                .not_null()
                .primary_key(),
        )
        .col(
            ColumnDef::new(PolicyCardClickCounts::PolicyTitle)
                .string_len(255)
                .not_null(),
        )
        .col(
            ColumnDef::new(PolicyCardClickCounts::ClickCount)
                .integer()
                .not_null()
                .default(0),
        )
        .col(
            ColumnDef::new(PolicyCardClickCounts::FirstClicked)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(PolicyCardClickCounts::LastClicked)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .to_owned();

    // 按热度排序
    let indexes = vec![
        index(
            "idx_policy_card_click_counts_click_count",
            Index::create()
                .table(PolicyCardClickCounts::Table)
                .col((PolicyCardClickCounts::ClickCount, IndexOrder::Desc)),
        ),
    ];

    TrackingTable {
        name: CLICK_COUNTS_TABLE,
        create,
        indexes,
    }
}

/// 创建缺失的追踪表，返回本次实际创建的表名
///
/// 表和索引的存在性都通过 `SchemaManager` 查询数据库目录判断，
/// 已存在的不会重复创建，可在每次启动时重复调用。
/// 索引对每张表单独检查，上次建表后建索引失败的情况会在下次补上。
pub async fn ensure_tracking_tables(manager: &SchemaManager<'_>) -> Result<Vec<&'static str>, DbErr> {
    let mut created = Vec::new();

    for table in tracking_tables() {
        if !manager.has_table(table.name).await? {
            manager.create_table(table.create).await?;
            created.push(table.name);
        }

        // MySQL 不支持 CREATE INDEX IF NOT EXISTS，先查目录
        for index in table.indexes {
            if !manager.has_index(table.name, index.name).await? {
                manager.create_index(index.create).await?;
            }
        }
    }

    Ok(created)
}

#[derive(DeriveIden)]
pub enum PolicyCardClicks {
    #[sea_orm(iden = "policy_card_clicks")]
    Table,
    Id,
    PolicyId,
    PolicyTitle,
    ClickedAt,
    IpAddress,
    UserAgent,
}

#[derive(DeriveIden)]
pub enum PolicyCardClickCounts {
    #[sea_orm(iden = "policy_card_click_counts")]
    Table,
    PolicyId,
    PolicyTitle,
    ClickCount,
    FirstClicked,
    LastClicked,
}
