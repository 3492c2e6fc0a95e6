//! Click tracking tests
//!
//! RecordClick / GetClickCounts against temporary SQLite databases.

use chrono::{DateTime, TimeZone, Utc};
use migration::{Index, Migrator, MigratorTrait, SchemaManager};
use sea_orm::DatabaseConnection;
use tempfile::TempDir;

use policy_handbook::errors::HandbookError;
use policy_handbook::services::{ClickContext, ClickTrackingService, ValidClick};
use policy_handbook::storage::{ClickStore, SchemaBootstrap, SchemaState, connect_sqlite};

/// 创建临时 SQLite 数据库（未建表）
async fn create_temp_db() -> (DatabaseConnection, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("clicks.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let db = connect_sqlite(&db_url, 5)
        .await
        .expect("Failed to connect to SQLite");
    (db, temp_dir)
}

/// 建表后返回点击服务
async fn create_service() -> (ClickTrackingService, TempDir) {
    let (db, dir) = create_temp_db().await;
    let report = SchemaBootstrap::new().run(Some(&db)).await;
    assert_eq!(report.state, SchemaState::Ready);
    (ClickTrackingService::new(ClickStore::new(db)), dir)
}

fn at(hour: u32, min: u32, sec: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, hour, min, sec).unwrap()
}

fn valid(policy_id: i32, title: Option<&str>) -> ValidClick {
    ValidClick {
        policy_id,
        policy_title: title.map(String::from),
    }
}

// =============================================================================
// Schema bootstrap
// =============================================================================

#[tokio::test]
async fn test_bootstrap_creates_both_tables_once() {
    let (db, _dir) = create_temp_db().await;

    let first = SchemaBootstrap::new().run(Some(&db)).await;
    assert_eq!(first.state, SchemaState::Ready);
    assert_eq!(
        first.created,
        vec!["policy_card_clicks", "policy_card_click_counts"]
    );

    let second = SchemaBootstrap::new().run(Some(&db)).await;
    assert_eq!(second.state, SchemaState::Ready);
    assert!(second.created.is_empty());
}

#[tokio::test]
async fn test_bootstrap_after_migrator_creates_nothing() {
    let (db, _dir) = create_temp_db().await;
    Migrator::up(&db, None).await.expect("Failed to run migrations");

    let report = SchemaBootstrap::new().run(Some(&db)).await;
    assert_eq!(report.state, SchemaState::Ready);
    assert!(report.created.is_empty());
}

#[tokio::test]
async fn test_bootstrap_restores_missing_index() {
    let (db, _dir) = create_temp_db().await;
    SchemaBootstrap::new().run(Some(&db)).await;

    let manager = SchemaManager::new(&db);
    manager
        .drop_index(
            Index::drop()
                .name("idx_policy_card_clicks_clicked_at")
                .table(migration::schema::PolicyCardClicks::Table)
                .to_owned(),
        )
        .await
        .expect("Failed to drop index");
    assert!(
        !manager
            .has_index("policy_card_clicks", "idx_policy_card_clicks_clicked_at")
            .await
            .unwrap()
    );

    // 表已存在，只补索引
    let report = SchemaBootstrap::new().run(Some(&db)).await;
    assert_eq!(report.state, SchemaState::Ready);
    assert!(report.created.is_empty());
    assert!(
        manager
            .has_index("policy_card_clicks", "idx_policy_card_clicks_clicked_at")
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_bootstrap_without_database_is_degraded() {
    let bootstrap = SchemaBootstrap::new();
    assert_eq!(bootstrap.state(), SchemaState::NotChecked);

    let report = bootstrap.run(None).await;
    assert_eq!(report.state, SchemaState::DegradedNoTracking);
    assert_eq!(bootstrap.state(), SchemaState::DegradedNoTracking);
}

// =============================================================================
// RecordClick
// =============================================================================

#[tokio::test]
async fn test_repeated_clicks_accumulate() {
    let (service, _dir) = create_service().await;

    for (i, ts) in [at(9, 0, 0), at(9, 5, 0), at(9, 10, 0)].into_iter().enumerate() {
        service
            .record(
                valid(42, Some("Leave Policy")),
                ClickContext {
                    ip_address: Some(format!("10.0.0.{}", i + 1)),
                    user_agent: Some("test-agent".into()),
                },
                ts,
            )
            .await
            .unwrap();
    }

    let counts = service.click_counts().await.unwrap();
    assert_eq!(counts.len(), 1);
    assert_eq!(counts[0].policy_id, 42);
    assert_eq!(counts[0].policy_title, "Leave Policy");
    assert_eq!(counts[0].click_count, 3);
    assert_eq!(counts[0].first_clicked, at(9, 0, 0));
    assert_eq!(counts[0].last_clicked, at(9, 10, 0));

    let events = service.store().events_for(42).await.unwrap();
    assert_eq!(events.len(), 3);
    assert_eq!(events[0].ip_address.as_deref(), Some("10.0.0.1"));
    assert_eq!(events[2].user_agent.as_deref(), Some("test-agent"));
}

#[tokio::test]
async fn test_omitted_title_keeps_existing_title() {
    let (service, _dir) = create_service().await;

    service
        .record(valid(7, Some("Remote Work")), ClickContext::default(), at(8, 0, 0))
        .await
        .unwrap();
    service
        .record(valid(7, None), ClickContext::default(), at(8, 1, 0))
        .await
        .unwrap();
    service
        .record(valid(7, Some("   ")), ClickContext::default(), at(8, 2, 0))
        .await
        .unwrap();

    let counts = service.click_counts().await.unwrap();
    assert_eq!(counts[0].click_count, 3);
    assert_eq!(counts[0].policy_title, "Remote Work");

    let events = service.store().events_for(7).await.unwrap();
    let titles: Vec<_> = events.iter().map(|e| e.policy_title.as_str()).collect();
    assert_eq!(titles, vec!["Remote Work", "Unknown", "Unknown"]);
}

#[tokio::test]
async fn test_new_title_replaces_old_title() {
    let (service, _dir) = create_service().await;

    service
        .record(valid(3, Some("Old Name")), ClickContext::default(), at(8, 0, 0))
        .await
        .unwrap();
    service
        .record(valid(3, Some("New Name")), ClickContext::default(), at(8, 1, 0))
        .await
        .unwrap();

    let counts = service.click_counts().await.unwrap();
    assert_eq!(counts[0].policy_title, "New Name");
}

#[tokio::test]
async fn test_first_click_without_title_is_unknown() {
    let (service, _dir) = create_service().await;

    service
        .record(valid(11, None), ClickContext::default(), at(8, 0, 0))
        .await
        .unwrap();

    let counts = service.click_counts().await.unwrap();
    assert_eq!(counts[0].policy_title, "Unknown");
}

#[tokio::test]
async fn test_last_clicked_never_moves_backwards() {
    let (service, _dir) = create_service().await;

    service
        .record(valid(5, Some("A")), ClickContext::default(), at(12, 0, 0))
        .await
        .unwrap();
    service
        .record(valid(5, Some("A")), ClickContext::default(), at(11, 0, 0))
        .await
        .unwrap();

    let counts = service.click_counts().await.unwrap();
    assert_eq!(counts[0].click_count, 2);
    assert_eq!(counts[0].first_clicked, at(12, 0, 0));
    assert_eq!(counts[0].last_clicked, at(12, 0, 0));
}

#[tokio::test]
async fn test_invalid_policy_id_writes_nothing() {
    let (service, _dir) = create_service().await;

    for body in [r#"{"policyId":0}"#, r#"{"policyId":-4}"#, r#"{"policyTitle":"x"}"#] {
        let err = service
            .record_click(body.as_bytes(), ClickContext::default())
            .await
            .unwrap_err();
        assert!(matches!(err, HandbookError::Validation(_)));
        assert_eq!(err.message(), "Invalid policy ID");
    }

    assert!(service.click_counts().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_record_click_from_raw_body() {
    let (service, _dir) = create_service().await;

    let click = service
        .record_click(
            br#"{"policyId":1234,"policyTitle":"Travel Expenses"}"#,
            ClickContext::default(),
        )
        .await
        .unwrap();
    assert_eq!(click.policy_id, 1234);

    let counts = service.click_counts().await.unwrap();
    assert_eq!(counts[0].policy_title, "Travel Expenses");
    assert_eq!(counts[0].first_clicked, counts[0].last_clicked);
}

#[tokio::test]
async fn test_long_values_are_clipped() {
    let (service, _dir) = create_service().await;

    let title = "t".repeat(300);
    service
        .record(
            valid(9, Some(&title)),
            ClickContext {
                ip_address: Some("9".repeat(60)),
                user_agent: Some("u".repeat(600)),
            },
            at(10, 0, 0),
        )
        .await
        .unwrap();

    let event = &service.store().events_for(9).await.unwrap()[0];
    assert_eq!(event.policy_title.chars().count(), 255);
    assert_eq!(event.ip_address.as_ref().unwrap().len(), 45);
    assert_eq!(event.user_agent.as_ref().unwrap().len(), 500);
}

// =============================================================================
// GetClickCounts
// =============================================================================

#[tokio::test]
async fn test_click_counts_sorted_by_count_desc() {
    let (service, _dir) = create_service().await;

    let clicks = [(1, 1), (2, 3), (3, 2), (4, 3)];
    for (policy_id, n) in clicks {
        for m in 0..n {
            service
                .record(
                    valid(policy_id, Some("P")),
                    ClickContext::default(),
                    at(9, m, 0),
                )
                .await
                .unwrap();
        }
    }

    let counts = service.click_counts().await.unwrap();
    let order: Vec<_> = counts.iter().map(|c| (c.policy_id, c.click_count)).collect();
    assert_eq!(order, vec![(2, 3), (4, 3), (3, 2), (1, 1)]);
}

#[tokio::test]
async fn test_click_counts_empty_store() {
    let (service, _dir) = create_service().await;
    assert!(service.click_counts().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unavailable_store_reports_error() {
    let service = ClickTrackingService::new(ClickStore::unavailable());

    let err = service
        .record_click(br#"{"policyId":1}"#, ClickContext::default())
        .await
        .unwrap_err();
    assert!(matches!(err, HandbookError::TrackingUnavailable(_)));
    assert!(service.click_counts().await.is_err());
}
