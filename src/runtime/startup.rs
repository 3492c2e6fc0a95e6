use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use sea_orm::DatabaseConnection;
use tracing::{debug, error, info, warn};

use crate::config::StaticConfig;
use crate::content::{ContentSource, JsonFileContentSource};
use crate::services::{ClickTrackingService, ExportService, SearchService};
use crate::storage::{self, ClickStore, SchemaBootstrap};

pub struct StartupContext {
    /// `None` 表示点击追踪数据库不可用
    pub db: Option<DatabaseConnection>,
    pub bootstrap: Arc<SchemaBootstrap>,
    pub content: Arc<JsonFileContentSource>,
    pub click_tracking: Arc<ClickTrackingService>,
    pub search: Arc<SearchService>,
    pub export: Arc<ExportService>,
}

/// 连接点击追踪数据库；失败只记录日志，服务继续以降级模式运行
pub async fn open_tracking_database(config: &StaticConfig) -> Option<DatabaseConnection> {
    match storage::connect(&config.database).await {
        Ok(db) => Some(db),
        Err(e) => {
            error!("{}", e.format_simple());
            warn!("Click tracking disabled: search and export keep serving");
            None
        }
    }
}

/// 准备服务器启动的上下文
///
/// 顺序：数据库 → schema bootstrap（仅此一次，在监听之前）→ 内容快照 → 服务
pub async fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = Instant::now();
    debug!("Starting pre-startup processing...");

    let db = open_tracking_database(config).await;

    let bootstrap = Arc::new(SchemaBootstrap::new());
    let report = bootstrap.run(db.as_ref()).await;
    info!("Schema state: {}", report.state);

    let click_store = match &db {
        Some(db) => ClickStore::new(db.clone()),
        None => ClickStore::unavailable(),
    };

    let content = Arc::new(JsonFileContentSource::open(&config.content.snapshot_path).await);
    let source: Arc<dyn ContentSource> = content.clone();

    let context = StartupContext {
        db,
        bootstrap,
        content,
        click_tracking: Arc::new(ClickTrackingService::new(click_store)),
        search: Arc::new(SearchService::new(source.clone())),
        export: Arc::new(ExportService::new(source)),
    };

    info!(
        "Pre-startup completed in {} ms",
        start_time.elapsed().as_millis()
    );
    Ok(context)
}
