use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use strum::{AsRefStr, Display};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::errors::{HandbookError, Result};

/// 数据库类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum BackendKind {
    Sqlite,
    Mysql,
    Postgres,
}

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<BackendKind> {
    if database_url.starts_with("sqlite://")
        || database_url.starts_with("sqlite:")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
    {
        Ok(BackendKind::Sqlite)
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok(BackendKind::Mysql)
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok(BackendKind::Postgres)
    } else {
        Err(HandbookError::database_config(format!(
            "Cannot infer database type from URL: {}. Supported: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// 按配置连接点击追踪数据库
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection> {
    let database_url = config.database_url.trim();
    if database_url.is_empty() {
        return Err(HandbookError::database_config("database_url is not set"));
    }

    let backend = infer_backend_from_url(database_url)?;
    let db = match backend {
        BackendKind::Sqlite => connect_sqlite(database_url, config.timeout).await?,
        BackendKind::Mysql | BackendKind::Postgres => {
            // mariadb:// 走 MySQL 驱动
            let url = database_url.replacen("mariadb://", "mysql://", 1);
            connect_generic(&url, backend, config).await?
        }
    };

    info!("Connected to {} click tracking database", backend.as_ref().to_uppercase());
    Ok(db)
}

/// 连接 SQLite 数据库（带自动创建和 WAL）
pub async fn connect_sqlite(database_url: &str, busy_timeout_secs: u64) -> Result<DatabaseConnection> {
    use sea_orm::SqlxSqliteConnector;
    use sea_orm::sqlx::SqlitePool;
    use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteSynchronous};
    use std::str::FromStr;

    // 裸文件路径（handbook.db）补上 scheme
    let url = if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite://{}", database_url)
    };

    let opt = SqliteConnectOptions::from_str(&url)
        .map_err(|e| HandbookError::database_config(format!("Invalid SQLite URL: {}", e)))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_secs(busy_timeout_secs.max(1)));

    let pool = SqlitePool::connect_with(opt).await.map_err(|e| {
        HandbookError::database_connection(format!("Cannot connect to SQLite database: {}", e))
    })?;

    Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
}

/// 连接 MySQL / PostgreSQL
pub async fn connect_generic(
    database_url: &str,
    backend: BackendKind,
    config: &DatabaseConfig,
) -> Result<DatabaseConnection> {
    let pool_size = config.pool_size.max(1);
    let timeout = Duration::from_secs(config.timeout.max(1));

    let mut opt = ConnectOptions::new(database_url.to_owned());
    opt.max_connections(pool_size)
        .min_connections(pool_size.min(2))
        .connect_timeout(timeout)
        .acquire_timeout(timeout)
        .idle_timeout(Duration::from_secs(300))
        .sqlx_logging(false);

    Database::connect(opt).await.map_err(|e| {
        HandbookError::database_connection(format!(
            "Cannot connect to {} database: {}",
            backend.as_ref().to_uppercase(),
            e
        ))
    })
}
