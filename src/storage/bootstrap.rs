//! 启动时的 schema bootstrap
//!
//! 每个进程启动时执行一次，在 HTTP 监听之前。失败只记录日志，
//! 服务进入 `DegradedNoTracking`：搜索和导出照常工作，点击追踪按请求失败。

use std::sync::atomic::{AtomicU8, Ordering};

use migration::{SchemaManager, ensure_tracking_tables};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use strum::{Display, FromRepr};
use tracing::{error, info};

/// Schema 状态：`NotChecked → Checking → Ready | DegradedNoTracking`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, FromRepr, Serialize)]
#[repr(u8)]
pub enum SchemaState {
    NotChecked = 0,
    Checking = 1,
    Ready = 2,
    DegradedNoTracking = 3,
}

impl SchemaState {
    pub fn is_ready(self) -> bool {
        self == SchemaState::Ready
    }
}

/// 一次 bootstrap 的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapReport {
    pub state: SchemaState,
    /// 本次新建的表
    pub created: Vec<&'static str>,
}

pub struct SchemaBootstrap {
    state: AtomicU8,
}

impl Default for SchemaBootstrap {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaBootstrap {
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(SchemaState::NotChecked as u8),
        }
    }

    pub fn state(&self) -> SchemaState {
        SchemaState::from_repr(self.state.load(Ordering::Acquire))
            .unwrap_or(SchemaState::NotChecked)
    }

    fn set_state(&self, state: SchemaState) {
        self.state.store(state as u8, Ordering::Release);
    }

    /// 确保两张追踪表存在；`db` 为 `None` 表示数据库不可用
    ///
    /// 永不返回错误，失败体现在返回的状态里。
    pub async fn run(&self, db: Option<&DatabaseConnection>) -> BootstrapReport {
        self.set_state(SchemaState::Checking);

        let Some(db) = db else {
            error!("Click tracking database unavailable, skipping schema bootstrap");
            return self.finish(SchemaState::DegradedNoTracking, Vec::new());
        };

        let manager = SchemaManager::new(db);
        match ensure_tracking_tables(&manager).await {
            Ok(created) => {
                if created.is_empty() {
                    info!("Click tracking tables already present");
                }
                for table in &created {
                    info!("Created click tracking table {}", table);
                }
                self.finish(SchemaState::Ready, created)
            }
            Err(e) => {
                error!("Schema bootstrap failed, click tracking disabled: {}", e);
                self.finish(SchemaState::DegradedNoTracking, Vec::new())
            }
        }
    }

    fn finish(&self, state: SchemaState, created: Vec<&'static str>) -> BootstrapReport {
        self.set_state(state);
        BootstrapReport { state, created }
    }
}
