//! Service layer
//!
//! Business logic shared by the HTTP handlers and the CLI commands.

mod click_tracking;
mod export;
mod search;

pub use click_tracking::*;
pub use export::*;
pub use search::*;

/// TypeScript 类型输出文件（相对 `TS_RS_EXPORT_DIR`），供浏览器端组件使用
pub const TS_EXPORT_PATH: &str = "handbook.generated.ts";
