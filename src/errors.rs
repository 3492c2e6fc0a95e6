use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum HandbookError {
    Validation(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    ContentLoad(String),
    Serialization(String),
    FileOperation(String),
    TrackingUnavailable(String),
}

impl HandbookError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            HandbookError::Validation(_) => "E001",
            HandbookError::DatabaseConfig(_) => "E002",
            HandbookError::DatabaseConnection(_) => "E003",
            HandbookError::DatabaseOperation(_) => "E004",
            HandbookError::ContentLoad(_) => "E005",
            HandbookError::Serialization(_) => "E006",
            HandbookError::FileOperation(_) => "E007",
            HandbookError::TrackingUnavailable(_) => "E008",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            HandbookError::Validation(_) => "Validation Error",
            HandbookError::DatabaseConfig(_) => "Database Configuration Error",
            HandbookError::DatabaseConnection(_) => "Database Connection Error",
            HandbookError::DatabaseOperation(_) => "Database Operation Error",
            HandbookError::ContentLoad(_) => "Content Load Error",
            HandbookError::Serialization(_) => "Serialization Error",
            HandbookError::FileOperation(_) => "File Operation Error",
            HandbookError::TrackingUnavailable(_) => "Click Tracking Unavailable",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            HandbookError::Validation(msg)
            | HandbookError::DatabaseConfig(msg)
            | HandbookError::DatabaseConnection(msg)
            | HandbookError::DatabaseOperation(msg)
            | HandbookError::ContentLoad(msg)
            | HandbookError::Serialization(msg)
            | HandbookError::FileOperation(msg)
            | HandbookError::TrackingUnavailable(msg) => msg,
        }
    }

    /// HTTP 状态码映射：只有校验错误属于客户端错误
    pub fn http_status(&self) -> StatusCode {
        match self {
            HandbookError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.http_status().is_client_error()
    }

    /// 格式化为彩色输出（用于终端）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for HandbookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for HandbookError {}

// 便捷的构造函数
impl HandbookError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        HandbookError::Validation(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        HandbookError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        HandbookError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        HandbookError::DatabaseOperation(msg.into())
    }

    pub fn content_load<T: Into<String>>(msg: T) -> Self {
        HandbookError::ContentLoad(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        HandbookError::Serialization(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        HandbookError::FileOperation(msg.into())
    }

    pub fn tracking_unavailable<T: Into<String>>(msg: T) -> Self {
        HandbookError::TrackingUnavailable(msg.into())
    }
}

impl From<sea_orm::DbErr> for HandbookError {
    fn from(err: sea_orm::DbErr) -> Self {
        HandbookError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for HandbookError {
    fn from(err: std::io::Error) -> Self {
        HandbookError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for HandbookError {
    fn from(err: serde_json::Error) -> Self {
        HandbookError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for HandbookError {
    fn from(err: csv::Error) -> Self {
        HandbookError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HandbookError>;
