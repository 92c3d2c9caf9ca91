use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SluglinkError {
    Validation(String),
    NotFound(String),
    Conflict(String),
    Store(String),
    Serialization(String),
    Config(String),
    Forbidden(String),
    Unauthorized(String),
}

impl SluglinkError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            SluglinkError::Validation(_) => "E001",
            SluglinkError::NotFound(_) => "E002",
            SluglinkError::Conflict(_) => "E003",
            SluglinkError::Store(_) => "E004",
            SluglinkError::Serialization(_) => "E005",
            SluglinkError::Config(_) => "E006",
            SluglinkError::Forbidden(_) => "E007",
            SluglinkError::Unauthorized(_) => "E008",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            SluglinkError::Validation(_) => "Validation Error",
            SluglinkError::NotFound(_) => "Resource Not Found",
            SluglinkError::Conflict(_) => "Slug Conflict",
            SluglinkError::Store(_) => "Store Operation Error",
            SluglinkError::Serialization(_) => "Serialization Error",
            SluglinkError::Config(_) => "Configuration Error",
            SluglinkError::Forbidden(_) => "Forbidden",
            SluglinkError::Unauthorized(_) => "Unauthorized",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            SluglinkError::Validation(msg) => msg,
            SluglinkError::NotFound(msg) => msg,
            SluglinkError::Conflict(msg) => msg,
            SluglinkError::Store(msg) => msg,
            SluglinkError::Serialization(msg) => msg,
            SluglinkError::Config(msg) => msg,
            SluglinkError::Forbidden(msg) => msg,
            SluglinkError::Unauthorized(msg) => msg,
        }
    }

    /// Only adapter I/O failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SluglinkError::Store(_))
    }

    /// HTTP status used by the API boundary
    #[cfg(feature = "server")]
    pub fn http_status(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;
        match self {
            SluglinkError::Validation(_) => StatusCode::BAD_REQUEST,
            SluglinkError::NotFound(_) => StatusCode::NOT_FOUND,
            SluglinkError::Conflict(_) => StatusCode::CONFLICT,
            SluglinkError::Forbidden(_) => StatusCode::FORBIDDEN,
            SluglinkError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            SluglinkError::Store(_) | SluglinkError::Serialization(_) | SluglinkError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// 格式化为彩色输出（用于 Server 模式）
    #[cfg(feature = "server")]
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

impl fmt::Display for SluglinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for SluglinkError {}

// 便捷的构造函数
impl SluglinkError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        SluglinkError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        SluglinkError::NotFound(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        SluglinkError::Conflict(msg.into())
    }

    pub fn store<T: Into<String>>(msg: T) -> Self {
        SluglinkError::Store(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        SluglinkError::Serialization(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        SluglinkError::Config(msg.into())
    }

    pub fn forbidden<T: Into<String>>(msg: T) -> Self {
        SluglinkError::Forbidden(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        SluglinkError::Unauthorized(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<serde_json::Error> for SluglinkError {
    fn from(err: serde_json::Error) -> Self {
        SluglinkError::Serialization(err.to_string())
    }
}

impl From<redis::RedisError> for SluglinkError {
    fn from(err: redis::RedisError) -> Self {
        SluglinkError::Store(err.to_string())
    }
}

impl From<config::ConfigError> for SluglinkError {
    fn from(err: config::ConfigError) -> Self {
        SluglinkError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SluglinkError>;
