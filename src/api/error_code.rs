//! API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::SluglinkError;

/// API 错误码
///
/// 按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 3000-3099: 链接错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    InternalServerError = 1005,

    LinkNotFound = 3000,
    LinkAlreadyExists = 3001,
    LinkInvalid = 3002,
    LinkStoreError = 3005,
}

impl From<&SluglinkError> for ErrorCode {
    fn from(err: &SluglinkError) -> Self {
        match err {
            SluglinkError::Validation(_) => ErrorCode::LinkInvalid,
            SluglinkError::NotFound(_) => ErrorCode::LinkNotFound,
            SluglinkError::Conflict(_) => ErrorCode::LinkAlreadyExists,
            SluglinkError::Store(_) => ErrorCode::LinkStoreError,
            SluglinkError::Serialization(_) | SluglinkError::Config(_) => {
                ErrorCode::InternalServerError
            }
            SluglinkError::Forbidden(_) => ErrorCode::Forbidden,
            SluglinkError::Unauthorized(_) => ErrorCode::Unauthorized,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_number() {
        assert_eq!(serde_json::to_string(&ErrorCode::LinkAlreadyExists).unwrap(), "3001");
        assert_eq!(serde_json::to_string(&ErrorCode::Success).unwrap(), "0");
    }

    #[test]
    fn test_maps_error_kinds() {
        assert_eq!(
            ErrorCode::from(&SluglinkError::conflict("x")),
            ErrorCode::LinkAlreadyExists
        );
        assert_eq!(
            ErrorCode::from(&SluglinkError::not_found("x")),
            ErrorCode::LinkNotFound
        );
        assert_eq!(
            ErrorCode::from(&SluglinkError::store("x")),
            ErrorCode::LinkStoreError
        );
    }
}
