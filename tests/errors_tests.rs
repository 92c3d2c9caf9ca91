use sluglink::errors::{Result, SluglinkError};
use std::error::Error;

#[cfg(test)]
mod error_creation_tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let error = SluglinkError::validation("slug is empty");

        assert!(matches!(error, SluglinkError::Validation(_)));
        assert_eq!(error.code(), "E001");
        assert!(error.to_string().contains("Validation Error"));
        assert!(error.to_string().contains("slug is empty"));
    }

    #[test]
    fn test_not_found_error() {
        let error = SluglinkError::not_found("Link 'foo' not found");

        assert!(matches!(error, SluglinkError::NotFound(_)));
        assert_eq!(error.code(), "E002");
        assert_eq!(error.message(), "Link 'foo' not found");
    }

    #[test]
    fn test_conflict_error() {
        let error = SluglinkError::conflict("Slug 'bar' already exists");

        assert!(matches!(error, SluglinkError::Conflict(_)));
        assert!(error.to_string().contains("Slug Conflict"));
    }

    #[test]
    fn test_store_error_is_retryable() {
        assert!(SluglinkError::store("connection reset").is_retryable());
        assert!(!SluglinkError::conflict("taken").is_retryable());
        assert!(!SluglinkError::validation("bad").is_retryable());
        assert!(!SluglinkError::serialization("bad json").is_retryable());
    }
}

#[cfg(test)]
mod error_conversion_tests {
    use super::*;

    #[test]
    fn test_serde_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{invalid").unwrap_err();
        let error: SluglinkError = json_error.into();

        assert!(matches!(error, SluglinkError::Serialization(_)));
    }

    #[test]
    fn test_config_error_conversion() {
        let error: SluglinkError = config::ConfigError::Message("bad key".to_string()).into();

        assert!(matches!(error, SluglinkError::Config(_)));
        assert!(error.message().contains("bad key"));
    }

    #[test]
    fn test_http_status_mapping() {
        use actix_web::http::StatusCode;

        assert_eq!(SluglinkError::validation("").http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(SluglinkError::not_found("").http_status(), StatusCode::NOT_FOUND);
        assert_eq!(SluglinkError::conflict("").http_status(), StatusCode::CONFLICT);
        assert_eq!(SluglinkError::forbidden("").http_status(), StatusCode::FORBIDDEN);
        assert_eq!(SluglinkError::unauthorized("").http_status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            SluglinkError::store("").http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

#[cfg(test)]
mod error_trait_tests {
    use super::*;

    #[test]
    fn test_error_trait_implementation() {
        let error = SluglinkError::store("write failed");
        let as_dyn: &dyn Error = &error;

        assert!(as_dyn.source().is_none());
        assert_eq!(as_dyn.to_string(), "Store Operation Error: write failed");
    }

    #[test]
    fn test_colored_output_contains_code() {
        let error = SluglinkError::config("missing field");
        let rendered = error.format_colored();

        assert!(rendered.contains("E006"));
        assert!(rendered.contains("missing field"));
    }

    #[test]
    fn test_send_sync_traits() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<SluglinkError>();
        assert_sync::<SluglinkError>();
    }
}

#[cfg(test)]
mod result_type_tests {
    use super::*;

    fn might_fail(fail: bool) -> Result<u32> {
        if fail {
            Err(SluglinkError::not_found("missing"))
        } else {
            Ok(7)
        }
    }

    #[test]
    fn test_result_propagation() {
        fn outer() -> Result<u32> {
            let value = might_fail(false)?;
            might_fail(true)?;
            Ok(value)
        }

        assert_eq!(might_fail(false).unwrap(), 7);
        assert!(matches!(outer(), Err(SluglinkError::NotFound(_))));
    }
}
