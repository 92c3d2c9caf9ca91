//! Link target validation
//!
//! Only absolute http(s) URLs are accepted as link targets.

use url::Url;

use crate::errors::SluglinkError;

pub const MAX_TARGET_LENGTH: usize = 2048;

#[derive(Debug, PartialEq, Eq)]
pub enum TargetError {
    Empty,
    TooLong(usize),
    DangerousScheme(String),
    UnsupportedScheme(String),
    Malformed(String),
}

impl std::fmt::Display for TargetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "Target URL cannot be empty"),
            Self::TooLong(len) => write!(
                f,
                "Target URL is {} characters, limit is {}",
                len, MAX_TARGET_LENGTH
            ),
            Self::DangerousScheme(scheme) => write!(f, "Blocked URL scheme: {}", scheme),
            Self::UnsupportedScheme(scheme) => write!(
                f,
                "Unsupported URL scheme: {}. Only http:// and https:// are allowed",
                scheme
            ),
            Self::Malformed(msg) => write!(f, "Invalid URL format: {}", msg),
        }
    }
}

impl std::error::Error for TargetError {}

impl From<TargetError> for SluglinkError {
    fn from(err: TargetError) -> Self {
        SluglinkError::validation(err.to_string())
    }
}

const DANGEROUS_SCHEMES: &[&str] = &["javascript", "data", "file", "vbscript", "about", "blob"];

pub fn validate_target(target: &str) -> Result<(), TargetError> {
    let target = target.trim();

    if target.is_empty() {
        return Err(TargetError::Empty);
    }
    if target.len() > MAX_TARGET_LENGTH {
        return Err(TargetError::TooLong(target.len()));
    }

    let scheme = target
        .split_once(':')
        .map(|(scheme, _)| scheme.to_ascii_lowercase())
        .unwrap_or_default();

    if DANGEROUS_SCHEMES.contains(&scheme.as_str()) {
        return Err(TargetError::DangerousScheme(format!("{}:", scheme)));
    }

    let parsed = Url::parse(target).map_err(|e| TargetError::Malformed(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(TargetError::UnsupportedScheme(format!("{}:", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_targets() {
        assert!(validate_target("http://example.com").is_ok());
        assert!(validate_target("https://example.com/path?query=1").is_ok());
        assert!(validate_target("HTTPS://EXAMPLE.COM").is_ok());
        assert!(validate_target("  https://padded.example  ").is_ok());
    }

    #[test]
    fn test_dangerous_schemes() {
        assert!(matches!(
            validate_target("javascript:alert(1)"),
            Err(TargetError::DangerousScheme(_))
        ));
        assert!(matches!(
            validate_target("DATA:text/html,<b>x</b>"),
            Err(TargetError::DangerousScheme(_))
        ));
        assert!(matches!(
            validate_target("file:///etc/passwd"),
            Err(TargetError::DangerousScheme(_))
        ));
    }

    #[test]
    fn test_unsupported_and_malformed() {
        assert!(matches!(
            validate_target("ftp://example.com"),
            Err(TargetError::UnsupportedScheme(_))
        ));
        assert!(matches!(
            validate_target("not a url"),
            Err(TargetError::Malformed(_))
        ));
        assert_eq!(validate_target(""), Err(TargetError::Empty));
    }

    #[test]
    fn test_length_limit() {
        let long = format!("https://example.com/{}", "a".repeat(MAX_TARGET_LENGTH));
        assert!(matches!(validate_target(&long), Err(TargetError::TooLong(_))));
    }

    #[test]
    fn test_converts_to_validation_error() {
        let err: SluglinkError = validate_target("").unwrap_err().into();
        assert!(matches!(err, SluglinkError::Validation(_)));
    }
}
