pub mod slug;
pub mod url_validator;

pub use slug::{SlugPolicy, SlugResolver, is_valid_slug};
pub use url_validator::validate_target;

/// Current time in epoch seconds
pub fn now_epoch() -> i64 {
    chrono::Utc::now().timestamp()
}
