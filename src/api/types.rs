//! API 类型定义

use serde::{Deserialize, Serialize};

use crate::storage::LinkRecord;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// `{ "link": ... }`
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LinkEnvelope {
    pub link: LinkRecord,
}

#[derive(Deserialize, Clone, Debug)]
pub struct QueryLinkParams {
    pub slug: Option<String>,
}

/// Settings the HTTP layer applies before calling the link service
#[derive(Clone, Debug, Default)]
pub struct ApiSettings {
    pub preview_mode: bool,
    pub token: Option<String>,
}

impl ApiSettings {
    pub fn from_config(config: &crate::config::StaticConfig) -> Self {
        Self {
            preview_mode: config.links.preview_mode,
            token: config.api.token.clone().filter(|t| !t.is_empty()),
        }
    }
}
