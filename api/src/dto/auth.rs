use serde::{Deserialize, Serialize};

/// Body of a successful `POST /api/v1/auth/reissue`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReissueResponse {
    pub access_token: String,
    /// True when a new refresh token was set as a cookie
    pub is_refresh_token_reissued: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: String,
}
