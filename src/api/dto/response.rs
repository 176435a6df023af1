//! Response bodies of the JSON endpoints.

use serde::{Deserialize, Serialize};

/// Body of a successful notify call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            status: "OK".to_string(),
        }
    }
}

/// Liveness probe body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// Package version of the running binary
    pub version: String,
    /// Version of the runtime configuration snapshot in effect
    pub config_version: u64,
}
