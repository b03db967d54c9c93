use serde::{Deserialize, Serialize};

/// Wire envelope used by every backend endpoint: a success boolean plus an
/// optional data payload and an optional human-readable message.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationResponse {
    pub field: String,
    pub message: String,
}

impl ValidationResponse {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}
