pub mod cache_admin;
pub mod list_damage_types;
pub mod retry_damage;
pub mod simulate_damage;

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;

use crate::error::GenerateError;

#[derive(Serialize)]
pub struct ToolResponse {
    pub image: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub text: String,
}

pub use cache_admin::{cache_status, clear_cache};
pub use list_damage_types::list_damage_types;
pub use retry_damage::{RetryDamageRequest, retry_damage};
pub use simulate_damage::{SimulateDamageRequest, simulate_damage};

pub(crate) fn generation_failed(err: GenerateError) -> McpError {
    McpError::internal_error(
        "damage simulation failed",
        Some(serde_json::Value::String(err.to_string())),
    )
}

pub(crate) fn success_json<T: Serialize>(response: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string(response).map_err(|err| {
        McpError::internal_error(
            "serialize tool response failed",
            Some(serde_json::Value::String(err.to_string())),
        )
    })?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}
